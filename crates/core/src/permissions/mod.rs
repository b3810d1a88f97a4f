//! Capability table for request roles
//!
//! Checked at the HTTP boundary before core operations are invoked.

use crate::models::Role;

/// Actions a principal may attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Room management
    ViewRooms,
    CreateRoom,
    UpdateRoom,
    DeleteRoom,

    // Roster management
    AddGuest,
    UpdateGuest,
    RemoveGuest,

    // Ledger
    RecordPayment,

    // Reporting
    ViewReports,
    ExportReports,

    // Notifications
    SendNotifications,

    // Audit log
    ViewActivities,
}

/// Permission matrix for the closed role set
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: Role, action: Action) -> bool {
        match action {
            // Any verified principal can read
            Action::ViewRooms => true,
            Action::ViewReports => true,
            Action::ExportReports => true,
            Action::ViewActivities => true,

            // Mutations are admin-gated
            Action::CreateRoom => role >= Role::Admin,
            Action::UpdateRoom => role >= Role::Admin,
            Action::DeleteRoom => role >= Role::Admin,
            Action::AddGuest => role >= Role::Admin,
            Action::UpdateGuest => role >= Role::Admin,
            Action::RemoveGuest => role >= Role::Admin,
            Action::RecordPayment => role >= Role::Admin,

            // Bulk sending is admin-gated too
            Action::SendNotifications => role >= Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_permissions() {
        assert!(PermissionMatrix::can_perform(Role::Guest, Action::ViewRooms));
        assert!(PermissionMatrix::can_perform(Role::Guest, Action::ViewReports));
        assert!(!PermissionMatrix::can_perform(Role::Guest, Action::CreateRoom));
        assert!(!PermissionMatrix::can_perform(Role::Guest, Action::RecordPayment));
        assert!(!PermissionMatrix::can_perform(Role::Guest, Action::SendNotifications));
    }

    #[test]
    fn test_admin_permissions() {
        assert!(PermissionMatrix::can_perform(Role::Admin, Action::CreateRoom));
        assert!(PermissionMatrix::can_perform(Role::Admin, Action::RecordPayment));
        assert!(PermissionMatrix::can_perform(Role::Admin, Action::SendNotifications));
    }

    #[test]
    fn test_super_admin_has_all_admin_capabilities() {
        for action in [
            Action::CreateRoom,
            Action::UpdateRoom,
            Action::DeleteRoom,
            Action::AddGuest,
            Action::RemoveGuest,
            Action::RecordPayment,
            Action::SendNotifications,
        ] {
            assert!(PermissionMatrix::can_perform(Role::SuperAdmin, action));
        }
    }
}
