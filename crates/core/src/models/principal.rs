//! Verified request principal
//!
//! Credential verification happens in the identity service; by the time a
//! request reaches this crate it carries an already-verified subject/role
//! pair. The core only branches on the role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles in priority order (highest to lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    SuperAdmin = 3,
    Admin = 2,
    Guest = 1,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    /// Can this role perform write operations on rooms/guests/payments?
    pub fn is_admin(&self) -> bool {
        *self >= Role::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified `{subject, role}` pair attached to each inbound request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl Principal {
    pub fn new(subject: String, role: Role) -> Self {
        Self {
            subject,
            role,
            expiry: None,
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expiry, Some(exp) if exp < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_ordering() {
        assert!(Role::SuperAdmin > Role::Admin);
        assert!(Role::Admin > Role::Guest);
        assert!(Role::Admin.is_admin());
        assert!(!Role::Guest.is_admin());
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::Guest, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let p = Principal::new("alice".into(), Role::Admin);
        assert!(!p.is_expired(now));

        let p = p.with_expiry(now - Duration::minutes(1));
        assert!(p.is_expired(now));
    }
}
