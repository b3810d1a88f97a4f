//! Guest roster - occupancy transitions and embedded guest records
//!
//! The roster exclusively owns `current_occupancy` and the status
//! transitions that follow from it.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::{assert_guest_invariants, assert_room_invariants};
use crate::ledger;
use crate::models::{Activity, Guest, GuestUpdate, NewGuest, RoomStatus};
use crate::storage::Storage;

pub struct GuestRoster<'a, S: Storage> {
    store: &'a S,
}

impl<'a, S: Storage> GuestRoster<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add a guest to a room, seeding both payment histories.
    ///
    /// Fails with `CapacityExceeded` when the room is full. Move-in
    /// amounts (possibly zero) become the guest's first rent and security
    /// records.
    pub fn add_guest(&self, room_number: &str, spec: NewGuest) -> Result<Guest> {
        let now = Utc::now();
        if spec.rent_amount_paid < 0 || spec.security_amount_paid < 0 {
            return Err(Error::InvalidArgument(
                "move-in amounts cannot be negative".into(),
            ));
        }

        let mut room = self
            .store
            .find_room(room_number)?
            .ok_or_else(|| Error::NotFound(format!("room {room_number}")))?;

        if room.current_occupancy >= room.capacity {
            return Err(Error::CapacityExceeded(format!(
                "room {} is at capacity {}",
                room.room_number, room.capacity
            )));
        }

        let (rent_record, security_record) =
            ledger::move_in_records(room.rent_amount, room.security_deposit, &spec, now);
        let guest = Guest {
            user_id: spec.user_id.unwrap_or_else(Uuid::new_v4),
            username: spec.username,
            phone: spec.phone,
            email: spec.email,
            aadhar: spec.aadhar,
            date_of_joining: spec.date_of_joining.unwrap_or(now),
            rent_paid: spec.rent_amount_paid >= room.rent_amount,
            security_paid: spec.security_amount_paid >= room.security_deposit,
            rent_history: vec![rent_record],
            security_history: vec![security_record],
            last_payment_date: None,
        };
        assert_guest_invariants(&guest);

        let guest_name = guest.username.clone();
        room.guests.push(guest.clone());
        room.current_occupancy += 1;
        room.status = RoomStatus::derive(room.current_occupancy, room.capacity, room.status);
        room.updated_at = now;
        assert_room_invariants(&room);
        self.store.replace_room(&room)?;

        self.store.log_activity(
            &Activity::new(
                "guest_added",
                format!("Guest {} added to room {}", guest_name, room.room_number),
                now,
            )
            .with_room(&room.room_number)
            .with_guest(&guest_name),
        )?;

        Ok(guest)
    }

    /// Remove a guest, decrementing occupancy.
    ///
    /// Dropping to zero occupancy forces the room back to Available
    /// regardless of its prior status.
    pub fn remove_guest(&self, room_number: &str, user_id: Uuid) -> Result<()> {
        let now = Utc::now();
        let mut room = self
            .store
            .find_room(room_number)?
            .ok_or_else(|| Error::NotFound(format!("room {room_number}")))?;

        let index = room
            .guests
            .iter()
            .position(|g| g.user_id == user_id)
            .ok_or_else(|| Error::NotFound(format!("guest {user_id} in room {room_number}")))?;
        let guest = room.guests.remove(index);

        let previous_status = room.status;
        room.current_occupancy = room.current_occupancy.saturating_sub(1);
        room.status = RoomStatus::derive(room.current_occupancy, room.capacity, room.status);
        room.updated_at = now;
        assert_room_invariants(&room);
        self.store.replace_room(&room)?;

        self.store.log_activity(
            &Activity::new(
                "guest_removed",
                format!(
                    "Guest {} removed from room {}",
                    guest.username, room.room_number
                ),
                now,
            )
            .with_room(&room.room_number)
            .with_guest(&guest.username),
        )?;

        if room.status != previous_status {
            let description = if room.current_occupancy == 0 {
                format!(
                    "Room {} status changed to available (became empty)",
                    room.room_number
                )
            } else {
                format!(
                    "Room {} status changed to {}",
                    room.room_number, room.status
                )
            };
            self.store.log_activity(
                &Activity::new("room_status_changed", description, now)
                    .with_room(&room.room_number),
            )?;
        }

        Ok(())
    }

    /// Field-level merge into a guest record
    pub fn update_guest(
        &self,
        room_number: &str,
        user_id: Uuid,
        update: GuestUpdate,
    ) -> Result<Guest> {
        let now = Utc::now();
        let mut room = self
            .store
            .find_room(room_number)?
            .ok_or_else(|| Error::NotFound(format!("room {room_number}")))?;

        let guest = room
            .find_guest_mut(user_id)
            .ok_or_else(|| Error::NotFound(format!("guest {user_id} in room {room_number}")))?;

        let mut changed: Vec<&str> = Vec::new();
        if let Some(username) = update.username {
            guest.username = username;
            changed.push("username");
        }
        if let Some(phone) = update.phone {
            guest.phone = phone;
            changed.push("phone");
        }
        if let Some(email) = update.email {
            guest.email = email;
            changed.push("email");
        }
        if let Some(aadhar) = update.aadhar {
            guest.aadhar = aadhar;
            changed.push("aadhar");
        }

        let updated = guest.clone();
        if changed.is_empty() {
            return Ok(updated);
        }

        room.updated_at = now;
        self.store.replace_room(&room)?;

        self.store.log_activity(
            &Activity::new(
                "guest_updated",
                format!(
                    "Guest {} details updated in room {} - fields: {}",
                    updated.username,
                    room.room_number,
                    changed.join(", ")
                ),
                now,
            )
            .with_room(&room.room_number)
            .with_guest(&updated.username),
        )?;

        Ok(updated)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{NewRoom, PaymentStatus, Room};
    use crate::registry::RoomRegistry;
    use crate::storage::{ActivityRepository, Database, RoomRepository};

    /// Bare guest for tests that hand-assemble room state
    pub(crate) fn make_guest(name: &str) -> Guest {
        let now = Utc::now();
        let spec = guest_spec(name, 0, 0);
        let (rent, security) = ledger::move_in_records(12000, 12000, &spec, now);
        Guest {
            user_id: Uuid::new_v4(),
            username: name.into(),
            phone: "9876543210".into(),
            email: format!("{name}@example.com"),
            aadhar: "1234-5678-9012".into(),
            date_of_joining: now,
            rent_paid: false,
            security_paid: false,
            rent_history: vec![rent],
            security_history: vec![security],
            last_payment_date: None,
        }
    }

    pub(crate) fn guest_spec(name: &str, rent_paid: i64, security_paid: i64) -> NewGuest {
        NewGuest {
            user_id: None,
            username: name.into(),
            phone: "9876543210".into(),
            email: format!("{name}@example.com"),
            aadhar: "1234-5678-9012".into(),
            date_of_joining: None,
            rent_amount_paid: rent_paid,
            security_amount_paid: security_paid,
            rent_payment_method: None,
            security_payment_method: None,
        }
    }

    fn setup() -> (Database, Room) {
        let db = Database::open_in_memory().unwrap();
        let room = RoomRegistry::new(&db)
            .create(NewRoom {
                room_number: "101".into(),
                room_type: "2-sharing".into(),
                capacity: 2,
                rent_amount: 12000,
                security_deposit: 12000,
                status: None,
            })
            .unwrap();
        (db, room)
    }

    #[test]
    fn test_partial_move_in_scenario() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);

        let guest = roster
            .add_guest("101", guest_spec("ravi", 6000, 0))
            .unwrap();
        assert_eq!(guest.rent_history.len(), 1);
        let record = &guest.rent_history[0];
        assert_eq!(record.amount, 6000);
        assert_eq!(record.payment_status, PaymentStatus::Partial);
        assert_eq!(record.balance_amount, 6000);
        assert!(!guest.rent_paid);

        let room = db.find_room("101").unwrap().unwrap();
        assert_eq!(room.current_occupancy, 1);
        // 1 < capacity 2, so the status stays put
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[test]
    fn test_second_guest_fills_room() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);
        roster.add_guest("101", guest_spec("ravi", 0, 0)).unwrap();
        roster.add_guest("101", guest_spec("asha", 0, 0)).unwrap();

        let room = db.find_room("101").unwrap().unwrap();
        assert_eq!(room.current_occupancy, 2);
        assert_eq!(room.status, RoomStatus::Occupied);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);
        roster.add_guest("101", guest_spec("a", 0, 0)).unwrap();
        roster.add_guest("101", guest_spec("b", 0, 0)).unwrap();

        let err = roster.add_guest("101", guest_spec("c", 0, 0)).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded(_)));
        let room = db.find_room("101").unwrap().unwrap();
        assert_eq!(room.current_occupancy, 2);
    }

    #[test]
    fn test_remove_to_empty_forces_available() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);
        let guest = roster.add_guest("101", guest_spec("ravi", 0, 0)).unwrap();

        // Put the room under maintenance while occupied
        let mut room = db.find_room("101").unwrap().unwrap();
        room.status = RoomStatus::Maintenance;
        db.replace_room(&room).unwrap();

        roster.remove_guest("101", guest.user_id).unwrap();
        let room = db.find_room("101").unwrap().unwrap();
        assert_eq!(room.current_occupancy, 0);
        assert_eq!(room.status, RoomStatus::Available);

        let activities = db.recent_activities(5).unwrap();
        assert!(activities
            .iter()
            .any(|a| a.activity_type == "room_status_changed"));
        assert!(activities.iter().any(|a| a.activity_type == "guest_removed"));
    }

    #[test]
    fn test_remove_unknown_guest_is_not_found() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);
        let err = roster.remove_guest("101", Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_update_guest_merges_fields() {
        let (db, _) = setup();
        let roster = GuestRoster::new(&db);
        let guest = roster.add_guest("101", guest_spec("ravi", 0, 0)).unwrap();

        let updated = roster
            .update_guest(
                "101",
                guest.user_id,
                GuestUpdate {
                    phone: Some("1112223334".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone, "1112223334");
        assert_eq!(updated.username, "ravi");

        let room = db.find_room("101").unwrap().unwrap();
        assert_eq!(room.guests[0].phone, "1112223334");
    }
}
