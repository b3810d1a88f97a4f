//! Room registry - CRUD over room documents
//!
//! Owns the capacity/rent/deposit fields. Occupancy and the roster are
//! owned by the roster operations; an update through here never touches
//! them, but a capacity edit does recompute the stored status so the
//! persisted value cannot go stale.

use chrono::Utc;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::invariants::assert_room_invariants;
use crate::models::{Activity, Guest, NewRoom, Room, RoomStatus, RoomUpdate};
use crate::storage::{RoomFilter, Storage};

/// Occupancy summary across all rooms
#[derive(Debug, Clone, Serialize)]
pub struct RoomStatistics {
    pub total_rooms: u32,
    pub available_rooms: u32,
    pub occupied_rooms: u32,
    pub maintenance_rooms: u32,
    /// Percentage of rooms occupied
    pub occupancy_rate: f64,
}

pub struct RoomRegistry<'a, S: Storage> {
    store: &'a S,
}

impl<'a, S: Storage> RoomRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a room with an empty roster
    pub fn create(&self, spec: NewRoom) -> Result<Room> {
        let now = Utc::now();
        if self.store.room_exists(&spec.room_number)? {
            return Err(Error::Conflict(format!(
                "room {} already exists",
                spec.room_number
            )));
        }

        let room = Room::new(spec, now);
        assert_room_invariants(&room);
        self.store.create_room(&room)?;

        self.store.log_activity(
            &Activity::new(
                "room_created",
                format!(
                    "Room {} created with capacity {}",
                    room.room_number, room.capacity
                ),
                now,
            )
            .with_room(&room.room_number)
            .with_amount(room.rent_amount),
        )?;

        Ok(room)
    }

    /// Fetch a room by number
    pub fn get(&self, room_number: &str) -> Result<Room> {
        self.store
            .find_room(room_number)?
            .ok_or_else(|| Error::NotFound(format!("room {room_number}")))
    }

    /// The roster of a room
    pub fn guests(&self, room_number: &str) -> Result<Vec<Guest>> {
        Ok(self.get(room_number)?.guests)
    }

    /// Partial update of room fields.
    ///
    /// Never recomputes occupancy; a capacity change recomputes status.
    pub fn update(&self, room_number: &str, update: RoomUpdate) -> Result<Room> {
        let now = Utc::now();
        let mut room = self.get(room_number)?;
        let mut changed: Vec<&str> = Vec::new();

        if let Some(new_number) = update.room_number {
            if new_number != room.room_number {
                if self.store.room_exists(&new_number)? {
                    return Err(Error::Conflict(format!("room {new_number} already exists")));
                }
                room.room_number = new_number;
                changed.push("room_number");
            }
        }
        if let Some(room_type) = update.room_type {
            room.room_type = room_type;
            changed.push("room_type");
        }
        if let Some(rent_amount) = update.rent_amount {
            room.rent_amount = rent_amount;
            changed.push("rent_amount");
        }
        if let Some(security_deposit) = update.security_deposit {
            room.security_deposit = security_deposit;
            changed.push("security_deposit");
        }
        if let Some(status) = update.status {
            room.status = status;
            changed.push("status");
        }
        if let Some(capacity) = update.capacity {
            if capacity < room.current_occupancy {
                return Err(Error::InvalidArgument(format!(
                    "capacity {} is below current occupancy {}",
                    capacity, room.current_occupancy
                )));
            }
            room.capacity = capacity;
            // The stored status is not trusted across a capacity edit
            room.status = RoomStatus::derive(room.current_occupancy, room.capacity, room.status);
            changed.push("capacity");
        }

        if changed.is_empty() {
            return Ok(room);
        }

        room.updated_at = now;
        assert_room_invariants(&room);
        self.store.replace_room(&room)?;

        self.store.log_activity(
            &Activity::new(
                "room_updated",
                format!(
                    "Room {} updated - fields: {}",
                    room.room_number,
                    changed.join(", ")
                ),
                now,
            )
            .with_room(&room.room_number),
        )?;

        Ok(room)
    }

    /// Delete an empty room
    pub fn delete(&self, room_number: &str) -> Result<()> {
        let now = Utc::now();
        let room = self.get(room_number)?;
        if room.current_occupancy > 0 {
            return Err(Error::Conflict(format!(
                "cannot delete room {} with {} occupants",
                room.room_number, room.current_occupancy
            )));
        }

        self.store.delete_room(room.id)?;
        self.store.log_activity(
            &Activity::new(
                "room_deleted",
                format!("Room {} deleted", room.room_number),
                now,
            )
            .with_room(&room.room_number),
        )?;
        Ok(())
    }

    /// List rooms matching the filter
    pub fn list(&self, filter: &RoomFilter) -> Result<Vec<Room>> {
        self.store.list_rooms(filter)
    }

    /// Occupancy statistics over effective (recomputed) statuses
    pub fn statistics(&self) -> Result<RoomStatistics> {
        let rooms = self.store.list_rooms(&RoomFilter::default())?;
        let mut stats = RoomStatistics {
            total_rooms: rooms.len() as u32,
            available_rooms: 0,
            occupied_rooms: 0,
            maintenance_rooms: 0,
            occupancy_rate: 0.0,
        };
        for room in &rooms {
            match room.effective_status() {
                RoomStatus::Available => stats.available_rooms += 1,
                RoomStatus::Occupied => stats.occupied_rooms += 1,
                RoomStatus::Maintenance => stats.maintenance_rooms += 1,
            }
        }
        if stats.total_rooms > 0 {
            stats.occupancy_rate =
                f64::from(stats.occupied_rooms) / f64::from(stats.total_rooms) * 100.0;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ActivityRepository, Database, RoomRepository};

    fn spec(number: &str) -> NewRoom {
        NewRoom {
            room_number: number.into(),
            room_type: "2-sharing".into(),
            capacity: 2,
            rent_amount: 12000,
            security_deposit: 12000,
            status: None,
        }
    }

    #[test]
    fn test_create_initializes_empty_room() {
        let db = Database::open_in_memory().unwrap();
        let registry = RoomRegistry::new(&db);

        let room = registry.create(spec("101")).unwrap();
        assert_eq!(room.current_occupancy, 0);
        assert_eq!(room.status, RoomStatus::Available);
        assert!(room.guests.is_empty());

        let activities = db.recent_activities(5).unwrap();
        assert_eq!(activities[0].activity_type, "room_created");
        assert_eq!(activities[0].room_number.as_deref(), Some("101"));
    }

    #[test]
    fn test_create_duplicate_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        let registry = RoomRegistry::new(&db);
        registry.create(spec("101")).unwrap();

        let err = registry.create(spec("101")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_delete_occupied_room_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        let registry = RoomRegistry::new(&db);
        let mut room = registry.create(spec("101")).unwrap();
        room.current_occupancy = 1;
        room.guests.push(crate::roster::tests::make_guest("ravi"));
        db.replace_room(&room).unwrap();

        let err = registry.delete("101").unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        // Emptying the room makes deletion possible
        room.current_occupancy = 0;
        room.guests.clear();
        db.replace_room(&room).unwrap();
        registry.delete("101").unwrap();
        assert!(matches!(registry.get("101"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_capacity_edit_recomputes_status() {
        let db = Database::open_in_memory().unwrap();
        let registry = RoomRegistry::new(&db);
        let mut room = registry.create(spec("101")).unwrap();
        room.current_occupancy = 2;
        room.status = RoomStatus::Occupied;
        room.guests.push(crate::roster::tests::make_guest("a"));
        room.guests.push(crate::roster::tests::make_guest("b"));
        db.replace_room(&room).unwrap();

        // Raising capacity clears the now-stale Occupied
        let updated = registry
            .update(
                "101",
                RoomUpdate {
                    capacity: Some(4),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Available);

        // Capacity cannot drop below occupancy
        let err = registry
            .update(
                "101",
                RoomUpdate {
                    capacity: Some(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_statistics_uses_effective_status() {
        let db = Database::open_in_memory().unwrap();
        let registry = RoomRegistry::new(&db);
        registry.create(spec("101")).unwrap();
        let mut full = registry.create(spec("102")).unwrap();
        full.current_occupancy = 2;
        full.guests.push(crate::roster::tests::make_guest("a"));
        full.guests.push(crate::roster::tests::make_guest("b"));
        // Stored status left stale on purpose; statistics must not trust it
        db.replace_room(&full).unwrap();

        let stats = registry.statistics().unwrap();
        assert_eq!(stats.total_rooms, 2);
        assert_eq!(stats.available_rooms, 1);
        assert_eq!(stats.occupied_rooms, 1);
        assert!((stats.occupancy_rate - 50.0).abs() < f64::EPSILON);
    }
}
