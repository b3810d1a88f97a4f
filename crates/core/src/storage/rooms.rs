//! Room document storage operations
//!
//! Each room row is a self-contained document: the guest roster with both
//! payment ledgers travels in the JSON `guests` column, so every mutation
//! is a single-row write and the room is the unit of atomicity.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_guests, parse_uuid, status_from_str, OptionalExt};
use crate::error::Result;
use crate::models::{Room, RoomStatus};

/// Filter for room listing queries
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub room_type: Option<String>,
    pub status: Option<RoomStatus>,
    pub min_occupancy: Option<u32>,
    pub max_occupancy: Option<u32>,
}

const ROOM_COLUMNS: &str = "id, room_number, room_type, capacity, rent_amount, security_deposit,
     current_occupancy, status, guests, created_at, updated_at";

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        room_number: row.get(1)?,
        room_type: row.get(2)?,
        capacity: row.get(3)?,
        rent_amount: row.get(4)?,
        security_deposit: row.get(5)?,
        current_occupancy: row.get(6)?,
        status: status_from_str(&row.get::<_, String>(7)?),
        guests: parse_guests(&row.get::<_, String>(8)?)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(10)?)?,
    })
}

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new room document
    #[instrument(skip(self, room), fields(room_number = %room.room_number))]
    pub fn create(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rooms (id, room_number, room_type, capacity, rent_amount,
                 security_deposit, current_occupancy, status, guests, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                room.id.to_string(),
                room.room_number,
                room.room_type,
                room.capacity,
                room.rent_amount,
                room.security_deposit,
                room.current_occupancy,
                room.status.as_str(),
                serde_json::to_string(&room.guests)?,
                room.created_at.to_rfc3339(),
                room.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find a room by its unique room number
    #[instrument(skip(self))]
    pub fn find_by_number(&self, room_number: &str) -> Result<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = ?1"))?;
        let room = stmt
            .query_row(params![room_number], room_from_row)
            .optional()?;
        Ok(room)
    }

    /// Check whether a room number is already taken
    #[instrument(skip(self))]
    pub fn exists(&self, room_number: &str) -> Result<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM rooms WHERE room_number = ?1",
            params![room_number],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Rewrite a room document in place, keyed by id.
    ///
    /// This is the store's atomic single-document update: scalar fields
    /// and the embedded roster land in one UPDATE statement.
    #[instrument(skip(self, room), fields(room_number = %room.room_number))]
    pub fn replace(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET room_number = ?1, room_type = ?2, capacity = ?3,
                 rent_amount = ?4, security_deposit = ?5, current_occupancy = ?6,
                 status = ?7, guests = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                room.room_number,
                room.room_type,
                room.capacity,
                room.rent_amount,
                room.security_deposit,
                room.current_occupancy,
                room.status.as_str(),
                serde_json::to_string(&room.guests)?,
                room.updated_at.to_rfc3339(),
                room.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a room document
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM rooms WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    /// List rooms matching the filter, ordered by room number
    #[instrument(skip(self))]
    pub fn list(&self, filter: &RoomFilter) -> Result<Vec<Room>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        if let Some(room_type) = &filter.room_type {
            clauses.push("room_type = ?");
            args.push(Value::Text(room_type.clone()));
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            args.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(min) = filter.min_occupancy {
            clauses.push("current_occupancy >= ?");
            args.push(Value::Integer(min as i64));
        }
        if let Some(max) = filter.max_occupancy {
            clauses.push("current_occupancy <= ?");
            args.push(Value::Integer(max as i64));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms{where_clause} ORDER BY room_number"
        ))?;

        let rooms = stmt
            .query_map(params_from_iter(args), room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRoom;
    use crate::storage::Database;
    use chrono::Utc;

    fn make_room(number: &str, room_type: &str) -> Room {
        Room::new(
            NewRoom {
                room_number: number.into(),
                room_type: room_type.into(),
                capacity: 2,
                rent_amount: 12000,
                security_deposit: 12000,
                status: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_create_find_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let room = make_room("101", "2-sharing");
        db.rooms().create(&room).unwrap();

        let found = db.rooms().find_by_number("101").unwrap().unwrap();
        assert_eq!(found.id, room.id);
        assert_eq!(found.capacity, 2);
        assert!(found.guests.is_empty());
        assert!(db.rooms().find_by_number("999").unwrap().is_none());
    }

    #[test]
    fn test_room_number_is_unique() {
        let db = Database::open_in_memory().unwrap();
        db.rooms().create(&make_room("101", "2-sharing")).unwrap();
        assert!(db.rooms().create(&make_room("101", "3-sharing")).is_err());
        assert!(db.rooms().exists("101").unwrap());
        assert!(!db.rooms().exists("102").unwrap());
    }

    #[test]
    fn test_replace_rewrites_document() {
        let db = Database::open_in_memory().unwrap();
        let mut room = make_room("101", "2-sharing");
        db.rooms().create(&room).unwrap();

        room.capacity = 3;
        room.status = RoomStatus::Maintenance;
        db.rooms().replace(&room).unwrap();

        let found = db.rooms().find_by_number("101").unwrap().unwrap();
        assert_eq!(found.capacity, 3);
        assert_eq!(found.status, RoomStatus::Maintenance);
    }

    #[test]
    fn test_list_filters() {
        let db = Database::open_in_memory().unwrap();
        db.rooms().create(&make_room("101", "2-sharing")).unwrap();
        db.rooms().create(&make_room("102", "3-sharing")).unwrap();
        let mut occupied = make_room("103", "2-sharing");
        occupied.current_occupancy = 2;
        occupied.status = RoomStatus::Occupied;
        db.rooms().create(&occupied).unwrap();

        let all = db.rooms().list(&RoomFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let two_sharing = db
            .rooms()
            .list(&RoomFilter {
                room_type: Some("2-sharing".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(two_sharing.len(), 2);

        let full = db
            .rooms()
            .list(&RoomFilter {
                status: Some(RoomStatus::Occupied),
                min_occupancy: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].room_number, "103");
    }
}
