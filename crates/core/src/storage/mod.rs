//! SQLite storage layer for PG Tracker
//!
//! One row per room document (scalars in columns, the embedded roster as
//! JSON) plus an append-only activity log. The handle is constructed by
//! the process entry point and passed into each component.

mod activities;
mod migrations;
mod parse;
mod rooms;
mod traits;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Activity, Room};

pub use activities::ActivityStore;
pub use rooms::{RoomFilter, RoomStore};
pub use traits::{ActivityRepository, RoomRepository, Storage};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get room store
    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    /// Get activity store
    pub fn activities(&self) -> ActivityStore<'_> {
        ActivityStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl RoomRepository for Database {
    fn create_room(&self, room: &Room) -> Result<()> {
        self.rooms().create(room)
    }

    fn find_room(&self, room_number: &str) -> Result<Option<Room>> {
        self.rooms().find_by_number(room_number)
    }

    fn room_exists(&self, room_number: &str) -> Result<bool> {
        self.rooms().exists(room_number)
    }

    fn replace_room(&self, room: &Room) -> Result<()> {
        self.rooms().replace(room)
    }

    fn delete_room(&self, id: Uuid) -> Result<()> {
        self.rooms().delete(id)
    }

    fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>> {
        self.rooms().list(filter)
    }
}

impl ActivityRepository for Database {
    fn log_activity(&self, activity: &Activity) -> Result<()> {
        self.activities().log(activity)
    }

    fn recent_activities(&self, limit: u32) -> Result<Vec<Activity>> {
        self.activities().recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pgtracker.db");

        let db = Database::open(&path).unwrap();
        assert!(db.schema_version() >= 1);
        drop(db);

        // Reopening does not re-apply migrations
        let db = Database::open(&path).unwrap();
        assert!(db.schema_version() >= 1);
    }
}
