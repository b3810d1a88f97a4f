//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite document rows today, a normalized layout or a
//! mock later) without changing core contracts.

use uuid::Uuid;

use super::rooms::RoomFilter;
use crate::error::Result;
use crate::models::{Activity, Room};

/// Room document repository operations
pub trait RoomRepository {
    /// Insert a new room document
    fn create_room(&self, room: &Room) -> Result<()>;

    /// Find a room by its unique room number
    fn find_room(&self, room_number: &str) -> Result<Option<Room>>;

    /// Check whether a room number is taken
    fn room_exists(&self, room_number: &str) -> Result<bool>;

    /// Atomically rewrite a room document, keyed by id
    fn replace_room(&self, room: &Room) -> Result<()>;

    /// Delete a room document
    fn delete_room(&self, id: Uuid) -> Result<()>;

    /// List rooms matching the filter
    fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>>;
}

/// Activity log repository operations
pub trait ActivityRepository {
    /// Append to the audit log
    fn log_activity(&self, activity: &Activity) -> Result<()>;

    /// Most recent activities, newest first
    fn recent_activities(&self, limit: u32) -> Result<Vec<Activity>>;
}

/// Combined storage interface
pub trait Storage: RoomRepository + ActivityRepository {}

// Blanket implementation: any type implementing both traits implements Storage
impl<T> Storage for T where T: RoomRepository + ActivityRepository {}
