//! Room model - the unit of occupancy and of storage atomicity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Guest;

/// Occupancy state of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(RoomStatus::Available),
            "occupied" => Some(RoomStatus::Occupied),
            "maintenance" => Some(RoomStatus::Maintenance),
            _ => None,
        }
    }

    /// Recompute status from occupancy.
    ///
    /// The persisted column is not trusted across capacity edits; callers
    /// apply this after every occupancy- or capacity-affecting operation.
    /// Maintenance survives at intermediate occupancy, a stale
    /// Occupied/Available does not.
    pub fn derive(occupancy: u32, capacity: u32, current: RoomStatus) -> Self {
        if occupancy == 0 {
            RoomStatus::Available
        } else if occupancy >= capacity {
            RoomStatus::Occupied
        } else if current == RoomStatus::Maintenance {
            RoomStatus::Maintenance
        } else {
            RoomStatus::Available
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A room document with its embedded guest roster and ledgers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    /// Unique human-facing key ("101", "A-2", ...)
    pub room_number: String,
    /// Sharing class, e.g. "1-sharing" .. "4-sharing"
    pub room_type: String,
    pub capacity: u32,
    pub rent_amount: i64,
    pub security_deposit: i64,
    pub current_occupancy: u32,
    pub status: RoomStatus,
    pub guests: Vec<Guest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(spec: NewRoom, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_number: spec.room_number,
            room_type: spec.room_type,
            capacity: spec.capacity,
            rent_amount: spec.rent_amount,
            security_deposit: spec.security_deposit,
            current_occupancy: 0,
            status: spec.status.unwrap_or(RoomStatus::Available),
            guests: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn find_guest(&self, user_id: Uuid) -> Option<&Guest> {
        self.guests.iter().find(|g| g.user_id == user_id)
    }

    pub fn find_guest_mut(&mut self, user_id: Uuid) -> Option<&mut Guest> {
        self.guests.iter_mut().find(|g| g.user_id == user_id)
    }

    /// Status as a function of current occupancy rather than the stored field
    pub fn effective_status(&self) -> RoomStatus {
        RoomStatus::derive(self.current_occupancy, self.capacity, self.status)
    }
}

/// Payload for creating a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub room_type: String,
    pub capacity: u32,
    pub rent_amount: i64,
    pub security_deposit: i64,
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

/// Partial update of room fields.
///
/// Occupancy and the roster are owned by the roster operations and cannot
/// be written through here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub rent_amount: Option<i64>,
    #[serde(default)]
    pub security_deposit: Option<i64>,
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derive_at_bounds() {
        assert_eq!(
            RoomStatus::derive(0, 2, RoomStatus::Occupied),
            RoomStatus::Available
        );
        assert_eq!(
            RoomStatus::derive(2, 2, RoomStatus::Available),
            RoomStatus::Occupied
        );
        assert_eq!(
            RoomStatus::derive(3, 2, RoomStatus::Available),
            RoomStatus::Occupied
        );
    }

    #[test]
    fn test_status_derive_intermediate() {
        // Maintenance is an admin flag and sticks while partially occupied
        assert_eq!(
            RoomStatus::derive(1, 3, RoomStatus::Maintenance),
            RoomStatus::Maintenance
        );
        // A stale Occupied after a capacity increase resolves to Available
        assert_eq!(
            RoomStatus::derive(2, 4, RoomStatus::Occupied),
            RoomStatus::Available
        );
        assert_eq!(
            RoomStatus::derive(1, 2, RoomStatus::Available),
            RoomStatus::Available
        );
    }

    #[test]
    fn test_empty_maintenance_room_reads_available() {
        assert_eq!(
            RoomStatus::derive(0, 2, RoomStatus::Maintenance),
            RoomStatus::Available
        );
    }
}
