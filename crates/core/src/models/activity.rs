//! Append-only activity audit log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audit entry, written by every mutating room/guest/payment operation
/// and never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    /// e.g. "room_created", "guest_added", "payment_received"
    pub activity_type: String,
    pub description: String,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn new(activity_type: &str, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_type: activity_type.to_string(),
            description,
            room_number: None,
            guest_name: None,
            amount: None,
            timestamp: now,
        }
    }

    pub fn with_room(mut self, room_number: &str) -> Self {
        self.room_number = Some(room_number.to_string());
        self
    }

    pub fn with_guest(mut self, guest_name: &str) -> Self {
        self.guest_name = Some(guest_name.to_string());
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}
