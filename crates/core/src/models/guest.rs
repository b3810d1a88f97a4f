//! Guest records embedded in a Room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentRecord;

/// A guest occupying a room, exclusively owned by that room's document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub user_id: Uuid,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub date_of_joining: DateTime<Utc>,
    /// True while the current month's rent obligation is fully settled
    pub rent_paid: bool,
    /// True once the security deposit is fully settled
    pub security_paid: bool,
    pub rent_history: Vec<PaymentRecord>,
    pub security_history: Vec<PaymentRecord>,
    #[serde(default)]
    pub last_payment_date: Option<DateTime<Utc>>,
}

/// Payload for adding a guest to a room.
///
/// Optional move-in amounts seed the guest's first rent/security records;
/// zero amounts still produce pending records so both histories are
/// non-empty from the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    #[serde(default)]
    pub date_of_joining: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rent_amount_paid: i64,
    #[serde(default)]
    pub security_amount_paid: i64,
    #[serde(default)]
    pub rent_payment_method: Option<String>,
    #[serde(default)]
    pub security_payment_method: Option<String>,
}

/// Partial update of a guest's contact fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub aadhar: Option<String>,
}

impl GuestUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.aadhar.is_none()
    }
}
