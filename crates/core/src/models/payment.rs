//! Payment ledger records
//!
//! A PaymentRecord is append-only: corrections are expressed as further
//! records, never as edits to an existing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which obligation a payment settles against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Monthly rent, scoped per "YYYY-MM" period
    Rent,
    /// One-time security deposit, scoped over the whole stay
    Security,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Rent => "rent",
            PaymentType::Security => "security",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rent" => Some(PaymentType::Rent),
            "security" => Some(PaymentType::Security),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement state of a (guest, type, month) obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Full,
    Partial,
    Pending,
}

impl PaymentStatus {
    /// Derive status from the effective paid total against the amount due
    pub fn derive(paid_total: i64, total_due: i64) -> Self {
        if paid_total >= total_due {
            PaymentStatus::Full
        } else if paid_total > 0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Full => "full",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended entry in a guest's rent or security history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// "YYYY-MM" for rent; security records carry the month of receipt
    pub month: String,
    pub amount: i64,
    pub payment_method: String,
    pub payment_date: DateTime<Utc>,
    pub payment_type: PaymentType,
    pub payment_status: PaymentStatus,
    /// Outstanding after this record: max(0, total_due - new_total)
    pub balance_amount: i64,
    /// Effective paid total for the obligation before this record
    pub previous_total: i64,
    /// Effective paid total including this record
    pub new_total: i64,
    /// The room's rent_amount or security_deposit at posting time
    pub total_due: i64,
    pub notes: String,
}

/// Payload for recording a payment against a guest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub payment_type: PaymentType,
    pub amount: i64,
    pub payment_method: String,
    /// Defaults to the current "YYYY-MM" when omitted
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Normalize a free-form payment method into the fixed analytics vocabulary
pub fn normalize_method(raw: &str) -> &'static str {
    match raw.trim().to_ascii_lowercase().as_str() {
        "cash" => "cash",
        "upi" | "online" => "online",
        "bank transfer" | "bank_transfer" => "bank_transfer",
        "cheque" => "cheque",
        _ => "other",
    }
}
