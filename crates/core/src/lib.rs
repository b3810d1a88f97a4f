//! PG Tracker Core Library
//!
//! Rent-payment ledger, room-occupancy engine, reporting, and storage for
//! the PG hostel room-management service.

pub mod error;
pub mod export;
pub mod invariants;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod registry;
pub mod reports;
pub mod roster;
pub mod storage;

pub use error::{Error, Result};
pub use ledger::PaymentLedger;
pub use models::*;
pub use notify::{BulkOutcome, EmailSender, ReminderContext, ReminderKind};
pub use permissions::*;
pub use registry::{RoomRegistry, RoomStatistics};
pub use roster::GuestRoster;
pub use storage::{ActivityRepository, Database, RoomFilter, RoomRepository, Storage};
