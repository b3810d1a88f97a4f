//! Delivery sink wiring
//!
//! Actual email delivery belongs to an external collaborator. The
//! process ships with a sink that records every decided notification in
//! the log and reports success; deployments substitute their own
//! transport behind the same trait.

use pgtracker_core::{EmailSender, ReminderContext, ReminderKind};
use tracing::info;

pub struct LogMailer;

impl EmailSender for LogMailer {
    fn send(&self, recipient: &str, kind: ReminderKind, context: &ReminderContext) -> bool {
        info!(
            recipient,
            kind = ?kind,
            guest = %context.guest_name,
            room = %context.room_number,
            month = %context.payment_month,
            amount = context.amount,
            days_overdue = ?context.days_overdue,
            "Notification handed to delivery sink"
        );
        true
    }
}
