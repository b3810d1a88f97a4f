//! Notification policy
//!
//! Decides which guests owe reminders and on what cadence. Actual
//! delivery belongs to the external email sink behind [`EmailSender`];
//! one guest's failed delivery never aborts a batch.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::ledger;
use crate::models::{PaymentStatus, Room};

/// Which template the external sink should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// Payment due today or within the next few days
    Reminder,
    /// Payment past due
    Overdue,
    /// Gentle start-of-month rent reminder
    Monthly,
}

/// Context handed to the external sink for template rendering
#[derive(Debug, Clone, Serialize)]
pub struct ReminderContext {
    pub guest_name: String,
    pub room_number: String,
    pub payment_month: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
}

/// Exposed interface to the external delivery collaborator
pub trait EmailSender: Send + Sync {
    /// Deliver one message; returns success
    fn send(&self, recipient: &str, kind: ReminderKind, context: &ReminderContext) -> bool;
}

/// One pending/partial rent record surfaced for notification
#[derive(Debug, Clone, Serialize)]
pub struct PaymentAlert {
    pub room_number: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub payment_month: String,
    pub amount: i64,
    pub balance_amount: i64,
    pub payment_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

/// Alerts partitioned by urgency window
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentNotifications {
    pub overdue: Vec<PaymentAlert>,
    pub due_today: Vec<PaymentAlert>,
    /// Due within the next three days
    pub due_soon: Vec<PaymentAlert>,
}

/// Partition unsettled rent records into urgency windows.
///
/// `days_diff` is the calendar-day distance from now to the record's
/// payment date: negative is overdue, zero is due today, 1..=3 is soon.
pub fn payment_notifications(rooms: &[Room], now: DateTime<Utc>) -> PaymentNotifications {
    let mut notifications = PaymentNotifications::default();

    for room in rooms {
        for guest in &room.guests {
            for record in &guest.rent_history {
                if !matches!(
                    record.payment_status,
                    PaymentStatus::Pending | PaymentStatus::Partial
                ) {
                    continue;
                }

                let days_diff =
                    (record.payment_date.date_naive() - now.date_naive()).num_days();
                let mut alert = PaymentAlert {
                    room_number: room.room_number.clone(),
                    guest_name: guest.username.clone(),
                    guest_phone: guest.phone.clone(),
                    guest_email: guest.email.clone(),
                    payment_month: record.month.clone(),
                    amount: record.amount,
                    balance_amount: record.balance_amount,
                    payment_date: record.payment_date,
                    days_overdue: None,
                    days_remaining: None,
                };

                if days_diff < 0 {
                    alert.days_overdue = Some(days_diff.abs());
                    notifications.overdue.push(alert);
                } else if days_diff == 0 {
                    notifications.due_today.push(alert);
                } else if days_diff <= 3 {
                    alert.days_remaining = Some(days_diff);
                    notifications.due_soon.push(alert);
                }
            }
        }
    }

    notifications
}

/// A guest who has not fully paid rent for the current month
#[derive(Debug, Clone, Serialize)]
pub struct PendingMonthlyGuest {
    pub room_number: String,
    pub room_type: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub rent_amount: i64,
    /// Month name for display, e.g. "August"
    pub payment_month: String,
    pub payment_year: i32,
}

/// Guests with no Full rent record for the current calendar month.
///
/// A record counts when its month key is the current "YYYY-MM", or the
/// current month name paired with a payment date in the current year.
pub fn pending_monthly_guests(rooms: &[Room], now: DateTime<Utc>) -> Vec<PendingMonthlyGuest> {
    let current_period = ledger::current_month(now);
    let current_name = now.format("%B").to_string();
    let current_year = now.year();

    let mut pending = Vec::new();
    for room in rooms {
        for guest in &room.guests {
            let has_paid = guest.rent_history.iter().any(|record| {
                let month_matches = record.month == current_period
                    || (record.month == current_name
                        && record.payment_date.year() == current_year);
                month_matches && record.payment_status == PaymentStatus::Full
            });

            if !has_paid {
                pending.push(PendingMonthlyGuest {
                    room_number: room.room_number.clone(),
                    room_type: room.room_type.clone(),
                    guest_name: guest.username.clone(),
                    guest_phone: guest.phone.clone(),
                    guest_email: guest.email.clone(),
                    rent_amount: room.rent_amount,
                    payment_month: current_name.clone(),
                    payment_year: current_year,
                });
            }
        }
    }
    pending
}

/// Outcome of a bulk send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub sent: u32,
    pub failed: u32,
    /// True when the monthly policy gate suppressed the run
    pub skipped: bool,
}

/// Send one notification per unsettled rent record across all windows.
///
/// A guest with no usable email address counts as failed.
pub fn send_bulk_notifications(
    rooms: &[Room],
    sender: &dyn EmailSender,
    now: DateTime<Utc>,
) -> BulkOutcome {
    let notifications = payment_notifications(rooms, now);
    let mut outcome = BulkOutcome::default();

    let batches = [
        (ReminderKind::Overdue, notifications.overdue),
        (ReminderKind::Reminder, notifications.due_today),
        (ReminderKind::Reminder, notifications.due_soon),
    ];
    for (kind, alerts) in batches {
        for alert in alerts {
            let context = ReminderContext {
                guest_name: alert.guest_name.clone(),
                room_number: alert.room_number.clone(),
                payment_month: alert.payment_month.clone(),
                amount: alert.balance_amount,
                days_overdue: alert.days_overdue,
            };
            deliver(sender, &alert.guest_email, kind, &context, &mut outcome);
        }
    }

    info!(sent = outcome.sent, failed = outcome.failed, "Bulk notifications dispatched");
    outcome
}

/// Monthly rent reminders, gated to the 5th of the month unless forced
pub fn send_monthly_reminders(
    rooms: &[Room],
    sender: &dyn EmailSender,
    force: bool,
    now: DateTime<Utc>,
) -> BulkOutcome {
    if now.day() != 5 && !force {
        info!(day = now.day(), "Not the 5th of the month, skipping monthly reminders");
        return BulkOutcome {
            skipped: true,
            ..Default::default()
        };
    }

    let pending = pending_monthly_guests(rooms, now);
    let mut outcome = BulkOutcome::default();
    for guest in pending {
        let context = ReminderContext {
            guest_name: guest.guest_name.clone(),
            room_number: guest.room_number.clone(),
            payment_month: guest.payment_month.clone(),
            amount: guest.rent_amount,
            days_overdue: None,
        };
        deliver(
            sender,
            &guest.guest_email,
            ReminderKind::Monthly,
            &context,
            &mut outcome,
        );
    }

    info!(sent = outcome.sent, failed = outcome.failed, "Monthly reminders dispatched");
    outcome
}

fn deliver(
    sender: &dyn EmailSender,
    recipient: &str,
    kind: ReminderKind,
    context: &ReminderContext,
    outcome: &mut BulkOutcome,
) {
    if recipient.trim().is_empty() {
        warn!(guest = %context.guest_name, "No email on file, counting as failed");
        outcome.failed += 1;
        return;
    }
    if sender.send(recipient, kind, context) {
        outcome.sent += 1;
    } else {
        warn!(guest = %context.guest_name, recipient, "Notification delivery failed");
        outcome.failed += 1;
    }
}
