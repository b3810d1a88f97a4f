//! Overdue detection and aging
//!
//! Rent obligations are evaluated per (guest, month) group; the security
//! deposit is a single whole-stay obligation. A group is overdue when it
//! is short of its due amount and its earliest payment activity predates
//! the evaluation time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Guest, PaymentType, Room};

/// One overdue obligation group for a guest
#[derive(Debug, Clone, Serialize)]
pub struct OverdueItem {
    pub payment_type: PaymentType,
    /// Month key for rent groups; None for the whole-stay security deposit
    pub month: Option<String>,
    pub outstanding: i64,
    pub total_due: i64,
    pub total_paid: i64,
}

/// A guest with outstanding overdue amounts
#[derive(Debug, Clone, Serialize)]
pub struct OverdueGuest {
    pub room_number: String,
    pub room_type: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub total_outstanding: i64,
    pub latest_overdue_date: Option<DateTime<Utc>>,
    pub days_overdue: i64,
    pub overdue_items: Vec<OverdueItem>,
}

/// Collect guests with overdue amounts, most-overdue first
pub fn overdue_payments(
    rooms: &[Room],
    type_filter: Option<PaymentType>,
    now: DateTime<Utc>,
) -> Vec<OverdueGuest> {
    let mut result = Vec::new();

    for room in rooms {
        for guest in &room.guests {
            let mut entry = OverdueGuest {
                room_number: room.room_number.clone(),
                room_type: room.room_type.clone(),
                guest_name: guest.username.clone(),
                guest_phone: guest.phone.clone(),
                guest_email: guest.email.clone(),
                total_outstanding: 0,
                latest_overdue_date: None,
                days_overdue: 0,
                overdue_items: Vec::new(),
            };

            if type_filter.is_none() || type_filter == Some(PaymentType::Rent) {
                collect_rent_groups(guest, room.rent_amount, now, &mut entry);
            }
            if type_filter.is_none() || type_filter == Some(PaymentType::Security) {
                collect_security(guest, room.security_deposit, now, &mut entry);
            }

            if entry.total_outstanding > 0 {
                if let Some(anchor) = entry.latest_overdue_date {
                    entry.days_overdue = (now - anchor).num_days();
                }
                result.push(entry);
            }
        }
    }

    result.sort_by(|a, b| {
        b.days_overdue
            .cmp(&a.days_overdue)
            .then_with(|| a.guest_name.cmp(&b.guest_name))
    });
    result
}

fn collect_rent_groups(
    guest: &Guest,
    total_due: i64,
    now: DateTime<Utc>,
    entry: &mut OverdueGuest,
) {
    let mut by_month: BTreeMap<&str, (i64, Option<DateTime<Utc>>)> = BTreeMap::new();
    for record in &guest.rent_history {
        let (paid, earliest) = by_month.entry(record.month.as_str()).or_insert((0, None));
        *paid += record.amount;
        if earliest.map(|e| record.payment_date < e).unwrap_or(true) {
            *earliest = Some(record.payment_date);
        }
    }

    for (month, (paid, earliest)) in by_month {
        let outstanding = (total_due - paid).max(0);
        if outstanding == 0 {
            continue;
        }
        let Some(earliest) = earliest else { continue };
        if earliest >= now {
            continue;
        }
        push_item(
            entry,
            OverdueItem {
                payment_type: PaymentType::Rent,
                month: Some(month.to_string()),
                outstanding,
                total_due,
                total_paid: paid,
            },
            earliest,
        );
    }
}

fn collect_security(guest: &Guest, total_due: i64, now: DateTime<Utc>, entry: &mut OverdueGuest) {
    let paid: i64 = guest.security_history.iter().map(|r| r.amount).sum();
    let outstanding = (total_due - paid).max(0);
    if outstanding == 0 {
        return;
    }
    let earliest = guest
        .security_history
        .iter()
        .map(|r| r.payment_date)
        .min();
    let Some(earliest) = earliest else { return };
    if earliest >= now {
        return;
    }
    push_item(
        entry,
        OverdueItem {
            payment_type: PaymentType::Security,
            month: None,
            outstanding,
            total_due,
            total_paid: paid,
        },
        earliest,
    );
}

fn push_item(entry: &mut OverdueGuest, item: OverdueItem, anchor: DateTime<Utc>) {
    entry.total_outstanding += item.outstanding;
    entry.overdue_items.push(item);
    if entry
        .latest_overdue_date
        .map(|latest| anchor > latest)
        .unwrap_or(true)
    {
        entry.latest_overdue_date = Some(anchor);
    }
}
