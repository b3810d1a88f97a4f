//! Aggregated payment details
//!
//! Groups every payment record by (guest, room, month, type), sums the
//! amounts, and derives the overall settlement state for each group.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::{PaymentStatus, PaymentType, Room};

use super::{month_filter_matches, PaymentFilters};

/// One (guest, room, month, type) group with aggregated amounts
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetail {
    pub room_number: String,
    pub room_type: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub guest_aadhar: String,
    pub payment_month: String,
    pub payment_type: PaymentType,
    /// Sum of record amounts in the group
    pub payment_amount: i64,
    /// Distinct methods seen, joined ", "; "N/A" when none
    pub payment_method: String,
    /// Latest payment date in the group
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub balance_amount: i64,
    /// The obligation the group settles against
    pub total_amount: i64,
    pub notes: Option<String>,
}

struct GroupAgg {
    room_type: String,
    guest_phone: String,
    guest_email: String,
    guest_aadhar: String,
    total_due: i64,
    total_paid: i64,
    methods: Vec<String>,
    notes: Vec<String>,
    latest_date: Option<DateTime<Utc>>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    guest_name: String,
    room_number: String,
    month: String,
    payment_type: PaymentType,
}

/// Aggregate payment details over the room collection
pub fn payment_details(rooms: &[Room], filters: &PaymentFilters) -> Vec<PaymentDetail> {
    let mut groups: HashMap<GroupKey, GroupAgg> = HashMap::new();

    for room in rooms {
        if let Some(number) = &filters.room_number {
            if &room.room_number != number {
                continue;
            }
        }

        for guest in &room.guests {
            if let Some(name) = &filters.guest_name {
                if !guest
                    .username
                    .to_lowercase()
                    .contains(&name.to_lowercase())
                {
                    continue;
                }
            }

            let histories: [(PaymentType, &[_], i64); 2] = [
                (PaymentType::Rent, guest.rent_history.as_slice(), room.rent_amount),
                (
                    PaymentType::Security,
                    guest.security_history.as_slice(),
                    room.security_deposit,
                ),
            ];

            for (payment_type, history, total_due) in histories {
                if let Some(wanted) = filters.payment_type {
                    if wanted != payment_type {
                        continue;
                    }
                }

                for record in history {
                    if let Some(month) = &filters.month {
                        if !month_filter_matches(month, &record.month) {
                            continue;
                        }
                    }
                    if let Some(year) = filters.year {
                        if record.payment_date.year() != year {
                            continue;
                        }
                    }

                    let key = GroupKey {
                        guest_name: guest.username.clone(),
                        room_number: room.room_number.clone(),
                        month: record.month.clone(),
                        payment_type,
                    };
                    let agg = groups.entry(key).or_insert_with(|| GroupAgg {
                        room_type: room.room_type.clone(),
                        guest_phone: guest.phone.clone(),
                        guest_email: guest.email.clone(),
                        guest_aadhar: guest.aadhar.clone(),
                        total_due,
                        total_paid: 0,
                        methods: Vec::new(),
                        notes: Vec::new(),
                        latest_date: None,
                    });
                    agg.total_paid += record.amount;
                    if !record.payment_method.is_empty()
                        && !agg.methods.contains(&record.payment_method)
                    {
                        agg.methods.push(record.payment_method.clone());
                    }
                    if !record.notes.is_empty() {
                        agg.notes.push(record.notes.clone());
                    }
                    if agg
                        .latest_date
                        .map(|latest| record.payment_date > latest)
                        .unwrap_or(true)
                    {
                        agg.latest_date = Some(record.payment_date);
                    }
                }
            }
        }
    }

    let mut details: Vec<PaymentDetail> = groups
        .into_iter()
        .map(|(key, agg)| PaymentDetail {
            room_number: key.room_number,
            room_type: agg.room_type,
            guest_name: key.guest_name,
            guest_phone: agg.guest_phone,
            guest_email: agg.guest_email,
            guest_aadhar: agg.guest_aadhar,
            payment_month: key.month,
            payment_type: key.payment_type,
            payment_amount: agg.total_paid,
            payment_method: if agg.methods.is_empty() {
                "N/A".to_string()
            } else {
                agg.methods.join(", ")
            },
            payment_date: agg.latest_date,
            payment_status: PaymentStatus::derive(agg.total_paid, agg.total_due),
            balance_amount: (agg.total_due - agg.total_paid).max(0),
            total_amount: agg.total_due,
            notes: if agg.notes.is_empty() {
                None
            } else {
                Some(agg.notes.join("; "))
            },
        })
        .collect();

    // Most recent first; the remaining keys make the order deterministic
    details.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| a.room_number.cmp(&b.room_number))
            .then_with(|| a.guest_name.cmp(&b.guest_name))
            .then_with(|| a.payment_month.cmp(&b.payment_month))
            .then_with(|| a.payment_type.cmp(&b.payment_type))
    });
    details
}
