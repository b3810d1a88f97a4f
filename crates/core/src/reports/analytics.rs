//! Payment analytics
//!
//! Running tallies over every payment record across every room. Keyed
//! maps are BTreeMaps so repeated runs over unchanged data serialize
//! identically.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{normalize_method, PaymentStatus, PaymentType, Room};

/// Count/amount pair for one payment type inside a breakdown
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TypeTally {
    pub count: u64,
    pub amount: i64,
}

/// Count/amount tally with a by-type breakdown, used for the per-method
/// and per-month views
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GroupSummary {
    pub count: u64,
    pub amount: i64,
    pub by_type: BTreeMap<&'static str, TypeTally>,
}

/// Status-bucketed tallies, reused globally and per payment type
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StatusTally {
    pub total_payments: u64,
    pub total_amount: i64,
    pub paid_payments: u64,
    pub paid_amount: i64,
    pub pending_payments: u64,
    pub pending_amount: i64,
    pub overdue_payments: u64,
    pub overdue_amount: i64,
}

impl StatusTally {
    fn add(&mut self, status: PaymentStatus, amount: i64, is_overdue: bool) {
        self.total_payments += 1;
        self.total_amount += amount;
        match status {
            PaymentStatus::Full => {
                self.paid_payments += 1;
                self.paid_amount += amount;
            }
            PaymentStatus::Partial | PaymentStatus::Pending => {
                self.pending_payments += 1;
                self.pending_amount += amount;
                if is_overdue {
                    self.overdue_payments += 1;
                    self.overdue_amount += amount;
                }
            }
        }
    }
}

/// Full analytics summary
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PaymentAnalytics {
    #[serde(flatten)]
    pub totals: StatusTally,
    pub monthly_summary: BTreeMap<String, GroupSummary>,
    pub payment_method_summary: BTreeMap<&'static str, GroupSummary>,
    /// Flat method → amount view for charting
    pub payment_method_amounts: BTreeMap<&'static str, i64>,
    pub payment_type_summary: BTreeMap<&'static str, StatusTally>,
}

/// Tally every record in the collection
pub fn payment_analytics(
    rooms: &[Room],
    type_filter: Option<PaymentType>,
    now: DateTime<Utc>,
) -> PaymentAnalytics {
    let mut analytics = PaymentAnalytics::default();

    for room in rooms {
        for guest in &room.guests {
            let histories: [(PaymentType, &[_]); 2] = [
                (PaymentType::Rent, guest.rent_history.as_slice()),
                (PaymentType::Security, guest.security_history.as_slice()),
            ];
            for (payment_type, history) in histories {
                if let Some(wanted) = type_filter {
                    if wanted != payment_type {
                        continue;
                    }
                }
                for record in history {
                    // A short payment is overdue once its date has passed
                    let is_overdue = record.payment_date < now;
                    analytics
                        .totals
                        .add(record.payment_status, record.amount, is_overdue);
                    analytics
                        .payment_type_summary
                        .entry(payment_type.as_str())
                        .or_default()
                        .add(record.payment_status, record.amount, is_overdue);

                    let method = normalize_method(&record.payment_method);
                    let method_summary = analytics
                        .payment_method_summary
                        .entry(method)
                        .or_default();
                    method_summary.count += 1;
                    method_summary.amount += record.amount;
                    let by_type = method_summary
                        .by_type
                        .entry(payment_type.as_str())
                        .or_default();
                    by_type.count += 1;
                    by_type.amount += record.amount;
                    *analytics.payment_method_amounts.entry(method).or_default() +=
                        record.amount;

                    let monthly = analytics
                        .monthly_summary
                        .entry(record.month.clone())
                        .or_default();
                    monthly.count += 1;
                    monthly.amount += record.amount;
                    let monthly_by_type =
                        monthly.by_type.entry(payment_type.as_str()).or_default();
                    monthly_by_type.count += 1;
                    monthly_by_type.amount += record.amount;
                }
            }
        }
    }

    analytics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{NewRoom, PaymentRecord};
    use crate::roster::tests::make_guest;

    fn record(
        payment_type: PaymentType,
        month: &str,
        amount: i64,
        status: PaymentStatus,
        method: &str,
        date: DateTime<Utc>,
    ) -> PaymentRecord {
        PaymentRecord {
            month: month.into(),
            amount,
            payment_method: method.into(),
            payment_date: date,
            payment_type,
            payment_status: status,
            balance_amount: 0,
            previous_total: 0,
            new_total: amount,
            total_due: 12000,
            notes: String::new(),
        }
    }

    fn sample_rooms(now: DateTime<Utc>) -> Vec<Room> {
        let earlier = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let mut room = Room::new(
            NewRoom {
                room_number: "101".into(),
                room_type: "2-sharing".into(),
                capacity: 2,
                rent_amount: 12000,
                security_deposit: 12000,
                status: None,
            },
            now,
        );
        let mut guest = make_guest("ravi");
        guest.rent_history = vec![
            record(PaymentType::Rent, "2025-08", 12000, PaymentStatus::Full, "UPI", earlier),
            record(PaymentType::Rent, "2025-09", 5000, PaymentStatus::Partial, "Cash", earlier),
        ];
        guest.security_history = vec![record(
            PaymentType::Security,
            "2025-08",
            12000,
            PaymentStatus::Full,
            "Bank Transfer",
            earlier,
        )];
        room.guests.push(guest);
        room.current_occupancy = 1;
        vec![room]
    }

    #[test]
    fn test_tallies_by_status_method_and_type() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let analytics = payment_analytics(&sample_rooms(now), None, now);

        assert_eq!(analytics.totals.total_payments, 3);
        assert_eq!(analytics.totals.total_amount, 29000);
        assert_eq!(analytics.totals.paid_payments, 2);
        assert_eq!(analytics.totals.pending_payments, 1);
        // The partial September payment predates `now`
        assert_eq!(analytics.totals.overdue_payments, 1);
        assert_eq!(analytics.totals.overdue_amount, 5000);

        assert_eq!(analytics.payment_method_amounts["online"], 12000);
        assert_eq!(analytics.payment_method_amounts["cash"], 5000);
        assert_eq!(analytics.payment_method_amounts["bank_transfer"], 12000);

        let rent = &analytics.payment_type_summary["rent"];
        assert_eq!(rent.total_payments, 2);
        assert_eq!(rent.total_amount, 17000);
        let security = &analytics.payment_type_summary["security"];
        assert_eq!(security.paid_amount, 12000);

        assert_eq!(analytics.monthly_summary["2025-08"].count, 2);
        assert_eq!(analytics.monthly_summary["2025-08"].by_type["rent"].amount, 12000);
    }

    #[test]
    fn test_idempotent_read() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let rooms = sample_rooms(now);
        let first = payment_analytics(&rooms, None, now);
        let second = payment_analytics(&rooms, None, now);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_type_filter_restricts_tallies() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let analytics = payment_analytics(&sample_rooms(now), Some(PaymentType::Security), now);
        assert_eq!(analytics.totals.total_payments, 1);
        assert!(analytics.payment_type_summary.get("rent").is_none());
    }

    #[test]
    fn test_empty_collection_is_zeroed() {
        let now = Utc::now();
        let analytics = payment_analytics(&[], None, now);
        assert_eq!(analytics.totals.total_payments, 0);
        assert!(analytics.monthly_summary.is_empty());
    }
}
