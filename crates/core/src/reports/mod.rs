//! Aggregation & reporting engine
//!
//! Read-only pure functions over the fetched room collection. Filtering
//! happens post-fetch; an empty result is a valid result, never an error.

mod analytics;
mod details;
mod overdue;

pub use analytics::{payment_analytics, GroupSummary, PaymentAnalytics, StatusTally, TypeTally};
pub use details::{payment_details, PaymentDetail};
pub use overdue::{overdue_payments, OverdueGuest, OverdueItem};

use crate::models::PaymentType;

/// Optional filters shared by payment detail queries and exports
#[derive(Debug, Clone, Default)]
pub struct PaymentFilters {
    pub room_number: Option<String>,
    /// Case-insensitive substring match on the guest username
    pub guest_name: Option<String>,
    /// A month name ("august") or a "YYYY-MM" period
    pub month: Option<String>,
    pub year: Option<i32>,
    pub payment_type: Option<PaymentType>,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolve a free-form month filter to its canonical month name
pub(crate) fn canonical_month_name(s: &str) -> Option<&'static str> {
    MONTH_NAMES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(s.trim()))
        .copied()
}

/// Does a record's month key satisfy a month filter?
///
/// Month names match records keyed by name; "YYYY-MM" matches exactly;
/// anything else matches nothing.
pub(crate) fn month_filter_matches(filter: &str, record_month: &str) -> bool {
    if let Some(name) = canonical_month_name(filter) {
        record_month == name
    } else if filter.len() == 7 && filter.contains('-') {
        record_month == filter
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_matching() {
        assert!(month_filter_matches("august", "August"));
        assert!(month_filter_matches("AUGUST", "August"));
        assert!(!month_filter_matches("august", "2025-08"));
    }

    #[test]
    fn test_period_matching() {
        assert!(month_filter_matches("2025-08", "2025-08"));
        assert!(!month_filter_matches("2025-08", "2025-09"));
        assert!(!month_filter_matches("notamonth", "2025-08"));
    }
}
