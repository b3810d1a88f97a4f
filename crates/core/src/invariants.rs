//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Guest, PaymentRecord, Room};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        !room.room_number.trim().is_empty(),
        "Room {} has empty room_number",
        room.id
    );

    debug_assert!(
        room.current_occupancy <= room.capacity,
        "Room {} occupancy {} exceeds capacity {}",
        room.room_number,
        room.current_occupancy,
        room.capacity
    );

    debug_assert!(
        room.current_occupancy as usize == room.guests.len(),
        "Room {} occupancy {} does not match roster size {}",
        room.room_number,
        room.current_occupancy,
        room.guests.len()
    );
}

/// Validate that a guest carries the non-empty histories every guest gets
/// at move-in
pub fn assert_guest_invariants(guest: &Guest) {
    debug_assert!(
        guest.user_id != uuid::Uuid::nil(),
        "Guest {} has nil user_id",
        guest.username
    );

    debug_assert!(
        !guest.rent_history.is_empty(),
        "Guest {} has empty rent history",
        guest.username
    );

    debug_assert!(
        !guest.security_history.is_empty(),
        "Guest {} has empty security history",
        guest.username
    );
}

/// Validate the arithmetic of a freshly built payment record
pub fn assert_record_invariants(record: &PaymentRecord) {
    debug_assert!(
        record.amount >= 0,
        "Payment record for {} has negative amount {}",
        record.month,
        record.amount
    );

    debug_assert!(
        record.new_total == record.previous_total + record.amount,
        "Payment record totals do not add up: {} + {} != {}",
        record.previous_total,
        record.amount,
        record.new_total
    );

    debug_assert!(
        record.balance_amount == (record.total_due - record.new_total).max(0),
        "Payment record balance {} does not match due {} minus paid {}",
        record.balance_amount,
        record.total_due,
        record.new_total
    );
}
