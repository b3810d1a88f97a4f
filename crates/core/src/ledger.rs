//! Payment ledger - append-only rent and security-deposit accounting
//!
//! Rent is a recurring obligation scoped to a "YYYY-MM" period; the
//! security deposit is a single whole-stay obligation paid in one or more
//! installments. Both are settled by appending records to the guest's
//! history; prior records are never touched.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::assert_record_invariants;
use crate::models::{
    Activity, Guest, NewGuest, NewPayment, PaymentRecord, PaymentStatus, PaymentType, Room,
};
use crate::storage::Storage;

/// Current rent period key
pub fn current_month(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

/// Effective rent paid by a guest for one month
pub fn rent_paid_for_month(guest: &Guest, month: &str) -> i64 {
    guest
        .rent_history
        .iter()
        .filter(|r| r.month == month)
        .map(|r| r.amount)
        .sum()
}

/// Effective security deposit paid over the guest's whole stay
pub fn security_paid_total(guest: &Guest) -> i64 {
    guest.security_history.iter().map(|r| r.amount).sum()
}

/// Outcome of posting a payment into a room document
#[derive(Debug, Clone)]
pub struct PostedPayment {
    pub record: PaymentRecord,
    pub guest_name: String,
    /// True when this posting settled the obligation in full
    pub completed: bool,
}

/// Apply a payment to the in-memory room document.
///
/// The caller persists the mutated room as one atomic document update.
pub fn post_payment(
    room: &mut Room,
    user_id: Uuid,
    payment: &NewPayment,
    now: DateTime<Utc>,
) -> Result<PostedPayment> {
    if payment.amount <= 0 {
        return Err(Error::InvalidArgument(
            "payment amount must be greater than 0".into(),
        ));
    }

    let total_due = match payment.payment_type {
        PaymentType::Rent => room.rent_amount,
        PaymentType::Security => room.security_deposit,
    };
    let month = payment
        .month
        .clone()
        .unwrap_or_else(|| current_month(now));

    let room_number = room.room_number.clone();
    let guest = room.find_guest_mut(user_id).ok_or_else(|| {
        Error::NotFound(format!("guest {user_id} in room {room_number}"))
    })?;

    let previous_total = match payment.payment_type {
        PaymentType::Rent => rent_paid_for_month(guest, &month),
        PaymentType::Security => security_paid_total(guest),
    };
    let new_total = previous_total + payment.amount;
    // Amount is positive, so this path only ever yields Full or Partial;
    // Pending records exist solely via move-in synthesis.
    let status = PaymentStatus::derive(new_total, total_due);

    let record = PaymentRecord {
        month,
        amount: payment.amount,
        payment_method: payment.payment_method.clone(),
        payment_date: now,
        payment_type: payment.payment_type,
        payment_status: status,
        balance_amount: (total_due - new_total).max(0),
        previous_total,
        new_total,
        total_due,
        notes: payment.notes.clone().unwrap_or_default(),
    };
    assert_record_invariants(&record);

    match payment.payment_type {
        PaymentType::Rent => {
            guest.rent_history.push(record.clone());
            guest.rent_paid = status == PaymentStatus::Full;
        }
        PaymentType::Security => {
            guest.security_history.push(record.clone());
            guest.security_paid = status == PaymentStatus::Full;
        }
    }
    guest.last_payment_date = Some(now);
    let guest_name = guest.username.clone();
    room.updated_at = now;

    Ok(PostedPayment {
        completed: status == PaymentStatus::Full,
        record,
        guest_name,
    })
}

/// Synthesize the move-in records for a new guest.
///
/// Every guest starts with exactly one record per obligation type: a
/// Full/Partial record when something was paid at move-in, otherwise a
/// zero-amount Pending record.
pub fn move_in_records(
    rent_due: i64,
    security_due: i64,
    spec: &NewGuest,
    now: DateTime<Utc>,
) -> (PaymentRecord, PaymentRecord) {
    let month = current_month(now);

    let rent = initial_record(
        PaymentType::Rent,
        spec.rent_amount_paid,
        rent_due,
        spec.rent_payment_method.as_deref(),
        &month,
        now,
    );
    let security = initial_record(
        PaymentType::Security,
        spec.security_amount_paid,
        security_due,
        spec.security_payment_method.as_deref(),
        &month,
        now,
    );
    (rent, security)
}

fn initial_record(
    payment_type: PaymentType,
    amount: i64,
    total_due: i64,
    method: Option<&str>,
    month: &str,
    now: DateTime<Utc>,
) -> PaymentRecord {
    let notes = match (payment_type, amount > 0) {
        (PaymentType::Rent, true) => format!("Initial rent payment at move-in: ₹{amount}"),
        (PaymentType::Rent, false) => "No initial rent payment".to_string(),
        (PaymentType::Security, true) => format!("Initial security deposit: ₹{amount}"),
        (PaymentType::Security, false) => "No initial security deposit".to_string(),
    };
    let record = PaymentRecord {
        month: month.to_string(),
        amount,
        payment_method: if amount > 0 {
            method.unwrap_or("UPI").to_string()
        } else {
            "N/A".to_string()
        },
        payment_date: now,
        payment_type,
        payment_status: PaymentStatus::derive(amount, total_due),
        balance_amount: (total_due - amount).max(0),
        previous_total: 0,
        new_total: amount,
        total_due,
        notes,
    };
    assert_record_invariants(&record);
    record
}

/// Storage-backed payment ledger operations
pub struct PaymentLedger<'a, S: Storage> {
    store: &'a S,
}

impl<'a, S: Storage> PaymentLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record a payment for a guest and persist the room document atomically
    pub fn add_payment(
        &self,
        room_number: &str,
        user_id: Uuid,
        payment: NewPayment,
    ) -> Result<PaymentRecord> {
        let now = Utc::now();
        let mut room = self
            .store
            .find_room(room_number)?
            .ok_or_else(|| Error::NotFound(format!("room {room_number}")))?;

        let posted = post_payment(&mut room, user_id, &payment, now)?;
        self.store.replace_room(&room)?;

        let record = &posted.record;
        let tally = match record.payment_type {
            PaymentType::Rent => format!("Monthly rent total: ₹{}", record.new_total),
            PaymentType::Security => format!("Security total: ₹{}", record.new_total),
        };
        self.store.log_activity(
            &Activity::new(
                "payment_received",
                format!(
                    "₹{} {} payment ({}) received from {} for room {} ({})",
                    record.amount,
                    record.payment_type,
                    tally,
                    posted.guest_name,
                    room.room_number,
                    record.payment_status
                ),
                now,
            )
            .with_room(&room.room_number)
            .with_guest(&posted.guest_name)
            .with_amount(record.amount),
        )?;

        if posted.completed {
            let completion = match record.payment_type {
                PaymentType::Rent => format!("Full rent for {}", record.month),
                PaymentType::Security => "Full security deposit".to_string(),
            };
            self.store.log_activity(
                &Activity::new(
                    "payment_completed",
                    format!(
                        "{} received from {} for room {}",
                        completion, posted.guest_name, room.room_number
                    ),
                    now,
                )
                .with_room(&room.room_number)
                .with_guest(&posted.guest_name)
                .with_amount(record.new_total),
            )?;
        }

        Ok(posted.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_room() -> Room {
        let now = Utc::now();
        let mut room = Room::new(
            crate::models::NewRoom {
                room_number: "101".into(),
                room_type: "2-sharing".into(),
                capacity: 2,
                rent_amount: 12000,
                security_deposit: 12000,
                status: None,
            },
            now,
        );
        let spec = NewGuest {
            user_id: Some(Uuid::new_v4()),
            username: "ravi".into(),
            phone: "9876543210".into(),
            email: "ravi@example.com".into(),
            aadhar: "1234-5678-9012".into(),
            date_of_joining: None,
            rent_amount_paid: 0,
            security_amount_paid: 0,
            rent_payment_method: None,
            security_payment_method: None,
        };
        let (rent, security) = move_in_records(room.rent_amount, room.security_deposit, &spec, now);
        room.guests.push(Guest {
            user_id: spec.user_id.unwrap(),
            username: spec.username,
            phone: spec.phone,
            email: spec.email,
            aadhar: spec.aadhar,
            date_of_joining: now,
            rent_paid: false,
            security_paid: false,
            rent_history: vec![rent],
            security_history: vec![security],
            last_payment_date: None,
        });
        room.current_occupancy = 1;
        room
    }

    fn rent_payment(amount: i64, month: &str) -> NewPayment {
        NewPayment {
            payment_type: PaymentType::Rent,
            amount,
            payment_method: "UPI".into(),
            month: Some(month.into()),
            notes: None,
        }
    }

    #[test]
    fn test_partial_then_full_rent() {
        let mut room = test_room();
        let user_id = room.guests[0].user_id;
        let now = Utc::now();

        let first = post_payment(&mut room, user_id, &rent_payment(6000, "2025-08"), now).unwrap();
        assert_eq!(first.record.payment_status, PaymentStatus::Partial);
        assert_eq!(first.record.previous_total, 0);
        assert_eq!(first.record.new_total, 6000);
        assert_eq!(first.record.balance_amount, 6000);
        assert!(!room.guests[0].rent_paid);

        let second = post_payment(&mut room, user_id, &rent_payment(6000, "2025-08"), now).unwrap();
        assert_eq!(second.record.payment_status, PaymentStatus::Full);
        assert_eq!(second.record.previous_total, 6000);
        assert_eq!(second.record.new_total, 12000);
        assert_eq!(second.record.balance_amount, 0);
        assert!(second.completed);
        assert!(room.guests[0].rent_paid);
        assert_eq!(room.guests[0].last_payment_date, Some(now));
    }

    #[test]
    fn test_rent_resets_each_month() {
        let mut room = test_room();
        let user_id = room.guests[0].user_id;
        let now = Utc::now();

        post_payment(&mut room, user_id, &rent_payment(12000, "2025-08"), now).unwrap();
        let next = post_payment(&mut room, user_id, &rent_payment(4000, "2025-09"), now).unwrap();

        // September starts from zero even though August is settled
        assert_eq!(next.record.previous_total, 0);
        assert_eq!(next.record.payment_status, PaymentStatus::Partial);
        assert_eq!(next.record.balance_amount, 8000);
    }

    #[test]
    fn test_security_accumulates_across_months() {
        let mut room = test_room();
        let user_id = room.guests[0].user_id;
        let now = Utc::now();
        let pay = |amount: i64, month: &str| NewPayment {
            payment_type: PaymentType::Security,
            amount,
            payment_method: "Cash".into(),
            month: Some(month.into()),
            notes: None,
        };

        post_payment(&mut room, user_id, &pay(5000, "2025-08"), now).unwrap();
        let second = post_payment(&mut room, user_id, &pay(7000, "2025-09"), now).unwrap();

        // Whole-stay obligation: the month on the record is incidental
        assert_eq!(second.record.previous_total, 5000);
        assert_eq!(second.record.new_total, 12000);
        assert_eq!(second.record.payment_status, PaymentStatus::Full);
        assert!(room.guests[0].security_paid);
    }

    #[test]
    fn test_balance_matches_running_totals() {
        let mut room = test_room();
        let user_id = room.guests[0].user_id;
        let now = Utc::now();

        for amount in [1000, 2500, 4000, 500] {
            post_payment(&mut room, user_id, &rent_payment(amount, "2025-08"), now).unwrap();
            let paid = rent_paid_for_month(&room.guests[0], "2025-08");
            let last = room.guests[0].rent_history.last().unwrap();
            assert_eq!(last.balance_amount, (room.rent_amount - paid).max(0));
        }
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut room = test_room();
        let user_id = room.guests[0].user_id;
        let now = Utc::now();

        let err = post_payment(&mut room, user_id, &rent_payment(0, "2025-08"), now).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = post_payment(&mut room, user_id, &rent_payment(-50, "2025-08"), now).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_guest_is_not_found() {
        let mut room = test_room();
        let now = Utc::now();
        let err =
            post_payment(&mut room, Uuid::new_v4(), &rent_payment(500, "2025-08"), now).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_move_in_synthesis_partial() {
        let now = Utc::now();
        let spec = NewGuest {
            user_id: None,
            username: "asha".into(),
            phone: "1".into(),
            email: "a@b.c".into(),
            aadhar: "x".into(),
            date_of_joining: None,
            rent_amount_paid: 6000,
            security_amount_paid: 0,
            rent_payment_method: Some("Cash".into()),
            security_payment_method: None,
        };
        let (rent, security) = move_in_records(12000, 12000, &spec, now);

        assert_eq!(rent.amount, 6000);
        assert_eq!(rent.payment_status, PaymentStatus::Partial);
        assert_eq!(rent.balance_amount, 6000);
        assert_eq!(rent.payment_method, "Cash");

        assert_eq!(security.amount, 0);
        assert_eq!(security.payment_status, PaymentStatus::Pending);
        assert_eq!(security.balance_amount, 12000);
        assert_eq!(security.payment_method, "N/A");
    }
}
