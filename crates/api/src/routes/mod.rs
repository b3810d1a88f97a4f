//! Route table

mod activities;
mod guests;
mod payments;
mod rooms;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route(
            "/rooms/{room_number}",
            get(rooms::get).put(rooms::update).delete(rooms::remove),
        )
        .route(
            "/rooms/{room_number}/guests",
            get(rooms::guests).post(guests::add),
        )
        .route(
            "/rooms/{room_number}/guests/{user_id}",
            put(guests::update).delete(guests::remove),
        )
        .route(
            "/rooms/{room_number}/guests/{user_id}/payments",
            post(payments::add),
        )
        .route("/all/rooms/statistics", get(rooms::statistics))
        .route("/all/rooms/available", get(rooms::available))
        .route("/all/rooms/occupied", get(rooms::occupied))
        .route("/all/rooms/search", get(rooms::search))
        .route("/payments/details", get(payments::details))
        .route("/payments/overdue", get(payments::overdue))
        .route("/payments/analytics", get(payments::analytics))
        .route("/payments/notifications", get(payments::notifications))
        .route("/payments/monthly-pending", get(payments::monthly_pending))
        .route("/payments/export/csv", get(payments::export_csv))
        .route("/payments/export/pdf", get(payments::export_pdf))
        .route(
            "/payments/send-notifications",
            post(payments::send_notifications),
        )
        .route(
            "/payments/send-monthly-reminders",
            post(payments::send_monthly_reminders),
        )
        .route("/activities/recent", get(activities::recent))
        .with_state(state)
}
