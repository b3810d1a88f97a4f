//! Payment ledger, reporting, export, and notification endpoints

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use pgtracker_core::notify::{self, PaymentNotifications, PendingMonthlyGuest};
use pgtracker_core::reports::{
    overdue_payments, payment_analytics, payment_details, OverdueGuest, PaymentAnalytics,
    PaymentDetail, PaymentFilters,
};
use pgtracker_core::{
    export, Action, Activity, ActivityRepository, BulkOutcome, Error as CoreError, NewPayment,
    PaymentLedger, PaymentRecord, PaymentType, Room, RoomFilter, RoomRegistry,
};

use crate::auth::{require, AuthPrincipal};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(default = "default_payment_type")]
    payment_type: String,
    amount: i64,
    #[serde(default = "default_payment_method")]
    payment_method: String,
    #[serde(default)]
    month: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn default_payment_type() -> String {
    "rent".to_string()
}

fn default_payment_method() -> String {
    "Cash".to_string()
}

pub async fn add(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path((room_number, user_id)): Path<(String, Uuid)>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::RecordPayment)?;
    let payment_type = parse_payment_type(&request.payment_type)?;
    let payment = NewPayment {
        payment_type,
        amount: request.amount,
        payment_method: request.payment_method,
        month: request.month,
        notes: request.notes,
    };

    let db = state.db();
    let record: PaymentRecord =
        PaymentLedger::new(&*db).add_payment(&room_number, user_id, payment)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    room_number: Option<String>,
    guest_name: Option<String>,
    month: Option<String>,
    year: Option<i32>,
    payment_type: Option<String>,
}

impl DetailsQuery {
    fn into_filters(self) -> ApiResult<PaymentFilters> {
        let payment_type = self
            .payment_type
            .as_deref()
            .map(parse_payment_type)
            .transpose()?;
        Ok(PaymentFilters {
            room_number: self.room_number,
            guest_name: self.guest_name,
            month: self.month,
            year: self.year,
            payment_type,
        })
    }
}

fn parse_payment_type(raw: &str) -> Result<PaymentType, crate::error::ApiError> {
    PaymentType::parse(raw)
        .ok_or_else(|| CoreError::InvalidArgument(format!("unknown payment type {raw}")).into())
}

fn all_rooms(state: &AppState) -> ApiResult<Vec<Room>> {
    let db = state.db();
    Ok(RoomRegistry::new(&*db).list(&RoomFilter::default())?)
}

pub async fn details(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<DetailsQuery>,
) -> ApiResult<Json<Vec<PaymentDetail>>> {
    require(&principal, Action::ViewReports)?;
    let filters = query.into_filters()?;
    let rooms = all_rooms(&state)?;
    Ok(Json(payment_details(&rooms, &filters)))
}

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    payment_type: Option<String>,
}

pub async fn overdue(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<OverdueGuest>>> {
    require(&principal, Action::ViewReports)?;
    let type_filter = query
        .payment_type
        .as_deref()
        .map(parse_payment_type)
        .transpose()?;
    let rooms = all_rooms(&state)?;
    Ok(Json(overdue_payments(&rooms, type_filter, Utc::now())))
}

pub async fn analytics(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<PaymentAnalytics>> {
    require(&principal, Action::ViewReports)?;
    let type_filter = query
        .payment_type
        .as_deref()
        .map(parse_payment_type)
        .transpose()?;
    let rooms = all_rooms(&state)?;
    Ok(Json(payment_analytics(&rooms, type_filter, Utc::now())))
}

pub async fn notifications(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<PaymentNotifications>> {
    require(&principal, Action::ViewReports)?;
    let rooms = all_rooms(&state)?;
    Ok(Json(notify::payment_notifications(&rooms, Utc::now())))
}

pub async fn monthly_pending(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<Vec<PendingMonthlyGuest>>> {
    require(&principal, Action::ViewReports)?;
    let rooms = all_rooms(&state)?;
    Ok(Json(notify::pending_monthly_guests(&rooms, Utc::now())))
}

pub async fn export_csv(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<DetailsQuery>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::ExportReports)?;
    let filters = query.into_filters()?;
    let rooms = all_rooms(&state)?;
    let csv = export::payments_csv(&payment_details(&rooms, &filters));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=payments.csv",
            ),
        ],
        csv,
    ))
}

pub async fn export_pdf(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<DetailsQuery>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::ExportReports)?;
    let filters = query.into_filters()?;
    let rooms = all_rooms(&state)?;
    let pdf = export::payments_pdf(&payment_details(&rooms, &filters), "Payment Report");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=payments.pdf",
            ),
        ],
        pdf,
    ))
}

/// Kick off bulk notifications as a detached job.
///
/// The request returns immediately; the outcome is observable through
/// the log and a `notifications_sent` activity record.
pub async fn send_notifications(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::SendNotifications)?;

    tokio::task::spawn_blocking(move || {
        let rooms = match all_rooms(&state) {
            Ok(rooms) => rooms,
            Err(err) => {
                error!(error = ?err, "Bulk notification dispatch aborted");
                return;
            }
        };
        let outcome = notify::send_bulk_notifications(&rooms, state.mailer.as_ref(), Utc::now());
        record_outcome(&state, "Bulk payment notifications", outcome);
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "processing" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ForceQuery {
    #[serde(default)]
    force: bool,
}

/// Monthly reminders, gated to the 5th unless `force=true`.
///
/// The calendar gate is answered synchronously so a skipped run is
/// visible to the caller; an admitted run is dispatched detached like
/// the bulk path.
pub async fn send_monthly_reminders(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ForceQuery>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::SendNotifications)?;

    let now = Utc::now();
    if now.day() != 5 && !query.force {
        return Ok((
            StatusCode::OK,
            Json(json!({ "status": "skipped", "skipped": true })),
        ));
    }

    tokio::task::spawn_blocking(move || {
        let rooms = match all_rooms(&state) {
            Ok(rooms) => rooms,
            Err(err) => {
                error!(error = ?err, "Monthly reminder dispatch aborted");
                return;
            }
        };
        // The gate already passed at request time
        let outcome =
            notify::send_monthly_reminders(&rooms, state.mailer.as_ref(), true, Utc::now());
        record_outcome(&state, "Monthly rent reminders", outcome);
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "processing", "skipped": false })),
    ))
}

fn record_outcome(state: &AppState, what: &str, outcome: BulkOutcome) {
    let db = state.db();
    let activity = Activity::new(
        "notifications_sent",
        format!(
            "{what} dispatched: {} sent, {} failed",
            outcome.sent, outcome.failed
        ),
        Utc::now(),
    );
    if let Err(err) = db.log_activity(&activity) {
        error!(error = ?err, "Failed to record notification outcome");
    }
}
