//! Guest roster endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use pgtracker_core::{Action, Guest, GuestRoster, GuestUpdate, NewGuest};

use crate::auth::{require, AuthPrincipal};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn add(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(room_number): Path<String>,
    Json(spec): Json<NewGuest>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::AddGuest)?;
    let db = state.db();
    let guest = GuestRoster::new(&*db).add_guest(&room_number, spec)?;
    Ok((StatusCode::CREATED, Json(guest)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path((room_number, user_id)): Path<(String, Uuid)>,
    Json(update): Json<GuestUpdate>,
) -> ApiResult<Json<Guest>> {
    require(&principal, Action::UpdateGuest)?;
    let db = state.db();
    Ok(Json(GuestRoster::new(&*db).update_guest(
        &room_number,
        user_id,
        update,
    )?))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path((room_number, user_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    require(&principal, Action::RemoveGuest)?;
    let db = state.db();
    GuestRoster::new(&*db).remove_guest(&room_number, user_id)?;
    Ok(Json(json!({
        "message": format!("Guest {user_id} removed from room {room_number} successfully")
    })))
}
