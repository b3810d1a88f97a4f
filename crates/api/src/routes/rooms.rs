//! Room registry endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use pgtracker_core::{
    Action, Error as CoreError, Guest, NewRoom, Room, RoomFilter, RoomRegistry, RoomStatistics,
    RoomStatus, RoomUpdate,
};

use crate::auth::{require, AuthPrincipal};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    room_type: Option<String>,
    status: Option<String>,
    min_occupancy: Option<u32>,
    max_occupancy: Option<u32>,
}

impl RoomQuery {
    fn into_filter(self) -> ApiResult<RoomFilter> {
        let status = match self.status {
            None => None,
            Some(raw) => Some(RoomStatus::parse(&raw).ok_or_else(|| {
                CoreError::InvalidArgument(format!("unknown room status {raw}"))
            })?),
        };
        Ok(RoomFilter {
            room_type: self.room_type,
            status,
            min_occupancy: self.min_occupancy,
            max_occupancy: self.max_occupancy,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<RoomQuery>,
) -> ApiResult<Json<Vec<Room>>> {
    require(&principal, Action::ViewRooms)?;
    let filter = query.into_filter()?;
    let db = state.db();
    Ok(Json(RoomRegistry::new(&*db).list(&filter)?))
}

/// Same as `list`; kept as a dedicated search route for the dashboard
pub async fn search(
    state: State<AppState>,
    principal: AuthPrincipal,
    query: Query<RoomQuery>,
) -> ApiResult<Json<Vec<Room>>> {
    list(state, principal, query).await
}

pub async fn available(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<Vec<Room>>> {
    require(&principal, Action::ViewRooms)?;
    let db = state.db();
    let filter = RoomFilter {
        status: Some(RoomStatus::Available),
        ..Default::default()
    };
    Ok(Json(RoomRegistry::new(&*db).list(&filter)?))
}

pub async fn occupied(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<Vec<Room>>> {
    require(&principal, Action::ViewRooms)?;
    let db = state.db();
    let filter = RoomFilter {
        status: Some(RoomStatus::Occupied),
        ..Default::default()
    };
    Ok(Json(RoomRegistry::new(&*db).list(&filter)?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(room_number): Path<String>,
) -> ApiResult<Json<Room>> {
    require(&principal, Action::ViewRooms)?;
    let db = state.db();
    Ok(Json(RoomRegistry::new(&*db).get(&room_number)?))
}

pub async fn guests(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(room_number): Path<String>,
) -> ApiResult<Json<Vec<Guest>>> {
    require(&principal, Action::ViewRooms)?;
    let db = state.db();
    Ok(Json(RoomRegistry::new(&*db).guests(&room_number)?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(spec): Json<NewRoom>,
) -> ApiResult<impl IntoResponse> {
    require(&principal, Action::CreateRoom)?;
    let db = state.db();
    let room = RoomRegistry::new(&*db).create(spec)?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(room_number): Path<String>,
    Json(update): Json<RoomUpdate>,
) -> ApiResult<Json<Room>> {
    require(&principal, Action::UpdateRoom)?;
    let db = state.db();
    Ok(Json(RoomRegistry::new(&*db).update(&room_number, update)?))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(room_number): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    require(&principal, Action::DeleteRoom)?;
    let db = state.db();
    RoomRegistry::new(&*db).delete(&room_number)?;
    Ok(Json(json!({ "message": "Room deleted successfully" })))
}

pub async fn statistics(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<RoomStatistics>> {
    require(&principal, Action::ViewRooms)?;
    let db = state.db();
    Ok(Json(RoomRegistry::new(&*db).statistics()?))
}
