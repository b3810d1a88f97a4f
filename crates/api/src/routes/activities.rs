//! Activity log endpoints

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pgtracker_core::{Action, Activity, ActivityRepository};

use crate::auth::{require, AuthPrincipal};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<u32>,
}

pub async fn recent(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<Activity>>> {
    require(&principal, Action::ViewActivities)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let db = state.db();
    Ok(Json(db.recent_activities(limit)?))
}
