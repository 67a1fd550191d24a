use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{ItemId, Source, UserId};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecQuery {
    pub user_id: i64,
    pub item_id: i64,
    pub best_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecResponse {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rec_from: BTreeMap<Source, usize>,
    pub rec_list: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub loaded_at: DateTime<Utc>,
}

// Handlers

/// Service status
pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        loaded_at: state.loaded_at,
    })
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Blended recommendations for a user and the item they are consuming
///
/// `user_id=-1` and `item_id=-1` are valid and mean "unknown user" and
/// "no current item". Malformed parameters get the generic failure response.
pub async fn get_rec(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecQuery>, QueryRejection>,
) -> AppResult<Json<RecResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let best_n = query.best_n.unwrap_or(state.limits.default_best_n);
    if best_n == 0 || best_n > state.limits.max_best_n {
        return Err(AppError::InvalidInput(format!(
            "best_n must be between 1 and {}, got {}",
            state.limits.max_best_n, best_n
        )));
    }

    let user_id = UserId(query.user_id);
    let item_id = ItemId(query.item_id);

    let result = state
        .blender
        .recommend(user_id, item_id, best_n)
        .map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                user_id = %user_id,
                item_id = %item_id,
                error = %e,
                "Recommendation failed"
            );
            e
        })?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        item_id = %item_id,
        best_n,
        pool_size = result.pool_size,
        returned = result.recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecResponse {
        user_id,
        item_id,
        rec_from: result.sources,
        rec_list: result.recommendations,
    }))
}
