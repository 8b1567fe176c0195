//! `GET /health`

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::response::{self, Envelope};
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<Envelope<HealthStatus>>> {
    if !state.db.health_check().await {
        return Err(ApiError::internal(
            "Database unavailable",
            "SELECT 1 failed",
        ));
    }
    Ok(response::data(HealthStatus { status: "ok" }))
}
