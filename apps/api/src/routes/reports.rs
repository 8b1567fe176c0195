//! `GET /reports/summary`: the admin dashboard figures.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use venda_core::report::SalesSummary;

use crate::error::{ApiResult, DbResultExt};
use crate::response::{self, Envelope};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/summary", get(sales_summary))
}

async fn sales_summary(State(state): State<AppState>) -> ApiResult<Json<Envelope<SalesSummary>>> {
    let today = Utc::now().date_naive();
    let summary = state
        .db
        .sales()
        .summary(today)
        .await
        .context("Error fetching sales summary")?;
    Ok(response::data(summary))
}
