//! `/sales`: recording and reading sales. Sales have no update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use venda_core::input::NewSale;
use venda_core::Sale;

use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::extract::{ApiJson, IdPath};
use crate::response::{self, Envelope};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale).delete(delete_sale))
}

async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<Sale>>>> {
    let sales = state
        .db
        .sales()
        .list()
        .await
        .context("Error fetching sales")?;
    Ok(response::data(sales))
}

async fn get_sale(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<Sale>>> {
    let sale = state
        .db
        .sales()
        .get_by_id(id)
        .await
        .context("Error fetching sale")?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    Ok(response::data(sale))
}

/// Validation, pricing and persistence all happen in
/// `SaleRepository::create`, inside one transaction.
async fn create_sale(
    State(state): State<AppState>,
    ApiJson(order): ApiJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Envelope<Sale>>)> {
    let sale = state
        .db
        .sales()
        .create(&order)
        .await
        .context("Error creating sale")?;

    info!(
        sale_id = sale.id,
        items = sale.items.len(),
        total_amount = %sale.total_amount,
        "Sale created"
    );
    Ok(response::created("Sale created successfully", sale))
}

async fn delete_sale(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<()>>> {
    state
        .db
        .sales()
        .soft_delete(id)
        .await
        .context("Error deleting sale")?;

    info!(sale_id = id, "Sale deleted");
    Ok(response::message("Sale deleted successfully"))
}
