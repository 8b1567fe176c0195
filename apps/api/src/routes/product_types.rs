//! `/product-types`: categories and their tax rates.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use venda_core::input::{NewProductType, ProductTypeChanges};
use venda_core::ProductType;

use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::extract::{ApiJson, IdPath};
use crate::response::{self, Envelope};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-types",
            get(list_product_types).post(create_product_type),
        )
        .route(
            "/product-types/{id}",
            get(get_product_type)
                .put(update_product_type)
                .delete(delete_product_type),
        )
}

async fn list_product_types(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<ProductType>>>> {
    let types = state
        .db
        .product_types()
        .list()
        .await
        .context("Error fetching product types")?;
    Ok(response::data(types))
}

async fn get_product_type(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<ProductType>>> {
    let product_type = state
        .db
        .product_types()
        .get_by_id(id)
        .await
        .context("Error fetching product type")?
        .ok_or_else(|| ApiError::not_found("ProductType", id))?;
    Ok(response::data(product_type))
}

async fn create_product_type(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProductType>,
) -> ApiResult<(StatusCode, Json<Envelope<ProductType>>)> {
    let record = body.validate()?;
    let product_type = state
        .db
        .product_types()
        .insert(&record)
        .await
        .context("Error creating product type")?;

    info!(product_type_id = product_type.id, "Product type created");
    Ok(response::created(
        "Product type created successfully",
        product_type,
    ))
}

async fn update_product_type(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(changes): ApiJson<ProductTypeChanges>,
) -> ApiResult<Json<Envelope<ProductType>>> {
    let repo = state.db.product_types();
    let current = repo
        .get_by_id(id)
        .await
        .context("Error updating product type")?
        .ok_or_else(|| ApiError::not_found("ProductType", id))?;

    let record = changes.apply_to(&current).validate()?;
    let product_type = repo
        .update(id, &record)
        .await
        .context("Error updating product type")?;

    info!(product_type_id = id, "Product type updated");
    Ok(response::updated(
        "Product type updated successfully",
        product_type,
    ))
}

async fn delete_product_type(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<()>>> {
    state
        .db
        .product_types()
        .soft_delete(id)
        .await
        .context("Error deleting product type")?;

    info!(product_type_id = id, "Product type deleted");
    Ok(response::message("Product type deleted successfully"))
}
