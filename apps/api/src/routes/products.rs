//! `/products`: catalog CRUD, EAN lookup and the low-stock list.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;
use venda_core::input::{NewProduct, ProductChanges};
use venda_core::Product;

use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::extract::{ApiJson, ApiQuery, IdPath};
use crate::response::{self, Envelope};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/low-stock", get(low_stock_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// `GET /products?ean=...`
#[derive(Debug, Default, Deserialize)]
struct ProductFilter {
    ean: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Json<Envelope<Vec<Product>>>> {
    let ean = filter
        .ean
        .as_deref()
        .map(str::trim)
        .filter(|ean| !ean.is_empty());

    let products = state
        .db
        .products()
        .list(ean)
        .await
        .context("Error fetching products")?;
    Ok(response::data(products))
}

async fn low_stock_products(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Product>>>> {
    let products = state
        .db
        .products()
        .low_stock()
        .await
        .context("Error fetching products")?;
    Ok(response::data(products))
}

async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<Product>>> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await
        .context("Error fetching product")?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(response::data(product))
}

async fn create_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Envelope<Product>>)> {
    let record = body.validate()?;
    let product = state
        .db
        .products()
        .insert(&record)
        .await
        .context("Error creating product")?;

    info!(product_id = product.id, "Product created");
    Ok(response::created("Product created successfully", product))
}

async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(changes): ApiJson<ProductChanges>,
) -> ApiResult<Json<Envelope<Product>>> {
    let repo = state.db.products();
    let current = repo
        .get_by_id(id)
        .await
        .context("Error updating product")?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    let record = changes.apply_to(&current).validate()?;
    let product = repo
        .update(id, &record)
        .await
        .context("Error updating product")?;

    info!(product_id = id, "Product updated");
    Ok(response::updated("Product updated successfully", product))
}

async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Envelope<()>>> {
    state
        .db
        .products()
        .soft_delete(id)
        .await
        .context("Error deleting product")?;

    info!(product_id = id, "Product deleted");
    Ok(response::message("Product deleted successfully"))
}
