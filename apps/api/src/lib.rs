//! # Venda API
//!
//! REST server for the Venda admin front-end.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Venda API Server                                 │
//! │                                                                         │
//! │  Admin UI ───► HTTP (8080) ───► routes ───► venda-db ───► SQLite       │
//! │                     │                           │                       │
//! │                     │                           ▼                       │
//! │              request id, CORS             venda-core                    │
//! │              405/404 → 400              (sale pricing)                  │
//! │                                                                         │
//! │  Responses: {"data"} | {"message"} | both; status 200/201/400/500      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use venda_db::Database;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Full application router with middleware and fallback.
pub fn build_router(state: AppState) -> Router {
    routes::routes()
        .fallback(middleware::page_not_found)
        .layer(axum::middleware::map_response(middleware::method_not_allowed))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .with_state(state)
}
