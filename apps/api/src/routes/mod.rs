//! Route table, one module per resource.
//!
//! | Path                     | Module          |
//! |--------------------------|-----------------|
//! | `/product-types[/{id}]`  | product_types   |
//! | `/products[/{id}]`       | products        |
//! | `/products/low-stock`    | products        |
//! | `/sales[/{id}]`          | sales           |
//! | `/reports/summary`       | reports         |
//! | `/health`                | health          |

pub mod health;
pub mod product_types;
pub mod products;
pub mod reports;
pub mod sales;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(product_types::routes())
        .merge(products::routes())
        .merge(sales::routes())
        .merge(reports::routes())
        .merge(health::routes())
}
