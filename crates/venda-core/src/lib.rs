//! # venda-core: Pure Business Logic for Venda POS
//!
//! Domain types, money arithmetic, validation and the sale pricing rules.
//! Nothing in here touches a database or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Venda POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Admin SPA (products, sales, dashboard)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    venda-api (axum handlers)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ venda-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   sale    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleDraft │  │   rules   │  │   │
//! │  │   │   Sale    │  │Percentage │  │PricedLine │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    venda-db (SQLite repositories)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (ProductType, Product, Sale, SaleItem) and `Percentage`
//! - [`input`] - Create/update payloads and their validation
//! - [`money`] - Integer-cent `Money` type
//! - [`sale`] - Sale line pricing and total accumulation
//! - [`report`] - Dashboard sales summary
//! - [`validation`] - Field-level rules
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust
//! use venda_core::money::Money;
//! use venda_core::types::Percentage;
//!
//! let line_total = Money::from_cents(15_000).multiply_quantity(2);
//! let tax = line_total.calculate_tax(Percentage::from_percentage(10.0));
//!
//! assert_eq!(line_total.cents(), 30_000);
//! assert_eq!(tax.cents(), 3_000);
//! ```

pub mod error;
pub mod input;
pub mod money;
pub mod report;
pub mod sale;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of lines in a single sale.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typos at the register (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
