//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Venda POS                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │       │                                                                 │
//! │       ├── JSON / path / query rejection ──► InvalidBody   400          │
//! │       ├── ValidationError ────────────────► BadRequest    400          │
//! │       ├── DbError::NotFound ──────────────► NotFound      400          │
//! │       ├── DbError::Domain ────────────────► BadRequest    400          │
//! │       │     (SummaryOverflow ─────────────► Internal      500)         │
//! │       ├── constraint violations ──────────► InvalidBody   400          │
//! │       └── anything else ──────────────────► Internal      500          │
//! │                                                │                        │
//! │                                                └─ detail logged,        │
//! │                                                   static message sent   │
//! │                                                                         │
//! │  Body is always {"message": "..."}                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};
use venda_core::{CoreError, ValidationError};
use venda_db::{DbError, DbResult};

/// Error returned from every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed validation; the message names the field.
    #[error("{0}")]
    BadRequest(String),

    /// Body or path could not be parsed, or the database refused the values.
    #[error("Invalid data provided")]
    InvalidBody,

    /// Entity missing or soft-deleted.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// No route for this path and method.
    #[error("Page not found")]
    RouteNotFound,

    /// Anything the client can't fix. Only `message` leaves the server.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn internal(message: &'static str, detail: impl ToString) -> Self {
        ApiError::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    /// Maps a database error, using `message` if it turns out to be internal.
    pub fn from_db(err: DbError, message: &'static str) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::NotFound { entity, id },
            DbError::Domain(CoreError::Validation(err)) => ApiError::BadRequest(err.to_string()),
            DbError::Domain(err @ CoreError::SummaryOverflow) => ApiError::internal(message, err),
            DbError::Domain(err) => ApiError::BadRequest(err.to_string()),
            DbError::ForeignKeyViolation { message: detail }
            | DbError::ConstraintViolation { message: detail } => {
                debug!(detail = %detail, "Database rejected values");
                ApiError::InvalidBody
            }
            other => ApiError::internal(message, other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, detail } = &self {
            error!(detail = %detail, "{}", message);
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected JSON body");
        ApiError::InvalidBody
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected path parameter");
        ApiError::InvalidBody
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected query string");
        ApiError::InvalidBody
    }
}

/// Adds the client-facing message used when a database call fails
/// for an internal reason.
///
/// ```rust,ignore
/// let products = db.products().list(None).await.context("Error fetching products")?;
/// ```
pub trait DbResultExt<T> {
    fn context(self, message: &'static str) -> ApiResult<T>;
}

impl<T> DbResultExt<T> for DbResult<T> {
    fn context(self, message: &'static str) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_db(err, message))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
