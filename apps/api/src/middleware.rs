//! # HTTP Middleware
//!
//! ```text
//! request ──► request_id ──► cors ──► method_not_allowed ──► route / fallback
//!             span + header   preflight    405 → 400
//! ```

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOWED_HEADERS: &str = "content-type,x-request-id";

/// Tags the request with an id (the caller's or a new UUID v4), runs it
/// inside a span carrying that id and echoes it on the response.
pub async fn request_id(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);

    let started = Instant::now();
    let mut resp = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = resp.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

/// CORS for the configured origins. Preflight requests are answered here
/// with 200 and never reach a handler.
pub async fn cors(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let allow_origin = origin.as_deref().and_then(|origin| {
        if state.config.allows_any_origin() {
            Some(HeaderValue::from_static("*"))
        } else if state.config.allows_origin(origin) {
            HeaderValue::from_str(origin).ok()
        } else {
            None
        }
    });

    let mut resp = if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::OK.into_response();
        if allow_origin.is_some() {
            let headers = resp.headers_mut();
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            );
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
        }
        resp
    } else {
        next.run(req).await
    };

    if let Some(value) = allow_origin {
        let specific = value != "*";
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        if specific {
            resp.headers_mut()
                .insert(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
    resp
}

/// Unsupported methods on a known path look like unknown paths.
pub async fn method_not_allowed(resp: Response) -> Response {
    if resp.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::RouteNotFound.into_response();
    }
    resp
}

/// Router fallback.
pub async fn page_not_found() -> ApiError {
    ApiError::RouteNotFound
}
