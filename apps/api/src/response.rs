//! Success envelopes: `{"data": ...}`, `{"message": ...}` or both.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 `{"data": data}`
pub fn data<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: None,
        data: Some(data),
    })
}

/// 201 `{"message": message, "data": data}`
pub fn created<T: Serialize>(message: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            message: Some(message),
            data: Some(data),
        }),
    )
}

/// 200 `{"message": message, "data": data}`
pub fn updated<T: Serialize>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: Some(message),
        data: Some(data),
    })
}

/// 200 `{"message": message}`
pub fn message(message: &'static str) -> Json<Envelope<()>> {
    Json(Envelope {
        message: Some(message),
        data: None,
    })
}
