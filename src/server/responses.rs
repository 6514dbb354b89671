//! `{"detail": …}` bodies shared by every handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Display;
use tracing::error;

pub fn detail(status: StatusCode, message: impl AsRef<str>) -> Response {
    (status, Json(json!({ "detail": message.as_ref() }))).into_response()
}

pub fn ok_detail(message: impl AsRef<str>) -> Response {
    detail(StatusCode::OK, message)
}

pub fn bad_request(message: impl AsRef<str>) -> Response {
    detail(StatusCode::BAD_REQUEST, message)
}

pub fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Not found.")
}

pub fn forbidden(message: impl AsRef<str>) -> Response {
    detail(StatusCode::FORBIDDEN, message)
}

pub fn internal_error(err: impl Display) -> Response {
    error!("Request failed: {}", err);
    detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
}

/// 200 with the value, 404 on `None`, 500 on error.
pub fn json_or_not_found<T: serde::Serialize>(result: anyhow::Result<Option<T>>) -> Response {
    match result {
        Ok(Some(value)) => Json(value).into_response(),
        Ok(None) => not_found(),
        Err(err) => internal_error(err),
    }
}
