use crate::utils::error::{ErrorCategory, RoiError};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const SAVE_FAILED: &str = "Failed to save to database.";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    json_response(
        status,
        ErrorBody {
            error: error.to_string(),
            message: message.into(),
        },
    )
}

pub fn pdf_attachment(bytes: Vec<u8>, filename: &str) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

pub fn status_for(err: &RoiError) -> StatusCode {
    match err {
        RoiError::RenderTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => match err.category() {
            ErrorCategory::Input => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Rendering => StatusCode::BAD_GATEWAY,
            ErrorCategory::Persistence
            | ErrorCategory::Configuration
            | ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

fn error_label(err: &RoiError) -> &'static str {
    match err.category() {
        ErrorCategory::Input => "Invalid request.",
        ErrorCategory::NotFound => "Not found.",
        ErrorCategory::Persistence => "Database error.",
        ErrorCategory::Rendering => "Failed to generate report.",
        ErrorCategory::Configuration | ErrorCategory::System => "Internal server error.",
    }
}

impl IntoResponse for RoiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!("Request failed: {} (Category: {:?})", self, self.category());
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        error_response(status, error_label(&self), self.to_string())
    }
}
