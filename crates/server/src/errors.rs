use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error envelope returned by every failing handler.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    title: &'static str,
    detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.title, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            // A missing record is an expected outcome, not a server fault.
            ServiceError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
            }
            ServiceError::Unavailable(_) => {
                error!(err = %e, "store unavailable");
                Self::new(StatusCode::BAD_GATEWAY, "Store Unavailable", Some(e.to_string()))
            }
            ServiceError::Model(_) => {
                error!(err = %e, "stored record failed to parse");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid Stored Record",
                    Some(e.to_string()),
                )
            }
        }
    }
}
