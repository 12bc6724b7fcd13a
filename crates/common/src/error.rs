use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl ToString) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                details: details.to_string(),
            },
        }
    }

    pub fn bad_request(error: impl Into<String>, details: impl ToString) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, details)
    }

    pub fn not_found(error: impl Into<String>, details: impl ToString) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, details)
    }

    pub fn internal(error: impl Into<String>, details: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, details)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.body.error, details = %self.body.details, "Request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}
