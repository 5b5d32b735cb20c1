use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Every failure is rendered as `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}: {1}")]
    Unauthorized(&'static str, String),
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),
    #[error(transparent)]
    PathParam(#[from] PathRejection),
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn login_failed() -> Self {
        ApiError::Unauthorized("LOGIN_FAILED", "Falha no login".into())
    }

    /// Storage errors reach the caller with the raw driver message.
    pub fn db(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            // keep axum's 400/415/422 distinction
            ApiError::JsonBody(rejection) => rejection.status(),
            ApiError::PathParam(rejection) => rejection.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::Unauthorized(_, msg) | ApiError::Internal(msg) => msg,
            ApiError::JsonBody(rejection) => rejection.body_text(),
            ApiError::PathParam(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse { error: self.message() })).into_response()
    }
}
