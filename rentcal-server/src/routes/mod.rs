pub mod properties;
pub mod sync;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use rentcal_core::Error;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Converts errors to HTTP responses
pub struct AppError {
    status: Option<StatusCode>,
    error: anyhow::Error,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError {
            status: Some(StatusCode::BAD_REQUEST),
            error: anyhow::anyhow!(message.into()),
        }
    }

    fn status(&self) -> StatusCode {
        if let Some(status) = self.status {
            return status;
        }
        match self.error.downcast_ref::<Error>() {
            Some(Error::PropertyNotFound(_)) => StatusCode::NOT_FOUND,
            Some(Error::NoFeedSources(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}", self.error);
        }
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError {
            status: None,
            error: err.into(),
        }
    }
}
