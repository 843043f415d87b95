use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Only two failure kinds exist: an absent key, which callers treat as a
/// normal outcome, and a backend that stopped answering, which gets logged
/// while the surrounding loop keeps running.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("backend unavailable: {0}")]
    BackendUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::BackendUnavailable(Box::new(e))
    }
}

impl From<rumqttc::ClientError> for AppError {
    fn from(e: rumqttc::ClientError) -> Self {
        AppError::BackendUnavailable(Box::new(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BackendUnavailable { .. } => {
                error!("{self}");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, self.to_string()).into_response()
    }
}
