//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rulecraft_runtime::EngineError;
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// Rule engine error, status chosen by its kind
    Engine(EngineError),

    /// Request body or path that never reaches the engine
    InvalidRequest(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Engine(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Engine(err) => write!(f, "{}", err),
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Engine(err) => Some(err),
            ServerError::InvalidRequest(_) => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", error_message);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(err: EngineError) -> Self {
        ServerError::Engine(err)
    }
}
