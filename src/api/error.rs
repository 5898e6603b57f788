//! Error types for the mock API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown route, unparseable id, or an absent record.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// A query parameter that does not parse.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The collection behind the route failed.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status a real backend would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::BadRequest(_) => 400,
            ApiError::Backend(_) | ApiError::Serialization(_) => 500,
        }
    }
}
