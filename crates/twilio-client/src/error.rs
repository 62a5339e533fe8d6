//! Twilio client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwilioError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },
}

impl TwilioError {
    /// Whether the failure happened below the API (connect, timeout, TLS).
    pub fn is_transport(&self) -> bool {
        matches!(self, TwilioError::Http(_))
    }
}
