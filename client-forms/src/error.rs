//! Error types for the client

use crate::forms::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The form failed validation; nothing was sent.
    #[error("Invalid form: {0}")]
    Validation(FieldErrors),

    /// The server answered with a non-2xx status. `message` is the body text.
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("Offline store error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl ClientError {
    /// HTTP status for server-side rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
