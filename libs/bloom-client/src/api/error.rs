use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response; `message` is the server's problem detail.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Not logged in")]
    Unauthenticated,

    /// Rejected before upload.
    #[error("{0}")]
    InvalidFile(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid API base URL: {0}")]
    Url(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for a toast: the server or validation message when there
    /// is one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. }
            | ClientError::InvalidFile(message)
            | ClientError::InvalidInput(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
