use apikit::{from_parts, ProblemResponse};
use axum::http::StatusCode;
use thiserror::Error;

use crate::tokens::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authentication token, authorization denied.")]
    MissingToken,
    #[error("Token is not valid or has expired")]
    InvalidToken,
    #[error("Server error in authentication")]
    Internal { message: String },
}

impl AuthError {
    pub fn to_problem(&self, instance: &str) -> ProblemResponse {
        match self {
            Self::MissingToken => from_parts(
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required",
                self.to_string(),
                instance,
            ),
            Self::InvalidToken => from_parts(
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid token",
                self.to_string(),
                instance,
            ),
            Self::Internal { message } => {
                tracing::error!(error = %message, "authentication failed internally");
                from_parts(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_INTERNAL",
                    "Internal error",
                    self.to_string(),
                    instance,
                )
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired | TokenError::Invalid(_) => Self::InvalidToken,
            TokenError::Internal(message) => Self::Internal { message },
        }
    }
}
