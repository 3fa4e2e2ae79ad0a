use apikit::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::EmailAlreadyExists { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_EMAIL_CONFLICT",
            "Email already registered",
            e.to_string(),
            instance,
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_INVALID_CREDENTIALS",
            "Invalid credentials",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { field, message } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "USERS_VALIDATION",
                "Validation error",
                message.clone(),
                instance,
            );
            resp.0 = resp
                .0
                .with_errors(vec![ValidationError::new(format!("/{field}"), message.clone())]);
            resp
        }
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            "User not found",
            instance,
        ),
        DomainError::PrescriptionNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "PRESCRIPTION_NOT_FOUND",
            "Prescription not found",
            e.to_string(),
            instance,
        ),
        DomainError::MissingFile => from_parts(
            StatusCode::BAD_REQUEST,
            "UPLOAD_MISSING_FILE",
            "Missing file",
            e.to_string(),
            instance,
        ),
        DomainError::UnsupportedFileType { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "UPLOAD_UNSUPPORTED_TYPE",
            "Unsupported file type",
            e.to_string(),
            instance,
        ),
        DomainError::FileTooLarge { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "UPLOAD_TOO_LARGE",
            "File too large",
            e.to_string(),
            instance,
        ),
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
        DomainError::Storage { .. } => {
            tracing::error!(error = ?e, "File storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
        DomainError::AuthInternal { .. } => {
            tracing::error!(error = ?e, "Authentication processing failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL",
                "Internal error",
                "Server error in authentication",
                instance,
            )
        }
    }
}
