use apikit::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Validation { field, message } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "MOODS_VALIDATION",
                "Validation error",
                message.clone(),
                instance,
            );
            resp.0 = resp
                .0
                .with_errors(vec![ValidationError::new(format!("/{field}"), message.clone())]);
            resp
        }
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
    }
}
