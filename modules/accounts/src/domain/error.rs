use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Prescription not found")]
    PrescriptionNotFound { id: String },

    #[error("No file uploaded")]
    MissingFile,

    #[error("Only image and PDF files are allowed!")]
    UnsupportedFileType { file_name: String },

    #[error("File too large: {size} bytes (max: {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Authentication processing failed: {message}")]
    AuthInternal { message: String },
}

impl DomainError {
    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn prescription_not_found(id: impl Into<String>) -> Self {
        Self::PrescriptionNotFound { id: id.into() }
    }

    pub fn unsupported_file_type(file_name: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            file_name: file_name.into(),
        }
    }

    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn auth_internal(message: impl Into<String>) -> Self {
        Self::AuthInternal {
            message: message.into(),
        }
    }
}
