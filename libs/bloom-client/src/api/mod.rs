mod client;
mod error;
pub mod models;

pub use client::{ApiClient, FileUpload, DEFAULT_BASE_URL};
pub use error::ClientError;
