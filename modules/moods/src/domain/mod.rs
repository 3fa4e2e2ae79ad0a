pub mod dates;
pub mod error;
pub mod repo;
pub mod service;
