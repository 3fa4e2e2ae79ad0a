//! Process-level plumbing shared by Bloomwell binaries: layered configuration,
//! logging initialisation and home directory resolution.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    AppConfig, AuthConfig, CliArgs, CorsConfig, DatabaseConfig, LoggingConfig, Section,
    ServerConfig, UploadsConfig,
};
