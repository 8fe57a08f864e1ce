//! services/web/src/error.rs
//!
//! The primary error type for the `web` service binaries. Request-path
//! failures never reach this: they degrade to flash messages (see the
//! `web` module); this type covers startup and infrastructure faults.

use crate::config::ConfigError;
use deepchat_core::ports::PortError;

/// The primary error type for the `web` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure to run database migrations.
    #[error("Migration Error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A template parsing failure at startup.
    #[error("Template Error: {0}")]
    Template(#[from] tera::Error),

    /// A standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
