//! Error types for the gymtrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gymtrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// SQLite error (store unavailable, constraint violation, row decoding)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Schema creation or seeding failed
    #[error("Seed error: {0}")]
    Seed(String),

    /// A stored or supplied date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Session type outside of A/B/C
    #[error("Invalid session type: {0}")]
    InvalidSessionType(String),

    /// Another thread panicked while holding the connection
    #[error("Database connection lock poisoned")]
    LockPoisoned,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
