//! Unified error type for the calculator.
//!
//! Most of the calculation core never fails: bad text parses to zero and a broken
//! history reads as empty. What remains are the faults of the outer collaborators,
//! namely settings, storage writes and terminal I/O.

use thiserror::Error;

/// Every error the crate can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The settings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage fault reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The history could not be encoded for writing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Terminal read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
