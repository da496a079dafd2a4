//! Unified error type for every repository, importer and assembler operation.

use sea_orm::DbErr;
use thiserror::Error;

/// All failures the pharmacy core can report to its callers.
#[derive(Debug, Error)]
pub enum Error {
    /// No row with the given id exists.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of row that was looked up (e.g. `"order"`)
        entity: &'static str,
        /// The id that did not match
        id: i64,
    },

    /// A required field was missing or carried an invalid value.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The store rejected the operation (constraint violation, connectivity, bad foreign key).
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The CSV source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Signup was attempted with a phone number that is already registered.
    #[error("Phone number already in use: {phone}")]
    PhoneTaken {
        /// The conflicting phone number
        phone: String,
    },

    /// Phone/password pair did not match a user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The password hasher failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Message reported by the hasher
        message: String,
    },
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
