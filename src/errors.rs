use sea_orm::DbErr;
use thiserror::Error;

/// Every failure the promotions service can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A field value or request parameter broke a validation rule
    #[error("{message}")]
    Validation {
        /// Human-readable reason, returned to the caller as-is
        message: String,
    },

    /// Another promotion already uses this name
    #[error("A promotion named '{name}' already exists")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// No promotion has this id
    #[error("Promotion {id} does not exist")]
    PromotionNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Socket or file failure outside the database
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
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
