//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// The first five variants are the store's own taxonomy; the rest cover
/// ambient infrastructure failures (database, IO, serialization). None of
/// these is treated as process-fatal - callers decide how to recover.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Raised when a concurrent insert loses the uniqueness race.
    /// Consumed internally by the get-or-create retry; callers of
    /// `AccountStore::get_or_create` never observe it.
    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an encryption error
    pub fn encryption(msg: impl Into<String>) -> Self {
        Self::Encryption(msg.into())
    }

    /// Create a decryption error
    pub fn decryption(msg: impl Into<String>) -> Self {
        Self::Decryption(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("external id cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input: external id cannot be empty"
        );

        let err = Error::UnsupportedLocale("xx".to_string());
        assert!(err.to_string().contains("xx"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
