//! Failures of the persistence layer

use std::fmt;

pub type StoreResult<T> = Result<T, StoreError>;

/// What can go wrong talking to the backing database
#[derive(Debug)]
pub enum StoreError {
    /// Could not open or reach the database
    ConnectionFailed(String),

    /// A statement failed to execute
    QueryFailed(String),

    /// Schema migration failed at startup
    MigrationFailed(String),

    /// A unique constraint was hit (duplicate target URL)
    Duplicate(String),

    /// History (de)serialization error
    SerializationError(String),

    /// Underlying file I/O failure
    IoError(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConnectionFailed(msg) => {
                write!(f, "could not connect to the database: {}", msg)
            }
            StoreError::QueryFailed(msg) => write!(f, "storage query failed: {}", msg),
            StoreError::MigrationFailed(msg) => write!(f, "database migration failed: {}", msg),
            StoreError::Duplicate(msg) => write!(f, "unique constraint violated: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "history serialization error: {}", msg)
            }
            StoreError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io_err) => StoreError::IoError(io_err),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.to_string())
            }
            sqlx::Error::RowNotFound => StoreError::QueryFailed("no rows found".to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}
