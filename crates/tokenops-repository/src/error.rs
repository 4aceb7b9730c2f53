use thiserror::Error;
use tokenops_domain::TransactionStatus;

/// Error types for repository/database operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error - wraps all SeaORM errors
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// Stored JSON (ABI, parameters) that no longer parses.
    #[error("Corrupt {field} in row {id}: {reason}")]
    CorruptRow {
        id: String,
        field: &'static str,
        reason: String,
    },

    /// Completion may only move a record to a terminal status.
    #[error("Invalid status transition to {0}")]
    InvalidTransition(TransactionStatus),
}

/// Convenient Result type alias for RepositoryError
pub type Result<T> = std::result::Result<T, RepositoryError>;
