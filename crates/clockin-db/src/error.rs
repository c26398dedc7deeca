//! Database-specific error types and conversions.

use clockin_core::error::ClockinError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A guarded insert aborted because its predicate held.
    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl From<DbError> for ClockinError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ClockinError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => ClockinError::AlreadyExists { entity },
            DbError::Hash(msg) => ClockinError::Crypto(msg),
            other => ClockinError::Database(other.to_string()),
        }
    }
}
