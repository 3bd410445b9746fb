use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("username or email already taken")]
    DuplicateKey,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies an insert failure: unique violations become `DuplicateKey`,
    /// everything else stays a database error.
    pub fn from_insert(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                debug!(message = db.message(), "unique constraint violated");
                StoreError::DuplicateKey
            }
            _ => StoreError::Database(error),
        }
    }
}
