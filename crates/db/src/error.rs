use beatmarket_core::error::CoreError;

/// Error returned by every repository operation.
///
/// Domain outcomes (not found, forbidden, invalid input) stay as [`CoreError`]
/// so callers can tell them apart; store failures are passed through as the
/// original `sqlx::Error`.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            DbError::Core(e) => Some(e),
            DbError::Database(_) => None,
        }
    }
}
