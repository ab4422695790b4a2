use sea_orm::error::DbErr;
use serde::Serialize;

/// Error type of the data-access contract.
///
/// Every variant except `DatabaseError` is recoverable at the caller: the
/// presentation layer shows the message and lets the user retry. Storage
/// failures propagate unchanged and abort the current operation.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Monthly sheet {0} is locked")]
    SheetLocked(i64),

    #[error("Monthly sheet {0} is already locked")]
    AlreadyLocked(i64),

    #[error("Monthly sheet {0} is not locked")]
    NotLocked(i64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction type: {0}")]
    InvalidType(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Helper trait to normalize database error inputs.
pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    /// True for errors the caller can fix and retry; false for storage
    /// failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ServiceError::DatabaseError(_))
    }
}
