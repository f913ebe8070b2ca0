use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors raised by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule would be broken (duplicate id, email or assignment).
    #[error("{0}")]
    Conflict(String),

    /// A business rule on the input failed (e.g. end date before start date).
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Store(rusqlite::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} not found: {id}"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl From<rusqlite::Error> for ServiceError {
    /// Constraint failures reported by SQLite (unique, primary key, foreign
    /// key) become conflicts.
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, ref msg)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                let detail = msg.clone().unwrap_or_else(|| err.to_string());
                Self::Conflict(format!("Constraint violation: {detail}"))
            }
            other => Self::Store(other),
        }
    }
}
