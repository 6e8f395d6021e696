use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("todo not found")]
    NotFound,

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}
