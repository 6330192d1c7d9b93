//! Error type shared across the pennywise crates.
//!
//! Storage, parsing and IO failures convert in with `#[from]`; the domain
//! variants (`NotFound`, `Invalid`, `Conflict`) carry enough context for the
//! web layer to map them onto HTTP status codes.
//!
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PennyError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request is well-formed but violates a domain rule.
    #[error("{0}")]
    Invalid(String),

    /// A uniqueness rule was violated (duplicate username, currency code...).
    #[error("{0}")]
    Conflict(String),
}

impl PennyError {
    /// Shorthand for validation failures built from format strings.
    pub fn invalid(msg: impl Into<String>) -> Self {
        PennyError::Invalid(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PennyError>;
