use thiserror::Error;

/// Typed failures the HTTP layer can tell apart. Anything else travels as a
/// plain `anyhow::Error` and is treated as internal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// An update matched no row.
    #[error("no rows affected")]
    NoRowsAffected,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Looks through an `anyhow` chain for a domain error.
    pub fn find(err: &anyhow::Error) -> Option<&DomainError> {
        err.chain().find_map(|cause| cause.downcast_ref::<DomainError>())
    }
}
