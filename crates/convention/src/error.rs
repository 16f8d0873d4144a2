use thiserror::Error;

/// Errors produced by the convention layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConventionError {
    #[error("unknown naming convention: {0}")]
    Unknown(String),
}
