use thiserror::Error;

/// Top-level error type for the dedup-core crate and dependents.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("input directory not found or unreadable: {0}")]
    InputMissing(String),

    #[error("failed to extract text from document: {0}")]
    DocumentParseFailure(String),
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, CoreError>;
