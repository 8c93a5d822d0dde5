use thiserror::Error;

/// Failures the engine reports to its callers.
///
/// All variants are synchronous and final: the engine never retries, and
/// a failed mutating operation leaves state untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown topic: {0}")]
    InvalidTopic(String),

    #[error("no questions match the requested filters")]
    EmptyPool,

    #[error("recommendation count must be positive, got {0}")]
    InvalidCount(i64),

    #[error("question not found: {0}")]
    NotFound(String),

    /// Collaborator (question source / persistence) failure, passed
    /// through unmasked.
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
