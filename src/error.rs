use thiserror::Error;

/// Everything the engine can report. None of these are retryable: the engine
/// does no I/O, so any error is a configuration or logic mistake.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected at `Engine::create`; no engine is returned.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Misuse of the lower-level internals (partial next buffer, wrong
    /// publish mode, mismatched buffer sizes).
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    #[error("cell index {index} out of range for {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A host thread panicked while holding the shared pixel buffer.
    #[error("shared pixel buffer lock poisoned")]
    BufferPoisoned,
}

pub type Result<T> = std::result::Result<T, EngineError>;
