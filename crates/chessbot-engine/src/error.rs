use std::path::PathBuf;

/// Errors returned by the engine adapter.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("engine at '{}' could not be started: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },
    #[error("invalid position '{fen}': {reason}")]
    InvalidPosition { fen: String, reason: String },
    #[error("engine did not answer '{waiting_for}' within {after_ms} ms")]
    Timeout { waiting_for: String, after_ms: u64 },
    #[error("engine process exited unexpectedly")]
    Exited,
    #[error("unexpected engine output: {0}")]
    Protocol(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
