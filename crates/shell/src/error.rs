use std::path::PathBuf;

use courtdesk_core::error::CoreError;
use courtdesk_events::PersistError;

/// Shell-level error type.
///
/// Wraps [`CoreError`] for domain errors and [`PersistError`] for snapshot
/// loading, and adds configuration and session I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    /// An environment variable holds an unusable value.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session store error at {path}: {source}")]
    Session {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ShellResult<T> = Result<T, ShellError>;
