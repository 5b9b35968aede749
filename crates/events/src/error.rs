use std::path::PathBuf;

use courtdesk_core::types::EntityKind;

/// Failures of the snapshot persistence layer.
///
/// These never reach a controller: the background writer logs them and
/// keeps running.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {kind} snapshot: {source}")]
    Malformed {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
