//! Durable snapshot persistence service.
//!
//! [`SnapshotPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and hands every [`StoreEvent`] to a [`SnapshotWriter`]. It runs as a
//! long-lived background task and shuts down when the bus is dropped. After
//! falling behind it rewrites the newest snapshot of every kind.
//! [`load_snapshot`] reads a saved collection back at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use courtdesk_core::record::Record;
use courtdesk_core::types::EntityKind;
use tokio::sync::broadcast;

use crate::bus::{SnapshotSubscription, StoreEvent};
use crate::error::PersistError;

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Destination for store snapshots.
#[async_trait]
pub trait SnapshotWriter: Send + Sync {
    async fn write(&self, event: &StoreEvent) -> Result<(), PersistError>;
}

/// Writes one pretty-printed JSON file per entity kind under `dir`.
///
/// Each write goes to a temporary file first and is renamed into place, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    dir: PathBuf,
}

impl JsonFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Snapshot file for `kind` under `dir`, e.g. `<dir>/job.json`.
pub fn snapshot_path(dir: &Path, kind: EntityKind) -> PathBuf {
    dir.join(format!("{}.json", kind.as_str()))
}

#[async_trait]
impl SnapshotWriter for JsonFileWriter {
    async fn write(&self, event: &StoreEvent) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistError::io(&self.dir, e))?;

        let path = snapshot_path(&self.dir, event.kind);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&event.records)?;

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| PersistError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PersistError::io(&path, e))?;
        Ok(())
    }
}

/// Read the snapshot for `R` from `dir`. A missing file is `Ok(None)`.
pub async fn load_snapshot<R: Record>(dir: &Path) -> Result<Option<Vec<R>>, PersistError> {
    let path = snapshot_path(dir, R::KIND);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistError::io(&path, e)),
    };
    let records = serde_json::from_slice(&bytes).map_err(|source| PersistError::Malformed {
        kind: R::KIND,
        source,
    })?;
    Ok(Some(records))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Background service that persists store snapshots.
pub struct SnapshotPersistence;

impl SnapshotPersistence {
    /// Run the persistence loop.
    ///
    /// Writes every event received on the subscription. Write failures are
    /// logged and do not stop the loop. When the receiver lags, the newest
    /// snapshot of every kind is written before continuing, so a kind whose
    /// last event was skipped is not left stale. The loop exits when the
    /// channel is closed (i.e. the [`EventBus`](crate::bus::EventBus) is
    /// dropped).
    pub async fn run(writer: Arc<dyn SnapshotWriter>, subscription: SnapshotSubscription) {
        let SnapshotSubscription {
            mut receiver,
            latest,
        } = subscription;
        loop {
            match receiver.recv().await {
                Ok(event) => persist(writer.as_ref(), &event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    let snapshots = latest.all();
                    tracing::warn!(
                        skipped = n,
                        kinds = snapshots.len(),
                        "Snapshot persistence lagged, rewriting latest snapshots"
                    );
                    for event in &snapshots {
                        persist(writer.as_ref(), event).await;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, snapshot persistence shutting down");
                    break;
                }
            }
        }
    }
}

async fn persist(writer: &dyn SnapshotWriter, event: &StoreEvent) {
    match writer.write(event).await {
        Ok(()) => tracing::debug!(
            event_id = %event.event_id,
            kind = %event.kind,
            count = event.record_count,
            "Snapshot persisted"
        ),
        Err(e) => tracing::error!(
            error = %e,
            event_id = %event.event_id,
            kind = %event.kind,
            "Failed to persist snapshot"
        ),
    }
}

#[cfg(test)]
mod tests {
    use courtdesk_core::jobs::{seed_jobs, Job};

    use super::*;

    #[tokio::test]
    async fn write_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonFileWriter::new(dir.path());
        let jobs = seed_jobs();

        let event = StoreEvent::new(EntityKind::Job, serde_json::to_value(&jobs).unwrap());
        writer.write(&event).await.unwrap();

        let loaded: Vec<Job> = load_snapshot(dir.path()).await.unwrap().unwrap();
        assert_eq!(loaded, jobs);
        assert!(!snapshot_path(dir.path(), EntityKind::Job)
            .with_extension("json.tmp")
            .exists());
    }

    #[tokio::test]
    async fn missing_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_snapshot::<Job>(dir.path()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn malformed_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(snapshot_path(dir.path(), EntityKind::Job), b"{not json").unwrap();
        let err = load_snapshot::<Job>(dir.path()).await.unwrap_err();
        assert!(matches!(err, PersistError::Malformed { kind: EntityKind::Job, .. }));
    }
}
