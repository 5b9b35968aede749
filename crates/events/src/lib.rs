//! Courtdesk store events and snapshot persistence.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoreEvent`]: full snapshot of one record store after a change.
//! - [`BusSink`]: the controllers' persistence seam, publishing to the bus.
//! - [`SnapshotPersistence`]: background service writing snapshots through
//!   a [`SnapshotWriter`].

pub mod bus;
pub mod error;
pub mod persistence;
pub mod sink;

pub use bus::{EventBus, LatestSnapshots, SnapshotSubscription, StoreEvent};
pub use error::PersistError;
pub use persistence::{load_snapshot, JsonFileWriter, SnapshotPersistence, SnapshotWriter};
pub use sink::BusSink;
