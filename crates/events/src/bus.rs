//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] carries a [`StoreEvent`] for every committed change to a
//! record store. It is shared via `Arc<EventBus>` between the controllers'
//! sinks and the background snapshot writer. Alongside the channel it keeps
//! the newest snapshot per kind, so a lagging subscriber can recover every
//! kind's state rather than only the kinds that happen to follow the gap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use courtdesk_core::types::EntityKind;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// StoreEvent
// ---------------------------------------------------------------------------

/// Full snapshot of one store after a mutation.
///
/// Snapshots rather than deltas: the newest event for a kind always
/// describes the complete collection, so a subscriber that lags can resync
/// from [`LatestSnapshots`] without replaying anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// Unique id, used to correlate log lines.
    pub event_id: Uuid,

    /// Which store changed.
    pub kind: EntityKind,

    /// Number of records in the snapshot.
    pub record_count: usize,

    /// The serialized records (a JSON array).
    pub records: serde_json::Value,

    /// When the change was committed (UTC).
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    pub fn new(kind: EntityKind, records: serde_json::Value) -> Self {
        let record_count = records.as_array().map_or(0, Vec::len);
        Self {
            event_id: Uuid::new_v4(),
            kind,
            record_count,
            records,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// LatestSnapshots
// ---------------------------------------------------------------------------

/// Newest published snapshot for each entity kind.
#[derive(Debug, Default)]
pub struct LatestSnapshots {
    by_kind: Mutex<HashMap<EntityKind, StoreEvent>>,
}

impl LatestSnapshots {
    fn record(&self, event: &StoreEvent) {
        self.by_kind
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(event.kind, event.clone());
    }

    pub fn get(&self, kind: EntityKind) -> Option<StoreEvent> {
        self.by_kind
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned()
    }

    /// One event per kind that has published, in [`EntityKind::ALL`] order.
    pub fn all(&self) -> Vec<StoreEvent> {
        let by_kind = self.by_kind.lock().unwrap_or_else(|e| e.into_inner());
        EntityKind::ALL
            .iter()
            .filter_map(|kind| by_kind.get(kind).cloned())
            .collect()
    }
}

/// A channel receiver paired with the bus's latest-snapshot table.
#[derive(Debug)]
pub struct SnapshotSubscription {
    pub receiver: broadcast::Receiver<StoreEvent>,
    pub latest: Arc<LatestSnapshots>,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use courtdesk_core::types::EntityKind;
/// use courtdesk_events::bus::{EventBus, StoreEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StoreEvent::new(EntityKind::Job, serde_json::json!([])));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
    latest: Arc<LatestSnapshots>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            latest: Arc::default(),
        }
    }

    /// Publish an event to all current subscribers.
    ///
    /// The event always becomes the kind's latest snapshot. With no
    /// subscribers it is otherwise dropped.
    pub fn publish(&self, event: StoreEvent) {
        self.latest.record(&event);
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribe together with the latest-snapshot table. The table handle
    /// does not keep the channel open.
    pub fn subscribe_snapshots(&self) -> SnapshotSubscription {
        SnapshotSubscription {
            receiver: self.sender.subscribe(),
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn latest(&self) -> &LatestSnapshots {
        &self.latest
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
