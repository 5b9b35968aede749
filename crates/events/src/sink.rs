//! Bridge from the synchronous controller seam to the async bus.

use std::sync::Arc;

use courtdesk_core::controller::RecordSink;
use courtdesk_core::record::Record;
use courtdesk_core::types::EntityKind;

use crate::bus::{EventBus, StoreEvent};

/// [`RecordSink`] that publishes a [`StoreEvent`] snapshot per change.
///
/// Publishing never blocks: the broadcast send is synchronous and bounded.
#[derive(Clone)]
pub struct BusSink {
    bus: Arc<EventBus>,
}

impl BusSink {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl<R: Record> RecordSink<R> for BusSink {
    fn records_changed(&self, kind: EntityKind, records: &[R]) {
        match serde_json::to_value(records) {
            Ok(value) => {
                let event = StoreEvent::new(kind, value);
                tracing::debug!(
                    event_id = %event.event_id,
                    kind = %kind,
                    count = event.record_count,
                    "Publishing store snapshot"
                );
                self.bus.publish(event);
            }
            Err(e) => {
                tracing::error!(error = %e, kind = %kind, "Failed to serialize store snapshot");
            }
        }
    }
}
