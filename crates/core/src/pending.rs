//! Pending/settled bookkeeping for operations that stand in for a future
//! network call (profile save, settings save, calendar connect, per-record
//! remote mutations).

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// UI-facing status of a save-like operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Pending,
    Settled(Outcome),
}

impl SaveStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Enter `Pending`. Fails if an operation is already in flight.
    pub fn begin(&mut self) -> Result<(), CoreError> {
        if self.is_pending() {
            return Err(CoreError::Conflict(
                "An operation is already in progress".to_string(),
            ));
        }
        *self = Self::Pending;
        Ok(())
    }

    pub fn settle(&mut self, outcome: Outcome) {
        *self = Self::Settled(outcome);
    }
}

/// Proof that a mutation on `id` is in flight. Hand it back to
/// [`InFlight::settle`] when the operation completes.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an unsettled ticket keeps the record locked"]
pub struct MutationTicket {
    id: RecordId,
}

impl MutationTicket {
    pub fn id(&self) -> RecordId {
        self.id
    }
}

/// At most one in-flight mutation per record id.
#[derive(Debug, Default)]
pub struct InFlight {
    ids: HashSet<RecordId>,
}

impl InFlight {
    pub fn begin(&mut self, id: RecordId) -> Result<MutationTicket, CoreError> {
        if !self.ids.insert(id) {
            return Err(CoreError::Conflict(format!(
                "Record {id} already has a mutation in progress"
            )));
        }
        Ok(MutationTicket { id })
    }

    pub fn settle(&mut self, ticket: MutationTicket) {
        self.ids.remove(&ticket.id);
    }

    pub fn is_in_flight(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
