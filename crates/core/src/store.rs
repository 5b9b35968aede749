//! Canonical in-memory collection for one entity kind.
//!
//! The store is the only place record ids are assigned. Ids come from a
//! monotonic counter that is never decremented, so deleting a record and
//! adding another can never hand out the same id twice.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::record::Record;
use crate::types::RecordId;

/// First id handed out by an empty store.
pub const FIRST_RECORD_ID: RecordId = 1;

/// Largest id accepted from loaded records. Keeps the counter far away from
/// `i64::MAX`.
pub const MAX_LOADED_ID: RecordId = i64::MAX / 2;

#[derive(Debug, Clone)]
pub struct RecordStore<R: Record> {
    records: Vec<R>,
    next_id: RecordId,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_RECORD_ID,
        }
    }

    /// Build a store over existing records (seed data or a loaded snapshot).
    ///
    /// The counter resumes after the largest id present. Duplicate ids and
    /// ids outside `FIRST_RECORD_ID..=MAX_LOADED_ID` are rejected.
    pub fn from_records(records: Vec<R>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !(FIRST_RECORD_ID..=MAX_LOADED_ID).contains(&record.id()) {
                return Err(CoreError::Validation(format!(
                    "{} id {} is out of range",
                    R::KIND,
                    record.id()
                )));
            }
            if !seen.insert(record.id()) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate {} id {} in loaded records",
                    R::KIND,
                    record.id()
                )));
            }
        }
        let next_id = records
            .iter()
            .map(Record::id)
            .max()
            .map_or(FIRST_RECORD_ID, |max| max.saturating_add(1));
        Ok(Self { records, next_id })
    }

    /// Append a record built from `draft` under a fresh id.
    pub fn add(&mut self, draft: R::Draft) -> &R {
        let id = self.next_id;
        self.next_id = id.saturating_add(1);
        self.records.push(R::from_draft(id, draft));
        let index = self.records.len() - 1;
        &self.records[index]
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// a missing id is a no-op.
    pub fn remove(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    /// Merge `patch` into the record with `id`. Returns whether a record was
    /// updated; a missing id is a no-op.
    pub fn update(&mut self, id: RecordId, patch: R::Patch) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Merge an edit-form draft into the record with `id`.
    pub fn merge_draft(&mut self, id: RecordId, draft: R::Draft) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.merge_draft(draft);
                true
            }
            None => false,
        }
    }

    /// Apply `f` to every record in place. Ids are store-owned: any id the
    /// closure writes is put back.
    pub fn update_all(&mut self, mut f: impl FnMut(&mut R)) {
        for record in &mut self.records {
            let id = record.id();
            f(record);
            record.set_id(id);
        }
    }

    /// Keep only records matching `keep`; returns how many were removed.
    pub fn retain(&mut self, keep: impl FnMut(&R) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn get_mut(&mut self, id: RecordId) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// The live collection in insertion order.
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }
}
