//! Record list controller: one store, one set of criteria, one form,
//! composed into the commands a page needs.
//!
//! Every command runs to completion synchronously, so the next
//! [`RecordListController::view`] always reflects it. Destructive commands
//! run unconditionally; asking the user for confirmation is the caller's
//! job (see [`crate::confirm`]).

use std::sync::Arc;

use crate::criteria::{Criteria, CriteriaDelta, DateRange, StatusFilter};
use crate::error::CoreError;
use crate::form::{Committed, FormMachine};
use crate::pending::{InFlight, MutationTicket, Outcome};
use crate::record::Record;
use crate::store::RecordStore;
use crate::types::{EntityKind, RecordId};
use crate::view::{DerivedView, ListConfig};

/// Persistence seam called after every successful mutation.
///
/// Implementations must not block and must not fail the caller: errors are
/// theirs to log. The local mutation is never rolled back.
pub trait RecordSink<R: Record>: Send + Sync {
    fn records_changed(&self, kind: EntityKind, records: &[R]);
}

/// What a committed form did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<R> {
    Created(R),
    Updated(R),
    /// The record being edited was deleted while the form was open.
    Missing(RecordId),
}

pub struct RecordListController<R: Record> {
    config: ListConfig,
    store: RecordStore<R>,
    criteria: Criteria<R::Status>,
    form: FormMachine<R::Draft>,
    in_flight: InFlight,
    sink: Option<Arc<dyn RecordSink<R>>>,
}

impl<R: Record> std::fmt::Debug for RecordListController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordListController")
            .field("kind", &R::KIND)
            .field("records", &self.store.len())
            .field("criteria", &self.criteria)
            .field("form_open", &self.form.is_open())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl<R: Record> RecordListController<R> {
    pub fn new(config: ListConfig, store: RecordStore<R>) -> Self {
        Self {
            form: FormMachine::new(config.required_fields),
            config,
            store,
            criteria: Criteria::default(),
            in_flight: InFlight::default(),
            sink: None,
        }
    }

    /// Controller over `records` (seed data or a loaded snapshot).
    pub fn with_records(config: ListConfig, records: Vec<R>) -> Result<Self, CoreError> {
        Ok(Self::new(config, RecordStore::from_records(records)?))
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink<R>>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn criteria(&self) -> &Criteria<R::Status> {
        &self.criteria
    }

    pub fn records(&self) -> &[R] {
        self.store.all()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.store.get(id)
    }

    // -- view ---------------------------------------------------------------

    /// Fresh projection of the store under the current criteria.
    pub fn view(&self) -> DerivedView<R> {
        DerivedView::compute(self.store.all(), &self.criteria, &self.config)
    }

    // -- criteria -----------------------------------------------------------

    pub fn set_filter(&mut self, delta: CriteriaDelta<R::Status>) {
        self.criteria.apply(delta);
        tracing::debug!(kind = %R::KIND, criteria = ?self.criteria, "Filter changed");
    }

    pub fn set_status_filter(&mut self, status: StatusFilter<R::Status>) {
        self.set_filter(CriteriaDelta::status(status));
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.set_filter(CriteriaDelta::search(text));
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.set_filter(CriteriaDelta::date_range(range));
    }

    pub fn clear_filters(&mut self) {
        self.criteria = Criteria::default();
    }

    // -- mutations ----------------------------------------------------------

    /// Store `draft` as a new record. No validation at this layer.
    pub fn add_record(&mut self, draft: R::Draft) -> R {
        let record = self.store.add(draft).clone();
        tracing::debug!(kind = %R::KIND, id = record.id(), "Record added");
        self.notify();
        record
    }

    /// Merge `patch` into record `id`. Missing ids are a silent no-op.
    pub fn edit_record(&mut self, id: RecordId, patch: R::Patch) -> bool {
        let updated = self.store.update(id, patch);
        if updated {
            tracing::debug!(kind = %R::KIND, id, "Record updated");
            self.notify();
        }
        updated
    }

    /// Remove record `id`. Missing ids are a silent no-op.
    pub fn delete_record(&mut self, id: RecordId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            tracing::debug!(kind = %R::KIND, id, "Record deleted");
            self.notify();
        }
        removed
    }

    /// Apply `f` to every record (bulk edit).
    pub fn edit_all(&mut self, f: impl FnMut(&mut R)) {
        self.store.update_all(f);
        tracing::debug!(kind = %R::KIND, count = self.store.len(), "Bulk update");
        self.notify();
    }

    /// Keep only records matching `keep` (bulk delete). Returns the number
    /// removed.
    pub fn retain(&mut self, keep: impl FnMut(&R) -> bool) -> usize {
        let removed = self.store.retain(keep);
        if removed > 0 {
            tracing::debug!(kind = %R::KIND, removed, "Bulk delete");
            self.notify();
        }
        removed
    }

    // -- form ---------------------------------------------------------------

    pub fn form(&self) -> &FormMachine<R::Draft> {
        &self.form
    }

    pub fn open_create_form(&mut self) {
        self.form.open_for_create();
    }

    /// Open the edit form pre-filled from record `id`.
    pub fn open_edit_form(&mut self, id: RecordId) -> Result<(), CoreError> {
        let record = self.store.get(id).ok_or(CoreError::NotFound {
            entity: R::KIND.as_str(),
            id,
        })?;
        let draft = record.to_draft();
        self.form.open_for_edit(id, draft);
        Ok(())
    }

    pub fn set_form_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        self.form.set_field(field, value)
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Submit the open form and apply the committed draft to the store.
    pub fn submit_form(&mut self) -> Result<FormOutcome<R>, CoreError> {
        let committed = self.form.submit()?;
        Ok(self.apply_committed(committed))
    }

    fn apply_committed(&mut self, committed: Committed<R::Draft>) -> FormOutcome<R> {
        match committed.editing_id {
            None => FormOutcome::Created(self.add_record(committed.draft)),
            Some(id) => {
                if !self.store.merge_draft(id, committed.draft) {
                    tracing::debug!(kind = %R::KIND, id, "Edited record no longer exists");
                    return FormOutcome::Missing(id);
                }
                tracing::debug!(kind = %R::KIND, id, "Record updated from form");
                self.notify();
                match self.store.get(id) {
                    Some(record) => FormOutcome::Updated(record.clone()),
                    None => FormOutcome::Missing(id),
                }
            }
        }
    }

    // -- in-flight mutations ------------------------------------------------

    /// Claim record `id` for a remote mutation. A second claim on the same
    /// id before [`settle_mutation`](Self::settle_mutation) is rejected.
    pub fn begin_mutation(&mut self, id: RecordId) -> Result<MutationTicket, CoreError> {
        if self.store.get(id).is_none() {
            return Err(CoreError::NotFound {
                entity: R::KIND.as_str(),
                id,
            });
        }
        self.in_flight.begin(id)
    }

    /// Release the claim. A failed outcome is logged; the local state is
    /// kept as is.
    pub fn settle_mutation(&mut self, ticket: MutationTicket, outcome: &Outcome) {
        if let Outcome::Failure(reason) = outcome {
            tracing::warn!(kind = %R::KIND, id = ticket.id(), %reason, "Remote mutation failed");
        }
        self.in_flight.settle(ticket);
    }

    pub fn is_mutation_in_flight(&self, id: RecordId) -> bool {
        self.in_flight.is_in_flight(id)
    }

    fn notify(&self) {
        if let Some(sink) = &self.sink {
            sink.records_changed(R::KIND, self.store.all());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;
    use crate::jobs::{job_controller, CreateJob, Job, JobStatus, UpdateJob};
    use crate::types::parse_date;

    #[derive(Default)]
    struct CountingSink {
        calls: Mutex<Vec<usize>>,
    }

    impl RecordSink<Job> for CountingSink {
        fn records_changed(&self, _kind: EntityKind, records: &[Job]) {
            self.calls.lock().unwrap().push(records.len());
        }
    }

    fn full_draft(title: &str) -> CreateJob {
        CreateJob {
            title: title.to_string(),
            status: JobStatus::New,
            date: parse_date("2024-02-01"),
            time: "09:00 AM".to_string(),
            location: "Courtroom 7".to_string(),
            client: "Doe vs Roe".to_string(),
            judge: "Judge Park".to_string(),
            case_type: Some(crate::jobs::CaseType::Civil),
            duration: "1 hour".to_string(),
            rate: "$80/hour".to_string(),
        }
    }

    #[test]
    fn add_then_view_reflects_change() {
        let mut ctl = job_controller().unwrap();
        let job = ctl.add_record(full_draft("Arraignment"));
        assert_eq!(job.id, 7);
        assert_eq!(job.status, JobStatus::New);
        let view = ctl.view();
        assert_eq!(view.counts.all, 7);
        assert_eq!(view.visible.last().unwrap().title, "Arraignment");
    }

    #[test]
    fn edit_missing_is_silent() {
        let mut ctl = job_controller().unwrap();
        let before = ctl.records().to_vec();
        assert!(!ctl.edit_record(99, UpdateJob::status(JobStatus::Active)));
        assert_eq!(ctl.records(), before.as_slice());
    }

    #[test]
    fn sink_is_called_after_each_mutation() {
        let sink = Arc::new(CountingSink::default());
        let mut ctl = job_controller().unwrap().with_sink(sink.clone());
        ctl.add_record(full_draft("A"));
        ctl.delete_record(1);
        ctl.delete_record(1); // no-op, no call
        ctl.edit_record(2, UpdateJob::status(JobStatus::Completed));
        assert_eq!(*sink.calls.lock().unwrap(), vec![7, 6, 6]);
    }

    #[test]
    fn submit_create_form_adds_record() {
        let mut ctl = job_controller().unwrap();
        ctl.open_create_form();
        for (field, value) in [
            ("title", "Deposition"),
            ("date", "2024-02-02"),
            ("time", "10:00 AM"),
            ("location", "Room 4"),
            ("client", "Acme"),
            ("judge", "N/A"),
            ("case_type", "Corporate"),
            ("duration", "2 hours"),
            ("rate", "$100/hour"),
        ] {
            ctl.set_form_field(field, value).unwrap();
        }
        let outcome = ctl.submit_form().unwrap();
        assert_matches!(outcome, FormOutcome::Created(ref job) if job.title == "Deposition");
        assert!(!ctl.form().is_open());
        assert_eq!(ctl.records().len(), 7);
    }

    #[test]
    fn invalid_submit_does_not_touch_store() {
        let mut ctl = job_controller().unwrap();
        ctl.open_create_form();
        ctl.set_form_field("title", "Only a title").unwrap();
        assert_matches!(ctl.submit_form(), Err(CoreError::InvalidForm(_)));
        assert_eq!(ctl.records().len(), 6);
        assert!(ctl.form().is_open());
    }

    #[test]
    fn edit_form_round_trip() {
        let mut ctl = job_controller().unwrap();
        ctl.open_edit_form(2).unwrap();
        ctl.set_form_field("location", "Conference Room B").unwrap();
        let outcome = ctl.submit_form().unwrap();
        assert_matches!(outcome, FormOutcome::Updated(ref job) if job.id == 2);
        assert_eq!(ctl.get(2).unwrap().location, "Conference Room B");
        assert_eq!(ctl.get(2).unwrap().title, "Criminal Case Deposition");
    }

    #[test]
    fn edit_form_for_deleted_record_reports_missing() {
        let mut ctl = job_controller().unwrap();
        ctl.open_edit_form(2).unwrap();
        ctl.delete_record(2);
        assert_eq!(ctl.submit_form().unwrap(), FormOutcome::Missing(2));
        assert_eq!(ctl.records().len(), 5);
    }

    #[test]
    fn open_edit_for_missing_is_not_found() {
        let mut ctl = job_controller().unwrap();
        assert_matches!(
            ctl.open_edit_form(42),
            Err(CoreError::NotFound { entity: "job", id: 42 })
        );
    }

    #[test]
    fn one_in_flight_mutation_per_id() {
        let mut ctl = job_controller().unwrap();
        let ticket = ctl.begin_mutation(1).unwrap();
        assert!(ctl.is_mutation_in_flight(1));
        assert_matches!(ctl.begin_mutation(1), Err(CoreError::Conflict(_)));
        ctl.settle_mutation(ticket, &Outcome::Failure("timeout".into()));
        assert!(!ctl.is_mutation_in_flight(1));
        assert_matches!(ctl.begin_mutation(404), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn retain_only_notifies_when_something_removed() {
        let sink = Arc::new(CountingSink::default());
        let mut ctl = job_controller().unwrap().with_sink(sink.clone());
        assert_eq!(ctl.retain(|_| true), 0);
        assert_eq!(ctl.retain(|j| j.status != JobStatus::New), 2);
        assert_eq!(*sink.calls.lock().unwrap(), vec![4]);
    }
}
