//! Create/edit form lifecycle, independent of any record store.
//!
//! ```text
//! Closed -> Open(create | edit id) -> submit ok  -> Closed (+ Committed)
//!                                  -> submit err -> Open (errors kept)
//!                                  -> cancel     -> Closed
//! ```
//!
//! A store is only ever touched by whoever receives the [`Committed`]
//! value from a successful [`FormMachine::submit`].

use crate::error::{CoreError, FieldError};
use crate::record::Draft;
use crate::types::RecordId;

/// Whether the open form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

impl FormMode {
    pub fn editing_id(self) -> Option<RecordId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<D> {
    Closed,
    Open {
        mode: FormMode,
        draft: D,
        errors: Vec<FieldError>,
    },
}

/// Emitted by a successful submit for the controller to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<D> {
    pub draft: D,
    pub editing_id: Option<RecordId>,
}

#[derive(Debug, Clone)]
pub struct FormMachine<D: Draft> {
    state: FormState<D>,
    required_fields: &'static [&'static str],
}

impl<D: Draft> FormMachine<D> {
    pub fn new(required_fields: &'static [&'static str]) -> Self {
        Self {
            state: FormState::Closed,
            required_fields,
        }
    }

    pub fn state(&self) -> &FormState<D> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.state {
            FormState::Open { mode, .. } => Some(*mode),
            FormState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    /// Inline errors from the last failed submit.
    pub fn errors(&self) -> &[FieldError] {
        match &self.state {
            FormState::Open { errors, .. } => errors,
            FormState::Closed => &[],
        }
    }

    /// Open with an empty draft. Reopening discards any previous draft.
    pub fn open_for_create(&mut self) {
        self.state = FormState::Open {
            mode: FormMode::Create,
            draft: D::empty(),
            errors: Vec::new(),
        };
    }

    /// Open with `draft` copied from the record being edited.
    pub fn open_for_edit(&mut self, id: RecordId, draft: D) {
        self.state = FormState::Open {
            mode: FormMode::Edit(id),
            draft,
            errors: Vec::new(),
        };
    }

    /// Update one draft field. Fails when the form is closed or the value
    /// cannot be parsed for that field.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match &mut self.state {
            FormState::Open { draft, errors, .. } => {
                draft.set_field(field, value)?;
                errors.retain(|e| e.field != field);
                Ok(())
            }
            FormState::Closed => Err(CoreError::Conflict(
                "Cannot edit a field while the form is closed".to_string(),
            )),
        }
    }

    /// Replace the draft with an empty one, keeping the form open in the
    /// same mode.
    pub fn reset(&mut self) {
        if let FormState::Open { draft, errors, .. } = &mut self.state {
            *draft = D::empty();
            errors.clear();
        }
    }

    /// Validate and close. On failure the form stays open with the field
    /// errors recorded.
    pub fn submit(&mut self) -> Result<Committed<D>, CoreError> {
        let FormState::Open {
            mode,
            draft,
            errors,
        } = &mut self.state
        else {
            return Err(CoreError::Conflict(
                "Cannot submit a closed form".to_string(),
            ));
        };

        let mut failures: Vec<FieldError> = self
            .required_fields
            .iter()
            .filter(|field| draft.is_blank(field))
            .map(|field| FieldError::required(field))
            .collect();
        if failures.is_empty() {
            failures = draft.check();
        }

        if !failures.is_empty() {
            *errors = failures.clone();
            return Err(CoreError::InvalidForm(failures));
        }

        let committed = Committed {
            draft: draft.clone(),
            editing_id: mode.editing_id(),
        };
        self.state = FormState::Closed;
        Ok(committed)
    }

    /// Close and discard the draft unconditionally.
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::holidays::{CreateHolidayRequest, HOLIDAY_LIST};
    use crate::types::parse_date;

    fn machine() -> FormMachine<CreateHolidayRequest> {
        FormMachine::new(HOLIDAY_LIST.required_fields)
    }

    #[test]
    fn starts_closed() {
        let form = machine();
        assert!(!form.is_open());
        assert!(form.draft().is_none());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn open_for_create_uses_empty_draft() {
        let mut form = machine();
        form.open_for_create();
        assert_eq!(form.mode(), Some(FormMode::Create));
        assert_eq!(form.draft(), Some(&CreateHolidayRequest::empty()));
    }

    #[test]
    fn submit_missing_required_stays_open() {
        let mut form = machine();
        form.open_for_create();
        form.set_field("start_date", "2024-02-15").unwrap();

        let err = form.submit().unwrap_err();
        assert_matches!(err, CoreError::InvalidForm(ref errs) if errs.len() == 1);
        assert!(form.is_open());
        assert_eq!(form.errors()[0].field, "end_date");
    }

    #[test]
    fn setting_a_field_clears_its_error() {
        let mut form = machine();
        form.open_for_create();
        let _ = form.submit();
        assert_eq!(form.errors().len(), 2);
        form.set_field("end_date", "2024-02-16").unwrap();
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.errors()[0].field, "start_date");
    }

    #[test]
    fn successful_submit_closes_and_commits() {
        let mut form = machine();
        form.open_for_create();
        form.set_field("start_date", "2024-02-15").unwrap();
        form.set_field("end_date", "2024-02-16").unwrap();

        let committed = form.submit().unwrap();
        assert_eq!(committed.editing_id, None);
        assert_eq!(committed.draft.start_date, parse_date("2024-02-15"));
        assert!(!form.is_open());
    }

    #[test]
    fn edit_mode_carries_id() {
        let mut form = machine();
        let draft = CreateHolidayRequest {
            start_date: parse_date("2024-03-20"),
            end_date: parse_date("2024-03-22"),
            reason: "Family event".to_string(),
        };
        form.open_for_edit(2, draft);
        let committed = form.submit().unwrap();
        assert_eq!(committed.editing_id, Some(2));
    }

    #[test]
    fn cancel_discards_draft() {
        let mut form = machine();
        form.open_for_create();
        form.set_field("reason", "Trip").unwrap();
        form.cancel();
        assert!(!form.is_open());
        form.open_for_create();
        assert_eq!(form.draft().unwrap().reason, "");
    }

    #[test]
    fn reset_keeps_mode() {
        let mut form = machine();
        form.open_for_edit(3, CreateHolidayRequest::empty());
        form.set_field("reason", "Trip").unwrap();
        form.reset();
        assert_eq!(form.mode(), Some(FormMode::Edit(3)));
        assert_eq!(form.draft().unwrap().reason, "");
    }

    #[test]
    fn closed_form_rejects_edits_and_submit() {
        let mut form = machine();
        assert_matches!(form.set_field("reason", "x"), Err(CoreError::Conflict(_)));
        assert_matches!(form.submit(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn bad_value_leaves_draft_unchanged() {
        let mut form = machine();
        form.open_for_create();
        assert!(form.set_field("start_date", "soon").is_err());
        assert_eq!(form.draft().unwrap().start_date, None);
    }

    #[test]
    fn domain_check_runs_after_required() {
        let mut form = machine();
        form.open_for_create();
        form.set_field("start_date", "2024-02-16").unwrap();
        form.set_field("end_date", "2024-02-15").unwrap();
        let err = form.submit().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "end_date");
        assert!(form.is_open());
    }
}
