//! Time-off requests.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::error::{CoreError, FieldError};
use crate::record::{parse_optional_date, unknown_field, Draft, Record};
use crate::types::{parse_date, Date, EntityKind, RecordId};
use crate::view::ListConfig;

define_status_enum! {
    /// Approval state of a time-off request.
    HolidayStatus (initial = Pending) {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

pub const HOLIDAY_LIST: ListConfig = ListConfig {
    searchable_fields: &["reason"],
    required_fields: &["start_date", "end_date"],
};

pub type HolidayList = RecordListController<HolidayRequest>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayRequest {
    pub id: RecordId,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub reason: String,
    pub status: HolidayStatus,
    pub days_count: i64,
}

impl HolidayRequest {
    pub fn is_editable(&self) -> bool {
        self.status == HolidayStatus::Pending
    }
}

/// Draft for the "New Time Off Request" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHolidayRequest {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub reason: String,
}

/// Reviewer decision or correction. Leaves the day count consistent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateHolidayRequest {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub reason: Option<String>,
    pub status: Option<HolidayStatus>,
}

impl UpdateHolidayRequest {
    pub fn status(status: HolidayStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Inclusive day span between two dates, order-insensitive. Zero when either
/// end is missing.
pub fn days_between_inclusive(start: Option<Date>, end: Option<Date>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days().abs() + 1,
        _ => 0,
    }
}

impl Draft for CreateHolidayRequest {
    fn empty() -> Self {
        Self {
            start_date: None,
            end_date: None,
            reason: String::new(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "start_date" => self.start_date = parse_optional_date(field, value)?,
            "end_date" => self.end_date = parse_optional_date(field, value)?,
            "reason" => self.reason = value.to_string(),
            other => return Err(unknown_field("holiday", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "start_date" => self.start_date.is_none(),
            "end_date" => self.end_date.is_none(),
            "reason" => self.reason.trim().is_empty(),
            _ => false,
        }
    }

    fn check(&self) -> Vec<FieldError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => vec![FieldError::new(
                "end_date",
                "End date must be on or after the start date",
            )],
            _ => Vec::new(),
        }
    }
}

impl Record for HolidayRequest {
    type Status = HolidayStatus;
    type Draft = CreateHolidayRequest;
    type Patch = UpdateHolidayRequest;

    const KIND: EntityKind = EntityKind::Holiday;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> HolidayStatus {
        self.status
    }

    fn date(&self) -> Option<Date> {
        self.start_date
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "reason" => Some(&self.reason),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateHolidayRequest) -> Self {
        Self {
            id,
            days_count: days_between_inclusive(draft.start_date, draft.end_date),
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            status: HolidayStatus::Pending,
        }
    }

    fn to_draft(&self) -> CreateHolidayRequest {
        CreateHolidayRequest {
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason.clone(),
        }
    }

    /// An edited request goes back to review.
    fn merge_draft(&mut self, draft: CreateHolidayRequest) {
        *self = Self::from_draft(self.id, draft);
    }

    fn apply_patch(&mut self, patch: UpdateHolidayRequest) {
        if let Some(v) = patch.start_date {
            self.start_date = Some(v);
        }
        if let Some(v) = patch.end_date {
            self.end_date = Some(v);
        }
        if let Some(v) = patch.reason {
            self.reason = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.days_count = days_between_inclusive(self.start_date, self.end_date);
    }
}

impl RecordListController<HolidayRequest> {
    /// Open the edit form for a request still awaiting review.
    pub fn open_request_edit(&mut self, id: RecordId) -> Result<(), CoreError> {
        let request = self.get(id).ok_or(CoreError::NotFound {
            entity: EntityKind::Holiday.as_str(),
            id,
        })?;
        if !request.is_editable() {
            return Err(CoreError::Conflict(format!(
                "Holiday request {id} is {} and can no longer be edited",
                request.status
            )));
        }
        self.open_edit_form(id)
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HolidayStats {
    pub approved_days: i64,
    pub pending_days: i64,
    pub total_requests: usize,
}

impl HolidayStats {
    pub fn compute(requests: &[HolidayRequest]) -> Self {
        let days_with = |status: HolidayStatus| -> i64 {
            requests
                .iter()
                .filter(|r| r.status == status)
                .map(|r| r.days_count)
                .sum()
        };
        Self {
            approved_days: days_with(HolidayStatus::Approved),
            pending_days: days_with(HolidayStatus::Pending),
            total_requests: requests.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

fn request(
    id: RecordId,
    start: &str,
    end: &str,
    reason: &str,
    status: HolidayStatus,
) -> HolidayRequest {
    let (start_date, end_date) = (parse_date(start), parse_date(end));
    HolidayRequest {
        id,
        start_date,
        end_date,
        reason: reason.to_string(),
        status,
        days_count: days_between_inclusive(start_date, end_date),
    }
}

pub fn seed_holidays() -> Vec<HolidayRequest> {
    use HolidayStatus::*;
    vec![
        request(1, "2024-02-15", "2024-02-16", "Personal vacation", Approved),
        request(2, "2024-03-20", "2024-03-22", "Family event", Pending),
        request(3, "2024-01-10", "2024-01-10", "Medical appointment", Approved),
    ]
}

pub fn holiday_controller() -> Result<HolidayList, CoreError> {
    RecordListController::with_records(HOLIDAY_LIST, seed_holidays())
}
