//! Court reporting assignments.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::criteria::StatusFilter;
use crate::error::CoreError;
use crate::record::{parse_optional_date, unknown_field, Draft, Record};
use crate::status::Status;
use crate::types::{parse_date, Date, EntityKind, RecordId};
use crate::view::ListConfig;

define_status_enum! {
    /// Assignment lifecycle status.
    JobStatus (initial = New) {
        New => "New",
        Active => "Active",
        Completed => "Completed",
        Cancelled => "Cancelled",
        Rejected => "Rejected",
    }
}

define_status_enum! {
    /// Area of law an assignment belongs to.
    CaseType (initial = FamilyLaw) {
        FamilyLaw => "Family Law",
        Criminal => "Criminal",
        Civil => "Civil",
        Traffic => "Traffic",
        Corporate => "Corporate",
    }
}

pub const JOB_LIST: ListConfig = ListConfig {
    searchable_fields: &["title", "client", "judge", "location"],
    required_fields: &[
        "title",
        "date",
        "time",
        "location",
        "client",
        "judge",
        "case_type",
        "duration",
        "rate",
    ],
};

pub type JobList = RecordListController<Job>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: RecordId,
    pub title: String,
    pub status: JobStatus,
    pub date: Option<Date>,
    pub time: String,
    pub location: String,
    pub client: String,
    pub judge: String,
    pub case_type: Option<CaseType>,
    pub duration: String,
    pub rate: String,
}

/// Draft for the "Add New Job" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub status: JobStatus,
    pub date: Option<Date>,
    pub time: String,
    pub location: String,
    pub client: String,
    pub judge: String,
    pub case_type: Option<CaseType>,
    pub duration: String,
    pub rate: String,
}

/// Partial update. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub status: Option<JobStatus>,
    pub date: Option<Date>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub client: Option<String>,
    pub judge: Option<String>,
    pub case_type: Option<CaseType>,
    pub duration: Option<String>,
    pub rate: Option<String>,
}

impl UpdateJob {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Draft for CreateJob {
    fn empty() -> Self {
        Self {
            title: String::new(),
            status: JobStatus::INITIAL,
            date: None,
            time: String::new(),
            location: String::new(),
            client: String::new(),
            judge: String::new(),
            case_type: None,
            duration: String::new(),
            rate: String::new(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "title" => self.title = value.to_string(),
            "status" => self.status = JobStatus::from_str(value)?,
            "date" => self.date = parse_optional_date(field, value)?,
            "time" => self.time = value.to_string(),
            "location" => self.location = value.to_string(),
            "client" => self.client = value.to_string(),
            "judge" => self.judge = value.to_string(),
            "case_type" => {
                self.case_type = if value.is_empty() {
                    None
                } else {
                    Some(CaseType::from_str(value)?)
                }
            }
            "duration" => self.duration = value.to_string(),
            "rate" => self.rate = value.to_string(),
            other => return Err(unknown_field("job", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "title" => self.title.trim().is_empty(),
            "date" => self.date.is_none(),
            "time" => self.time.trim().is_empty(),
            "location" => self.location.trim().is_empty(),
            "client" => self.client.trim().is_empty(),
            "judge" => self.judge.trim().is_empty(),
            "case_type" => self.case_type.is_none(),
            "duration" => self.duration.trim().is_empty(),
            "rate" => self.rate.trim().is_empty(),
            _ => false,
        }
    }
}

impl Record for Job {
    type Status = JobStatus;
    type Draft = CreateJob;
    type Patch = UpdateJob;

    const KIND: EntityKind = EntityKind::Job;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn date(&self) -> Option<Date> {
        self.date
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "client" => Some(&self.client),
            "judge" => Some(&self.judge),
            "location" => Some(&self.location),
            "time" => Some(&self.time),
            "case_type" => self.case_type.map(CaseType::as_str),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateJob) -> Self {
        Self {
            id,
            title: draft.title,
            status: draft.status,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            client: draft.client,
            judge: draft.judge,
            case_type: draft.case_type,
            duration: draft.duration,
            rate: draft.rate,
        }
    }

    fn to_draft(&self) -> CreateJob {
        CreateJob {
            title: self.title.clone(),
            status: self.status,
            date: self.date,
            time: self.time.clone(),
            location: self.location.clone(),
            client: self.client.clone(),
            judge: self.judge.clone(),
            case_type: self.case_type,
            duration: self.duration.clone(),
            rate: self.rate.clone(),
        }
    }

    fn merge_draft(&mut self, draft: CreateJob) {
        *self = Self::from_draft(self.id, draft);
    }

    fn apply_patch(&mut self, patch: UpdateJob) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.date {
            self.date = Some(v);
        }
        if let Some(v) = patch.time {
            self.time = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.client {
            self.client = v;
        }
        if let Some(v) = patch.judge {
            self.judge = v;
        }
        if let Some(v) = patch.case_type {
            self.case_type = Some(v);
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.rate {
            self.rate = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Page labels
// ---------------------------------------------------------------------------

/// List heading for the active tab: `"All Jobs"` or `"<Status> Jobs"`.
pub fn list_heading(filter: StatusFilter<JobStatus>) -> String {
    match filter {
        StatusFilter::All => "All Jobs".to_string(),
        StatusFilter::Only(status) => format!("{status} Jobs"),
    }
}

/// `"(1 job)"` / `"(n jobs)"`.
pub fn count_label(count: usize) -> String {
    let noun = if count == 1 { "job" } else { "jobs" };
    format!("({count} {noun})")
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn job(
    id: RecordId,
    title: &str,
    status: JobStatus,
    date: &str,
    time: &str,
    location: &str,
    client: &str,
    judge: &str,
    case_type: CaseType,
    duration: &str,
    rate: &str,
) -> Job {
    Job {
        id,
        title: title.to_string(),
        status,
        date: parse_date(date),
        time: time.to_string(),
        location: location.to_string(),
        client: client.to_string(),
        judge: judge.to_string(),
        case_type: Some(case_type),
        duration: duration.to_string(),
        rate: rate.to_string(),
    }
}

#[rustfmt::skip]
pub fn seed_jobs() -> Vec<Job> {
    use CaseType::*;
    use JobStatus::*;
    vec![
        job(1, "Family Court Hearing", New, "2024-01-15", "09:00 AM", "Courtroom 101",
            "Smith vs Johnson", "Judge Smith", FamilyLaw, "2 hours", "$75/hour"),
        job(2, "Criminal Case Deposition", Active, "2024-01-16", "02:00 PM", "Conference Room A",
            "State vs Brown", "Judge Johnson", Criminal, "3 hours", "$85/hour"),
        job(3, "Civil Litigation", Completed, "2024-01-10", "10:30 AM", "Courtroom 205",
            "ABC Corp vs XYZ Inc", "Judge Williams", Civil, "4 hours", "$90/hour"),
        job(4, "Traffic Court Session", Cancelled, "2024-01-12", "11:00 AM", "Courtroom 102",
            "City vs Multiple", "Judge Davis", Traffic, "1 hour", "$65/hour"),
        job(5, "Contract Review Meeting", Rejected, "2024-01-18", "03:30 PM", "Law Office Building",
            "Corporate Client", "N/A", Corporate, "2 hours", "$100/hour"),
        job(6, "Divorce Proceeding", New, "2024-01-20", "01:00 PM", "Courtroom 301",
            "Wilson vs Wilson", "Judge Martinez", FamilyLaw, "3 hours", "$75/hour"),
    ]
}

/// Jobs page controller over the seed assignments.
pub fn job_controller() -> Result<JobList, CoreError> {
    RecordListController::with_records(JOB_LIST, seed_jobs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_status_distribution() {
        let ctl = job_controller().unwrap();
        let view = ctl.view();
        assert_eq!(view.count(StatusFilter::All), 6);
        assert_eq!(view.count(StatusFilter::Only(JobStatus::New)), 2);
        for status in [
            JobStatus::Active,
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::Rejected,
        ] {
            assert_eq!(view.count(StatusFilter::Only(status)), 1);
        }
    }

    #[test]
    fn empty_draft_defaults_to_new() {
        let draft = CreateJob::empty();
        assert_eq!(draft.status, JobStatus::New);
        assert!(draft.is_blank("title"));
        assert!(draft.is_blank("case_type"));
        assert!(!draft.is_blank("status"));
    }

    #[test]
    fn set_field_parses_case_type_and_status() {
        let mut draft = CreateJob::empty();
        draft.set_field("case_type", "Family Law").unwrap();
        draft.set_field("status", "Active").unwrap();
        assert_eq!(draft.case_type, Some(CaseType::FamilyLaw));
        assert_eq!(draft.status, JobStatus::Active);
        assert!(draft.set_field("case_type", "Maritime").is_err());
        assert!(draft.set_field("salary", "1").is_err());
    }

    #[test]
    fn patch_preserves_untouched_fields() {
        let mut job = seed_jobs().remove(0);
        let original = job.clone();
        job.apply_patch(UpdateJob {
            location: Some("Courtroom 9".to_string()),
            ..UpdateJob::default()
        });
        assert_eq!(job.id, original.id);
        assert_eq!(job.location, "Courtroom 9");
        assert_eq!(job.title, original.title);
        assert_eq!(job.status, original.status);
        assert_eq!(job.rate, original.rate);
    }

    #[test]
    fn headings() {
        assert_eq!(list_heading(StatusFilter::All), "All Jobs");
        assert_eq!(list_heading(StatusFilter::Only(JobStatus::Cancelled)), "Cancelled Jobs");
        assert_eq!(count_label(1), "(1 job)");
        assert_eq!(count_label(0), "(0 jobs)");
    }

    #[test]
    fn new_job_ids_continue_after_seed() {
        let mut ctl = job_controller().unwrap();
        ctl.delete_record(6);
        let mut draft = CreateJob::empty();
        draft.title = "Late Addition".to_string();
        assert_eq!(ctl.add_record(draft).id, 7);
    }
}
