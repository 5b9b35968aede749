//! Filter, search and date-range criteria owned by a page.
//!
//! Criteria are plain values: changing them never touches records.

use serde::{Deserialize, Serialize};

use crate::status::Status;
use crate::types::Date;

/// Label of the catch-all filter tab.
pub const ALL_LABEL: &str = "All";

/// Status tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S: Status> StatusFilter<S> {
    pub fn matches(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => ALL_LABEL,
            Self::Only(s) => s.label(),
        }
    }

    /// `All` followed by every status, in tab order.
    pub fn tabs() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(S::ALL.iter().copied().map(Self::Only))
            .collect()
    }

    /// Parse a tab label (`"All"` or a status label).
    pub fn parse(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case(ALL_LABEL) {
            return Some(Self::All);
        }
        S::ALL
            .iter()
            .copied()
            .find(|s| s.label() == label)
            .map(Self::Only)
    }
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        Self::All
    }
}

/// Inclusive date window. An open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn new(from: Option<Date>, to: Option<Date>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria<S> {
    pub status: StatusFilter<S>,
    pub search_text: String,
    pub date_range: Option<DateRange>,
}

impl<S> Default for Criteria<S> {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            search_text: String::new(),
            date_range: None,
        }
    }
}

impl<S: Status> Criteria<S> {
    pub fn with_status(mut self, status: StatusFilter<S>) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Whether any filter narrows the collection.
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || !self.search_text.trim().is_empty()
            || self.date_range.is_some_and(|r| !r.is_unbounded())
    }

    pub fn apply(&mut self, delta: CriteriaDelta<S>) {
        if let Some(status) = delta.status {
            self.status = status;
        }
        if let Some(text) = delta.search_text {
            self.search_text = text;
        }
        if let Some(range) = delta.date_range {
            self.date_range = range;
        }
    }
}

/// Partial criteria change. `date_range: Some(None)` clears the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaDelta<S> {
    pub status: Option<StatusFilter<S>>,
    pub search_text: Option<String>,
    pub date_range: Option<Option<DateRange>>,
}

impl<S> Default for CriteriaDelta<S> {
    fn default() -> Self {
        Self {
            status: None,
            search_text: None,
            date_range: None,
        }
    }
}

impl<S> CriteriaDelta<S> {
    pub fn status(status: StatusFilter<S>) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn date_range(range: Option<DateRange>) -> Self {
        Self {
            date_range: Some(range),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobStatus;
    use crate::types::parse_date;

    #[test]
    fn tabs_start_with_all() {
        let tabs = StatusFilter::<JobStatus>::tabs();
        assert_eq!(tabs.len(), 6);
        assert_eq!(tabs[0], StatusFilter::All);
        assert_eq!(tabs[1], StatusFilter::Only(JobStatus::New));
    }

    #[test]
    fn parse_tab_labels() {
        assert_eq!(StatusFilter::<JobStatus>::parse("All"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::<JobStatus>::parse("Cancelled"),
            Some(StatusFilter::Only(JobStatus::Cancelled))
        );
        assert_eq!(StatusFilter::<JobStatus>::parse("Archived"), None);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(parse_date("2024-01-10"), parse_date("2024-01-15"));
        assert!(range.contains(parse_date("2024-01-10").unwrap()));
        assert!(range.contains(parse_date("2024-01-15").unwrap()));
        assert!(!range.contains(parse_date("2024-01-16").unwrap()));
        assert!(!range.contains(parse_date("2024-01-09").unwrap()));
    }

    #[test]
    fn open_ended_range() {
        let range = DateRange::new(parse_date("2024-01-10"), None);
        assert!(range.contains(parse_date("2030-01-01").unwrap()));
        assert!(!range.contains(parse_date("2024-01-01").unwrap()));
    }

    #[test]
    fn delta_only_touches_named_fields() {
        let mut criteria = Criteria::<JobStatus>::default().with_search("court");
        criteria.apply(CriteriaDelta::status(StatusFilter::Only(JobStatus::Active)));
        assert_eq!(criteria.search_text, "court");
        assert_eq!(criteria.status, StatusFilter::Only(JobStatus::Active));

        criteria.apply(CriteriaDelta::date_range(Some(DateRange::default())));
        assert!(criteria.date_range.is_some());
        criteria.apply(CriteriaDelta::date_range(None));
        assert!(criteria.date_range.is_none());
    }

    #[test]
    fn is_active_ignores_blank_search() {
        assert!(!Criteria::<JobStatus>::default().with_search("   ").is_active());
        assert!(Criteria::<JobStatus>::default().with_search("x").is_active());
    }
}
