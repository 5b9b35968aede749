//! Derived view computation: a pure projection from `(records, criteria)`
//! to the visible subset plus global status counts.
//!
//! Counts are always taken over the unfiltered collection so that filter
//! tab badges do not shrink when another tab is selected. The visible
//! subset keeps store order; any re-ordering is an explicit transform
//! ([`DerivedView::sorted_by`], [`DerivedView::group_by_month`]).

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::criteria::{Criteria, StatusFilter};
use crate::record::Record;
use crate::status::Status;

/// Per-kind list configuration: which text fields search looks at and
/// which draft fields a form submit requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub searchable_fields: &'static [&'static str],
    pub required_fields: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// One entry per status plus the `All` total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts<S> {
    pub all: usize,
    pub by_status: Vec<(S, usize)>,
}

impl<S: Status> StatusCounts<S> {
    pub fn tally<R: Record<Status = S>>(records: &[R]) -> Self {
        let by_status = S::ALL
            .iter()
            .map(|&s| (s, records.iter().filter(|r| r.status() == s).count()))
            .collect();
        Self {
            all: records.len(),
            by_status,
        }
    }

    pub fn of(&self, status: S) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }

    pub fn get(&self, filter: StatusFilter<S>) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(s) => self.of(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Whether `record` passes the status, text and date filters.
pub fn matches<R: Record>(
    record: &R,
    criteria: &Criteria<R::Status>,
    searchable_fields: &[&str],
) -> bool {
    if !criteria.status.matches(record.status()) {
        return false;
    }

    let needle = criteria.search_text.trim().to_lowercase();
    if !needle.is_empty() {
        let hit = searchable_fields.iter().any(|field| {
            record
                .text_field(field)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        });
        if !hit {
            return false;
        }
    }

    match criteria.date_range {
        Some(range) if !range.is_unbounded() => {
            record.date().is_some_and(|date| range.contains(date))
        }
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Immutable snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView<R: Record> {
    pub visible: Vec<R>,
    pub counts: StatusCounts<R::Status>,
}

impl<R: Record> DerivedView<R> {
    pub fn compute(records: &[R], criteria: &Criteria<R::Status>, config: &ListConfig) -> Self {
        let visible = records
            .iter()
            .filter(|r| matches(*r, criteria, config.searchable_fields))
            .cloned()
            .collect();
        Self {
            visible,
            counts: StatusCounts::tally(records),
        }
    }

    pub fn count(&self, filter: StatusFilter<R::Status>) -> usize {
        self.counts.get(filter)
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Stable sort of the visible records by `key`.
    pub fn sorted_by<K: Ord>(mut self, key: impl Fn(&R) -> K, order: SortOrder) -> Self {
        self.visible.sort_by(|a, b| {
            let ord = key(a).cmp(&key(b));
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        self
    }

    /// Bucket visible records by calendar month of their date, oldest month
    /// first. Undated records form a trailing bucket.
    pub fn group_by_month(&self) -> Vec<MonthGroup<R>> {
        let mut dated: BTreeMap<(i32, u32), Vec<R>> = BTreeMap::new();
        let mut undated = Vec::new();
        for record in &self.visible {
            match record.date() {
                Some(date) => dated
                    .entry((date.year(), date.month()))
                    .or_default()
                    .push(record.clone()),
                None => undated.push(record.clone()),
            }
        }

        let mut groups: Vec<MonthGroup<R>> = dated
            .into_iter()
            .map(|((year, month), records)| MonthGroup {
                month: Some(YearMonth { year, month }),
                records,
            })
            .collect();
        if !undated.is_empty() {
            groups.push(MonthGroup {
                month: None,
                records: undated,
            });
        }
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// `YYYY-MM`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Short month name, e.g. `Jan`.
    pub fn short_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup<R> {
    /// `None` for records without a date.
    pub month: Option<YearMonth>,
    pub records: Vec<R>,
}
