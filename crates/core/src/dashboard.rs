//! Landing page overview derived from the jobs and bills stores.

use serde::Serialize;

use crate::bills::{Bill, BillStatus, BillTotals, BILL_LIST};
use crate::criteria::{Criteria, StatusFilter};
use crate::jobs::{CaseType, Job, JobStatus};
use crate::money::Money;
use crate::status::Status;
use crate::types::Date;
use crate::view::{DerivedView, YearMonth};

/// Number of entries in the "Upcoming Jobs" panel.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub month: YearMonth,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaseShare {
    pub case_type: CaseType,
    pub count: usize,
    /// Rounded share of all typed jobs, 0..=100.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub stats: Vec<StatCard>,
    pub todays_jobs: Vec<Job>,
    pub upcoming_jobs: Vec<Job>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub case_distribution: Vec<CaseShare>,
}

impl DashboardOverview {
    pub fn compute(jobs: &[Job], bills: &[Bill], today: Date) -> Self {
        let totals = BillTotals::compute(bills);
        let count_of = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();

        let stats = vec![
            StatCard {
                title: "Total Jobs",
                value: jobs.len().to_string(),
            },
            StatCard {
                title: "Total Revenue",
                value: totals.paid.to_string(),
            },
            StatCard {
                title: "Active Cases",
                value: count_of(JobStatus::Active).to_string(),
            },
            StatCard {
                title: "Completed Jobs",
                value: count_of(JobStatus::Completed).to_string(),
            },
        ];

        let todays_jobs = jobs
            .iter()
            .filter(|j| j.date == Some(today))
            .cloned()
            .collect();

        let mut upcoming_jobs: Vec<Job> = jobs
            .iter()
            .filter(|j| j.date.is_some_and(|d| d > today))
            .filter(|j| !matches!(j.status, JobStatus::Cancelled | JobStatus::Rejected))
            .cloned()
            .collect();
        upcoming_jobs.sort_by_key(|j| j.date);
        upcoming_jobs.truncate(UPCOMING_LIMIT);

        Self {
            stats,
            todays_jobs,
            upcoming_jobs,
            monthly_revenue: monthly_revenue(bills),
            case_distribution: case_distribution(jobs),
        }
    }

    pub fn stat(&self, title: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|s| s.title == title)
            .map(|s| s.value.as_str())
    }
}

/// Paid amounts per calendar month, oldest first.
pub fn monthly_revenue(bills: &[Bill]) -> Vec<MonthlyRevenue> {
    let paid = Criteria::default().with_status(StatusFilter::Only(BillStatus::Paid));
    DerivedView::compute(bills, &paid, &BILL_LIST)
        .group_by_month()
        .into_iter()
        .filter_map(|group| {
            let month = group.month?;
            Some(MonthlyRevenue {
                month,
                amount: group.records.iter().map(|b| b.amount).sum(),
            })
        })
        .collect()
}

/// Share of jobs per case type. Types with no jobs are omitted.
pub fn case_distribution(jobs: &[Job]) -> Vec<CaseShare> {
    let typed = jobs.iter().filter(|j| j.case_type.is_some()).count();
    if typed == 0 {
        return Vec::new();
    }
    CaseType::ALL
        .iter()
        .filter_map(|&case_type| {
            let count = jobs
                .iter()
                .filter(|j| j.case_type == Some(case_type))
                .count();
            (count > 0).then(|| CaseShare {
                case_type,
                count,
                percent: ((count * 100 + typed / 2) / typed) as u32,
            })
        })
        .collect()
}
