use std::sync::Arc;

use courtdesk_core::bills::{seed_bills, BillList, BillTotals, BILL_LIST};
use courtdesk_core::certifications::{seed_certifications, CertificationList, CERTIFICATION_LIST};
use courtdesk_core::controller::{RecordListController, RecordSink};
use courtdesk_core::dashboard::DashboardOverview;
use courtdesk_core::files::{seed_files, FileList, FILE_LIST};
use courtdesk_core::holidays::{seed_holidays, HolidayList, HolidayStats, HOLIDAY_LIST};
use courtdesk_core::jobs::{seed_jobs, JobList, JOB_LIST};
use courtdesk_core::notifications::{seed_notifications, NotificationList, NOTIFICATION_LIST};
use courtdesk_core::profile::{ProfileEditor, UserProfile};
use courtdesk_core::record::Record;
use courtdesk_core::settings::SettingsPanel;
use courtdesk_core::types::Date;
use courtdesk_core::view::ListConfig;
use courtdesk_events::{load_snapshot, BusSink, EventBus};
use serde::Serialize;

use crate::config::ShellConfig;
use crate::error::ShellResult;
use crate::navigation::Route;

/// Everything the pages operate on. Each record kind has its own
/// independent store.
pub struct AppState {
    pub config: Arc<ShellConfig>,
    /// Carries store snapshots to the persistence task.
    pub event_bus: Arc<EventBus>,
    pub jobs: JobList,
    pub bills: BillList,
    pub files: FileList,
    pub notifications: NotificationList,
    pub holidays: HolidayList,
    pub certifications: CertificationList,
    pub profile: ProfileEditor,
    pub settings: SettingsPanel,
}

impl AppState {
    /// Build every controller, from saved snapshots when persistence is on
    /// and a snapshot exists, otherwise from seed data. With persistence
    /// on, every controller publishes its changes to `event_bus`.
    pub async fn build(config: ShellConfig, event_bus: Arc<EventBus>) -> ShellResult<Self> {
        let sink = config
            .persist
            .then(|| Arc::new(BusSink::new(Arc::clone(&event_bus))));
        let loader = Loader {
            config: &config,
            sink,
        };

        let state = Self {
            jobs: loader.controller(JOB_LIST, seed_jobs).await?,
            bills: loader.controller(BILL_LIST, seed_bills).await?,
            files: loader.controller(FILE_LIST, seed_files).await?,
            notifications: loader.controller(NOTIFICATION_LIST, seed_notifications).await?,
            holidays: loader.controller(HOLIDAY_LIST, seed_holidays).await?,
            certifications: loader
                .controller(CERTIFICATION_LIST, seed_certifications)
                .await?,
            profile: ProfileEditor::new(UserProfile::default()),
            settings: SettingsPanel::default(),
            event_bus,
            config: Arc::new(config),
        };
        tracing::info!(
            jobs = state.jobs.records().len(),
            bills = state.bills.records().len(),
            files = state.files.records().len(),
            notifications = state.notifications.records().len(),
            holidays = state.holidays.records().len(),
            certifications = state.certifications.records().len(),
            "Application state ready"
        );
        Ok(state)
    }

    pub fn today(&self) -> Date {
        self.config.today()
    }

    pub fn overview(&self) -> DashboardOverview {
        DashboardOverview::compute(self.jobs.records(), self.bills.records(), self.today())
    }

    /// One line per list page: how many records exist and how many the
    /// current filters show.
    pub fn page_summaries(&self) -> Vec<PageSummary> {
        vec![
            PageSummary::of(Route::Jobs, &self.jobs),
            PageSummary::of(Route::Bills, &self.bills),
            PageSummary::of(Route::Files, &self.files),
            PageSummary::of(Route::Notifications, &self.notifications),
            PageSummary::of(Route::Holidays, &self.holidays),
        ]
    }

    pub fn bill_totals(&self) -> BillTotals {
        BillTotals::compute(self.bills.records())
    }

    pub fn holiday_stats(&self) -> HolidayStats {
        HolidayStats::compute(self.holidays.records())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub route: Route,
    pub total: usize,
    pub visible: usize,
}

impl PageSummary {
    fn of<R: Record>(route: Route, controller: &RecordListController<R>) -> Self {
        Self {
            route,
            total: controller.records().len(),
            visible: controller.view().visible_len(),
        }
    }
}

struct Loader<'a> {
    config: &'a ShellConfig,
    sink: Option<Arc<BusSink>>,
}

impl Loader<'_> {
    async fn controller<R: Record>(
        &self,
        list: ListConfig,
        seed: fn() -> Vec<R>,
    ) -> ShellResult<RecordListController<R>> {
        let snapshot = if self.config.persist {
            load_snapshot::<R>(&self.config.data_dir).await?
        } else {
            None
        };
        let records = match snapshot {
            Some(records) => {
                tracing::info!(kind = %R::KIND, count = records.len(), "Loaded snapshot");
                records
            }
            None => seed(),
        };

        let controller = RecordListController::with_records(list, records)?;
        Ok(match &self.sink {
            Some(sink) => {
                let sink: Arc<dyn RecordSink<R>> = sink.clone();
                controller.with_sink(sink)
            }
            None => controller,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(dir: &std::path::Path) -> ShellConfig {
        ShellConfig {
            data_dir: dir.to_path_buf(),
            persist: false,
            today: courtdesk_core::types::parse_date("2024-01-15"),
            ..ShellConfig::default()
        }
    }

    #[tokio::test]
    async fn seeds_every_store_without_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::build(memory_config(dir.path()), Arc::new(EventBus::default()))
            .await
            .unwrap();
        assert_eq!(state.jobs.records().len(), 6);
        assert_eq!(state.bills.records().len(), 3);
        assert_eq!(state.files.records().len(), 5);
        assert_eq!(state.notifications.records().len(), 5);
        assert_eq!(state.holidays.records().len(), 3);
        assert_eq!(state.certifications.records().len(), 2);
        assert_eq!(state.overview().stat("Total Jobs"), Some("6"));
        assert_eq!(state.page_summaries().len(), 5);
    }

    #[tokio::test]
    async fn stores_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut state =
            AppState::build(memory_config(dir.path()), Arc::new(EventBus::default()))
                .await
                .unwrap();
        assert!(state.jobs.delete_record(1));
        assert!(state.bills.get(1).is_some());
        assert!(state.holidays.get(1).is_some());
    }
}
