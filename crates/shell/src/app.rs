//! Boot sequence shared by the binary and the integration tests.

use std::sync::Arc;
use std::time::Duration;

use courtdesk_core::money::Money;
use courtdesk_events::{EventBus, JsonFileWriter, SnapshotPersistence};

use crate::config::ShellConfig;
use crate::error::ShellResult;
use crate::navigation::Route;
use crate::session::{FileSessionStore, Session};
use crate::state::AppState;

/// How long shutdown waits for pending snapshots to be written.
const PERSISTENCE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// What a boot resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub authenticated: bool,
    pub route: Route,
    pub breadcrumb: Vec<&'static str>,
}

/// Boot the shell for `requested_path`: read the session flag, build the
/// application state, log the landing page, then shut down cleanly.
pub async fn run(config: ShellConfig, requested_path: &str) -> ShellResult<BootReport> {
    let session = Session::init(Box::new(FileSessionStore::new(config.session_path())))?;
    let route = Route::resolve(requested_path, session.is_authenticated());
    tracing::info!(path = requested_path, route = route.path(), "Route resolved");

    let event_bus = Arc::new(EventBus::default());
    let persistence = config.persist.then(|| {
        tokio::spawn(SnapshotPersistence::run(
            Arc::new(JsonFileWriter::new(&config.data_dir)),
            event_bus.subscribe_snapshots(),
        ))
    });
    if persistence.is_some() {
        tracing::info!(dir = %config.data_dir.display(), "Snapshot persistence started");
    }

    let state = AppState::build(config, Arc::clone(&event_bus)).await?;
    if route != Route::Login {
        log_landing(&state);
    }

    // Controllers hold the remaining bus handles; dropping both closes the
    // channel and lets the persistence loop drain and exit.
    drop(state);
    drop(event_bus);
    if let Some(handle) = persistence {
        match tokio::time::timeout(PERSISTENCE_DRAIN_TIMEOUT, handle).await {
            Ok(Ok(())) => tracing::info!("Snapshot persistence stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Snapshot persistence task failed"),
            Err(_) => tracing::warn!("Snapshot persistence did not stop in time"),
        }
    }

    Ok(BootReport {
        authenticated: session.is_authenticated(),
        breadcrumb: route.breadcrumb(),
        route,
    })
}

fn log_landing(state: &AppState) {
    let overview = state.overview();
    for card in &overview.stats {
        tracing::info!(title = card.title, value = %card.value, "Stat");
    }
    tracing::info!(
        today = overview.todays_jobs.len(),
        upcoming = overview.upcoming_jobs.len(),
        "Schedule"
    );
    let month_total: Money = overview.monthly_revenue.iter().map(|m| m.amount).sum();
    tracing::info!(months = overview.monthly_revenue.len(), total = %month_total, "Revenue");

    let totals = state.bill_totals();
    tracing::info!(outstanding = %totals.outstanding(), "Bills");
    let holidays = state.holiday_stats();
    tracing::info!(
        approved_days = holidays.approved_days,
        pending_days = holidays.pending_days,
        "Time off"
    );
    tracing::info!(unread = state.notifications.unread_count(), "Notifications");
    for page in state.page_summaries() {
        tracing::info!(
            page = page.route.title(),
            total = page.total,
            visible = page.visible,
            "Page"
        );
    }
}
