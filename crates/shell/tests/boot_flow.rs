use std::sync::Arc;

use courtdesk_core::holidays::{CreateHolidayRequest, HolidayRequest};
use courtdesk_core::types::parse_date;
use courtdesk_events::{load_snapshot, EventBus, JsonFileWriter, SnapshotPersistence};
use courtdesk_shell::{
    run, AppState, Credentials, FileSessionStore, Route, Session, ShellConfig,
};

fn config(dir: &std::path::Path, persist: bool) -> ShellConfig {
    ShellConfig {
        data_dir: dir.to_path_buf(),
        persist,
        today: parse_date("2024-01-15"),
        ..ShellConfig::default()
    }
}

#[tokio::test]
async fn signed_out_boot_lands_on_login() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(config(dir.path(), false), "/bills").await.unwrap();
    assert!(!report.authenticated);
    assert_eq!(report.route, Route::Login);
}

#[tokio::test]
async fn login_persists_across_boots() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), false);

    let mut session = Session::init(Box::new(FileSessionStore::new(cfg.session_path()))).unwrap();
    assert!(session
        .login(&Credentials::new("tarun@gmail.com", "pw"))
        .unwrap());

    let report = run(cfg.clone(), "/holidays").await.unwrap();
    assert!(report.authenticated);
    assert_eq!(report.route, Route::Holidays);
    assert_eq!(report.breadcrumb, vec!["Dashboard", "Holiday Planner"]);

    let report = run(cfg.clone(), "/").await.unwrap();
    assert_eq!(report.route, Route::Dashboard);

    session.logout().unwrap();
    let report = run(cfg, "/holidays").await.unwrap();
    assert_eq!(report.route, Route::Login);
}

#[tokio::test]
async fn changes_survive_a_restart_when_persisting() {
    let dir = tempfile::tempdir().unwrap();

    {
        let bus = Arc::new(EventBus::default());
        let writer = tokio::spawn(SnapshotPersistence::run(
            Arc::new(JsonFileWriter::new(dir.path())),
            bus.subscribe_snapshots(),
        ));
        let mut state = AppState::build(config(dir.path(), true), Arc::clone(&bus))
            .await
            .unwrap();
        state.holidays.add_record(CreateHolidayRequest {
            start_date: parse_date("2024-02-15"),
            end_date: parse_date("2024-02-16"),
            reason: "Trip".to_string(),
        });
        drop(state);
        drop(bus);
        writer.await.unwrap();
    }

    let saved: Vec<HolidayRequest> = load_snapshot(dir.path()).await.unwrap().unwrap();
    assert_eq!(saved.len(), 4);

    let state = AppState::build(config(dir.path(), true), Arc::new(EventBus::default()))
        .await
        .unwrap();
    let added = state.holidays.get(4).unwrap();
    assert_eq!(added.days_count, 2);
    assert_eq!(state.holiday_stats().pending_days, 5);
    // Kinds without a snapshot still come from seed data.
    assert_eq!(state.jobs.records().len(), 6);
}
