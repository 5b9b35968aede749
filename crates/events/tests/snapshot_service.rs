use std::sync::Arc;
use std::time::Duration;

use courtdesk_core::holidays::{seed_holidays, HolidayRequest};
use courtdesk_core::jobs::{seed_jobs, Job};
use courtdesk_core::notifications::{notification_controller, Notification};
use courtdesk_core::types::EntityKind;
use courtdesk_events::{
    load_snapshot, BusSink, EventBus, JsonFileWriter, SnapshotPersistence, StoreEvent,
};

#[tokio::test]
async fn service_persists_latest_snapshot_and_stops_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let bus = Arc::new(EventBus::default());
    let handle = tokio::spawn(SnapshotPersistence::run(
        Arc::new(JsonFileWriter::new(dir.path())),
        bus.subscribe_snapshots(),
    ));

    {
        let mut ctl = notification_controller()
            .unwrap()
            .with_sink(Arc::new(BusSink::new(Arc::clone(&bus))));
        ctl.mark_all_read();
        ctl.clear_all_read();
    }

    // Dropping the last sender closes the channel and ends the loop.
    drop(bus);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("persistence should stop after the bus closes")
        .unwrap();

    let saved: Vec<Notification> = load_snapshot(dir.path()).await.unwrap().unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn write_failure_does_not_stop_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the snapshot directory should be makes every write fail.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"").unwrap();

    let bus = Arc::new(EventBus::default());
    let handle = tokio::spawn(SnapshotPersistence::run(
        Arc::new(JsonFileWriter::new(&blocked)),
        bus.subscribe_snapshots(),
    ));

    let mut ctl = notification_controller()
        .unwrap()
        .with_sink(Arc::new(BusSink::new(Arc::clone(&bus))));
    assert!(ctl.mark_read(1));
    assert_eq!(ctl.unread_count(), 1);

    drop(ctl);
    drop(bus);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should survive failed writes and exit on close")
        .unwrap();
}

#[tokio::test]
async fn lagging_writer_still_saves_kinds_skipped_in_the_gap() {
    let dir = tempfile::tempdir().unwrap();
    let bus = Arc::new(EventBus::new(4));
    let handle = tokio::spawn(SnapshotPersistence::run(
        Arc::new(JsonFileWriter::new(dir.path())),
        bus.subscribe_snapshots(),
    ));

    // The single-threaded test runtime does not poll the writer until the
    // test yields, so one job snapshot followed by a burst of holiday
    // snapshots overflows the channel and the job event is skipped.
    let jobs = seed_jobs();
    bus.publish(StoreEvent::new(
        EntityKind::Job,
        serde_json::to_value(&jobs).unwrap(),
    ));
    let holidays = serde_json::to_value(seed_holidays()).unwrap();
    for _ in 0..50 {
        bus.publish(StoreEvent::new(EntityKind::Holiday, holidays.clone()));
    }

    drop(bus);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("persistence should stop after the bus closes")
        .unwrap();

    let saved: Vec<Job> = load_snapshot(dir.path()).await.unwrap().unwrap();
    assert_eq!(saved, jobs);
    let holidays_saved: Vec<HolidayRequest> = load_snapshot(dir.path()).await.unwrap().unwrap();
    assert_eq!(holidays_saved.len(), 3);
}
