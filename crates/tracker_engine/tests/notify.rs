use std::sync::{Arc, Once};
use std::time::Duration;

use tracker_core::JobRecord;
use tracker_engine::{ChangeNotifier, JobStore, MemoryStorage, StoreEvent};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

fn job(title: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company_name: "C".to_string(),
        ..JobRecord::unavailable()
    }
}

#[test]
fn event_name_matches_wire_tag() {
    init_logging();
    assert_eq!(StoreEvent::JobDetailsUpdated.name(), "jobDetailsUpdated");
}

#[test]
fn notify_without_listeners_is_dropped() {
    init_logging();
    let notifier = ChangeNotifier::new();
    let origin = notifier.register();
    notifier.notify(origin, StoreEvent::JobDetailsUpdated);

    // A later subscriber does not see earlier events.
    let mut listener = notifier.subscribe(notifier.register());
    assert_eq!(listener.try_recv(), None);
}

#[test]
fn listeners_skip_their_own_events() {
    init_logging();
    let notifier = ChangeNotifier::new();
    let page = notifier.register();
    let popup = notifier.register();
    let mut page_listener = notifier.subscribe(page);
    let mut popup_listener = notifier.subscribe(popup);

    notifier.notify(page, StoreEvent::JobDetailsUpdated);

    assert_eq!(popup_listener.try_recv(), Some(StoreEvent::JobDetailsUpdated));
    assert_eq!(popup_listener.try_recv(), None);
    assert_eq!(page_listener.try_recv(), None);
}

#[test]
fn lagging_listener_gets_one_coalesced_event() {
    init_logging();
    let notifier = ChangeNotifier::new();
    let origin = notifier.register();
    let mut listener = notifier.subscribe(notifier.register());

    for _ in 0..100 {
        notifier.notify(origin, StoreEvent::JobDetailsUpdated);
    }

    assert_eq!(listener.try_recv(), Some(StoreEvent::JobDetailsUpdated));
}

#[tokio::test]
async fn track_notifies_other_surfaces_only() {
    init_logging();
    let page = JobStore::new(Arc::new(MemoryStorage::new()));
    let popup = page.surface();
    let mut page_listener = page.subscribe();
    let mut popup_listener = popup.subscribe();

    page.track(job("A")).await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), popup_listener.recv())
        .await
        .expect("popup notified");
    assert_eq!(event, Some(StoreEvent::JobDetailsUpdated));
    assert_eq!(page_listener.try_recv(), None);
}

#[tokio::test]
async fn duplicate_track_does_not_notify() {
    init_logging();
    let page = JobStore::new(Arc::new(MemoryStorage::new()));
    let popup = page.surface();
    page.track(job("A")).await.unwrap();

    let mut popup_listener = popup.subscribe();
    page.track(job("A")).await.unwrap();
    assert_eq!(popup_listener.try_recv(), None);
}

#[tokio::test]
async fn drain_notifies_other_surfaces() {
    init_logging();
    let page = JobStore::new(Arc::new(MemoryStorage::new()));
    let popup = page.surface();
    page.track(job("A")).await.unwrap();

    let mut page_listener = page.subscribe();
    popup.drain_all().await.unwrap();
    assert_eq!(page_listener.try_recv(), Some(StoreEvent::JobDetailsUpdated));
}
