use std::sync::Arc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tracker_app::Surface;
use tracker_core::{JobRecord, Msg, SurfaceView, TrackButton, MSG_EXPORTED};
use tracker_engine::{CsvExporter, EngineConfig, JobStore, MemoryStorage};

const WAIT: Duration = Duration::from_secs(5);
const JOB_URL: &str = "https://my.jobstreet.com/job/42";

fn job(title: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company_name: "Acme".to_string(),
        source_link: JOB_URL.to_string(),
        ..JobRecord::unavailable()
    }
}

fn surface(store: JobStore, dir: &std::path::Path) -> Surface {
    Surface::new(EngineConfig::new(
        store,
        CsvExporter::to_dir(dir.to_path_buf()),
    ))
}

/// Pumps until `pred` holds for the view.
fn pump_until(surface: &mut Surface, pred: impl Fn(&SurfaceView) -> bool) {
    let deadline = Instant::now() + WAIT;
    while !pred(&surface.view()) {
        assert!(Instant::now() < deadline, "timed out: {:?}", surface.view());
        surface.pump(Duration::from_millis(50));
    }
}

fn open_job(surface: &mut Surface, title: &str) {
    surface.dispatch(Msg::PageChanged {
        url: JOB_URL.to_string(),
        candidate: Some(job(title)),
    });
    surface.settle(WAIT).unwrap();
}

#[test]
fn listing_follows_tracking_on_another_surface() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let mut page = surface(store.surface(), dir.path());
    let mut popup = surface(store.surface(), dir.path());

    popup.dispatch(Msg::ListingOpened);
    popup.settle(WAIT).unwrap();
    assert!(popup.view().records.is_empty());

    open_job(&mut page, "Engineer");
    assert_eq!(page.view().button, TrackButton::Enabled);
    page.dispatch(Msg::TrackClicked);
    page.settle(WAIT).unwrap();
    assert_eq!(page.view().button, TrackButton::Tracked);

    pump_until(&mut popup, |view| view.records.len() == 1);
    assert_eq!(popup.view().records[0].title, "Engineer");
}

#[test]
fn export_elsewhere_re_enables_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let mut page = surface(store.surface(), dir.path());
    let mut popup = surface(store.surface(), dir.path());

    open_job(&mut page, "Engineer");
    page.dispatch(Msg::TrackClicked);
    page.settle(WAIT).unwrap();

    popup.dispatch(Msg::ExportClicked);
    popup.settle(WAIT).unwrap();
    let alert = popup.view().alert.unwrap();
    assert_eq!(alert.message, MSG_EXPORTED);

    pump_until(&mut page, |view| view.button == TrackButton::Enabled);
}

#[test]
fn own_track_refreshes_open_listing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let mut both = surface(store, dir.path());

    both.dispatch(Msg::ListingOpened);
    open_job(&mut both, "Engineer");
    both.dispatch(Msg::TrackClicked);
    both.settle(WAIT).unwrap();

    assert_eq!(both.pending(), 0);
    assert_eq!(both.view().records.len(), 1);
}
