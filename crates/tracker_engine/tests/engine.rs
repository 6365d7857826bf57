use std::sync::Arc;
use std::time::{Duration, Instant};

use tracker_core::{JobKey, JobRecord};
use tracker_engine::{
    CsvExporter, EngineConfig, EngineEvent, EngineHandle, ExportSummary, FetchError, FetchedPage,
    Fetcher, JobStore, MemoryStorage, PageSnapshot, TrackResult,
};

const WAIT: Duration = Duration::from_secs(5);

fn job(title: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company_name: "C".to_string(),
        ..JobRecord::unavailable()
    }
}

/// Waits for the first event matching `pred`, skipping others.
fn wait_for(engine: &EngineHandle, pred: impl Fn(&EngineEvent) -> bool) -> EngineEvent {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            if pred(&event) {
                return event;
            }
        }
    }
    panic!("timed out waiting for engine event");
}

fn engine_for(store: JobStore, dir: &std::path::Path) -> EngineHandle {
    EngineHandle::new(EngineConfig::new(
        store,
        CsvExporter::to_dir(dir.to_path_buf()),
    ))
}

#[test]
fn track_then_query_presence() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let engine = engine_for(store, temp.path());

    engine.track(job("A"));
    let event = wait_for(&engine, |e| matches!(e, EngineEvent::TrackFinished { .. }));
    assert_eq!(
        event,
        EngineEvent::TrackFinished {
            key: JobKey::new("A", "C"),
            result: Ok(TrackResult::Tracked),
        }
    );

    engine.query_presence(JobKey::new("A", "C"));
    let event = wait_for(&engine, |e| matches!(e, EngineEvent::PresenceResolved { .. }));
    assert_eq!(
        event,
        EngineEvent::PresenceResolved {
            key: JobKey::new("A", "C"),
            tracked: Some(true),
        }
    );
}

#[test]
fn other_surface_sees_store_changed() {
    let temp = tempfile::TempDir::new().unwrap();
    let page_store = JobStore::new(Arc::new(MemoryStorage::new()));
    let popup_store = page_store.surface();
    let page = engine_for(page_store, temp.path());
    let popup = engine_for(popup_store, temp.path());

    page.track(job("A"));
    wait_for(&page, |e| matches!(e, EngineEvent::TrackFinished { .. }));
    wait_for(&popup, |e| *e == EngineEvent::StoreChanged);

    popup.load_records();
    let event = wait_for(&popup, |e| matches!(e, EngineEvent::RecordsLoaded(_)));
    assert_eq!(event, EngineEvent::RecordsLoaded(Ok(vec![job("A")])));
}

#[test]
fn export_reports_empty_then_written() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let engine = engine_for(store.clone(), temp.path());

    engine.export();
    let event = wait_for(&engine, |e| matches!(e, EngineEvent::ExportFinished(_)));
    assert_eq!(event, EngineEvent::ExportFinished(Ok(ExportSummary::Empty)));

    engine.track(job("A"));
    wait_for(&engine, |e| matches!(e, EngineEvent::TrackFinished { .. }));
    engine.export();
    match wait_for(&engine, |e| matches!(e, EngineEvent::ExportFinished(_))) {
        EngineEvent::ExportFinished(Ok(ExportSummary::Exported { count, path })) => {
            assert_eq!(count, 1);
            assert!(path.is_file());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

/// Serves one fixed page for every URL.
struct CannedFetcher {
    body: &'static str,
}

#[async_trait::async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage {
            final_url: format!("{url}?redirected=1"),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: self.body.as_bytes().to_vec(),
        })
    }
}

fn engine_serving(body: &'static str, dir: &std::path::Path) -> EngineHandle {
    let store = JobStore::new(Arc::new(MemoryStorage::new()));
    let mut config = EngineConfig::new(store, CsvExporter::to_dir(dir.to_path_buf()));
    config.fetcher = Arc::new(CannedFetcher { body });
    EngineHandle::new(config)
}

#[test]
fn load_page_extracts_candidate_at_final_url() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = engine_serving(
        r#"<h1 data-automation="job-detail-title">Engineer</h1>
<span data-automation="advertiser-name">C</span>
<div data-automation="job-detail-apply"></div>"#,
        temp.path(),
    );

    engine.load_page("https://my.jobstreet.com/job/7");
    match wait_for(&engine, |e| matches!(e, EngineEvent::PageLoaded { .. })) {
        EngineEvent::PageLoaded {
            result: Ok(PageSnapshot { url, candidate }),
            ..
        } => {
            assert_eq!(url, "https://my.jobstreet.com/job/7?redirected=1");
            let candidate = candidate.expect("job detail page");
            assert_eq!(candidate.key(), JobKey::new("Engineer", "C"));
            assert_eq!(candidate.source_link, url);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn load_page_without_apply_container_has_no_candidate() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = engine_serving("<html><body>search results</body></html>", temp.path());

    engine.load_page("https://my.jobstreet.com/jobs");
    let event = wait_for(&engine, |e| matches!(e, EngineEvent::PageLoaded { .. }));
    assert!(matches!(
        event,
        EngineEvent::PageLoaded {
            result: Ok(PageSnapshot { candidate: None, .. }),
            ..
        }
    ));
}
