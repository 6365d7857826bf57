use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracker_core::{JobKey, JobRecord};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

use crate::decode::decode_page;
use crate::export::{CsvExporter, ExportError, ExportSummary};
use crate::extract::{Extractor, JobPageExtractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::store::{JobStore, TrackResult};

/// Collaborators one surface's engine works with.
#[derive(Clone)]
pub struct EngineConfig {
    pub store: JobStore,
    pub exporter: CsvExporter,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn Extractor>,
}

impl EngineConfig {
    pub fn new(store: JobStore, exporter: CsvExporter) -> Self {
        Self {
            store,
            exporter,
            fetcher: Arc::new(ReqwestFetcher::new(FetchSettings::default())),
            extractor: Arc::new(JobPageExtractor::default()),
        }
    }
}

enum EngineCommand {
    LoadPage { url: String },
    QueryPresence { key: JobKey },
    Track { candidate: JobRecord },
    LoadRecords,
    Export,
}

/// An export that failed. `unsaved` holds the CSV bytes when the store had
/// already been drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub message: String,
    pub unsaved: Option<Vec<u8>>,
}

/// A page as the surface observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Address after redirects.
    pub url: String,
    /// `None` when the page is not a job detail view.
    pub candidate: Option<JobRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageLoaded {
        url: String,
        result: Result<PageSnapshot, String>,
    },
    /// `None` when the store could not be read.
    PresenceResolved { key: JobKey, tracked: Option<bool> },
    TrackFinished {
        key: JobKey,
        result: Result<TrackResult, String>,
    },
    RecordsLoaded(Result<Vec<JobRecord>, String>),
    ExportFinished(Result<ExportSummary, ExportFailure>),
    /// Another surface changed the store.
    StoreChanged,
}

/// Runs store operations for one surface on a background runtime and
/// reports their completion as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        // Subscribe before returning so no foreign change is missed.
        let mut listener = config.store.subscribe();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracker_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };

            let change_tx = event_tx.clone();
            runtime.spawn(async move {
                while listener.recv().await.is_some() {
                    if change_tx.send(EngineEvent::StoreChanged).is_err() {
                        break;
                    }
                }
            });

            while let Ok(command) = cmd_rx.recv() {
                let config = config.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(&config, command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Fetches `url` and extracts its job record.
    pub fn load_page(&self, url: impl Into<String>) {
        self.send(EngineCommand::LoadPage { url: url.into() });
    }

    pub fn query_presence(&self, key: JobKey) {
        self.send(EngineCommand::QueryPresence { key });
    }

    pub fn track(&self, candidate: JobRecord) {
        self.send(EngineCommand::Track { candidate });
    }

    pub fn load_records(&self) {
        self.send(EngineCommand::LoadRecords);
    }

    pub fn export(&self) {
        self.send(EngineCommand::Export);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            tracker_error!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(config: &EngineConfig, command: EngineCommand) -> EngineEvent {
    let store = &config.store;
    match command {
        EngineCommand::LoadPage { url } => {
            let result = load_page(config, &url).await;
            if let Err(err) = &result {
                tracker_warn!("Loading page {} failed: {}", url, err);
            }
            EngineEvent::PageLoaded { url, result }
        }
        EngineCommand::QueryPresence { key } => {
            let tracked = match store.is_tracked(&key).await {
                Ok(tracked) => Some(tracked),
                Err(err) => {
                    tracker_warn!("Presence lookup for {} failed: {}", key, err);
                    None
                }
            };
            EngineEvent::PresenceResolved { key, tracked }
        }
        EngineCommand::Track { candidate } => {
            let key = candidate.key();
            let result = store.track(candidate).await.map_err(|err| {
                tracker_error!("Tracking {} failed: {}", key, err);
                err.to_string()
            });
            EngineEvent::TrackFinished { key, result }
        }
        EngineCommand::LoadRecords => {
            let result = store.list().await.map_err(|err| {
                tracker_error!("Loading tracked jobs failed: {}", err);
                err.to_string()
            });
            EngineEvent::RecordsLoaded(result)
        }
        EngineCommand::Export => {
            let result = config.exporter.export(store).await.map_err(|err| {
                let message = err.to_string();
                let unsaved = match err {
                    ExportError::Save { contents, .. } => Some(contents),
                    _ => None,
                };
                ExportFailure { message, unsaved }
            });
            EngineEvent::ExportFinished(result)
        }
    }
}

async fn load_page(config: &EngineConfig, url: &str) -> Result<PageSnapshot, String> {
    let page = config.fetcher.fetch(url).await.map_err(|err| err.to_string())?;
    let decoded =
        decode_page(&page.body, page.content_type.as_deref()).map_err(|err| err.to_string())?;
    let final_url = page.final_url;
    let candidate = config.extractor.candidate(&decoded.html, &final_url);
    tracker_info!(
        "Loaded {} ({}, job page: {})",
        final_url,
        decoded.encoding_label,
        candidate.is_some()
    );
    Ok(PageSnapshot {
        url: final_url,
        candidate,
    })
}
