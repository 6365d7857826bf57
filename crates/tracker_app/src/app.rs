use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracker_core::review::{find_platform, offers_review_lookup, REVIEW_PLATFORMS};
use tracker_core::{
    AlertKind, ExportOutcome, Msg, SurfaceView, TrackButton, MSG_ALREADY_TRACKED,
};
use tracker_engine::{
    decode_page, CsvExporter, EngineConfig, Extractor, JobPageExtractor, JobStore,
    JsonFileStorage, ReqwestFetcher,
};
use tracker_logging::tracker_info;

use crate::cli::{Command, PageArgs};
use crate::config::AppConfig;
use crate::render::{render_alert, render_listing, render_page, render_reviews, NOT_TRACKABLE};
use crate::surface::Surface;

/// Collaborators for a surface backed by the configured storage file.
pub fn engine_config(config: &AppConfig) -> EngineConfig {
    let store = JobStore::new(Arc::new(JsonFileStorage::new(config.storage_path.clone())));
    let mut engine = EngineConfig::new(store, CsvExporter::to_dir(config.export_dir.clone()));
    engine.fetcher = Arc::new(ReqwestFetcher::new(config.fetch.settings()));
    engine
}

/// Where a page is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Remote(String),
    Saved { path: PathBuf, url: String },
}

impl PageSource {
    pub fn from_args(args: &PageArgs) -> Self {
        let source = args.source.trim();
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Self::Remote(source.to_string());
        }
        let path = PathBuf::from(source);
        let url = args
            .url
            .clone()
            .unwrap_or_else(|| format!("file://{}", path.display()));
        Self::Saved { path, url }
    }
}

fn open_page(surface: &mut Surface, source: &PageSource, timeout: Duration) -> anyhow::Result<()> {
    match source {
        PageSource::Remote(url) => {
            surface.open_url(url);
            surface.settle(timeout)?;
            if let Some(message) = surface.take_page_error() {
                bail!("could not load {url}: {message}");
            }
        }
        PageSource::Saved { path, url } => {
            let bytes =
                fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
            let decoded = decode_page(&bytes, None)
                .with_context(|| format!("could not decode {}", path.display()))?;
            let candidate = JobPageExtractor::default().candidate(&decoded.html, url);
            surface.dispatch(Msg::PageChanged {
                url: url.clone(),
                candidate,
            });
            surface.settle(timeout)?;
        }
    }
    Ok(())
}

/// Prints the alert, failing the command when it reports an error.
fn report_alert(view: &SurfaceView, out: &mut dyn Write) -> anyhow::Result<()> {
    let Some(alert) = &view.alert else {
        return Ok(());
    };
    writeln!(out, "{}", render_alert(alert))?;
    if alert.kind == AlertKind::Error {
        bail!("{}", alert.message);
    }
    Ok(())
}

pub fn run(command: &Command, config: &AppConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    let timeout = config.settle_timeout();
    match command {
        Command::Track { page } => {
            let mut surface = Surface::new(engine_config(config));
            open_page(&mut surface, &PageSource::from_args(page), timeout)?;
            let view = surface.view();
            if view.page_key.is_none() {
                writeln!(out, "{NOT_TRACKABLE}")?;
                return Ok(());
            }
            if view.button == TrackButton::Tracked {
                writeln!(out, "{}", render_page(&view))?;
                writeln!(out, "{MSG_ALREADY_TRACKED}")?;
                return Ok(());
            }
            surface.dispatch(Msg::TrackClicked);
            surface.settle(timeout)?;
            let view = surface.view();
            writeln!(out, "{}", render_page(&view))?;
            report_alert(&view, out)
        }
        Command::Status { page, reviews } => {
            let mut surface = Surface::new(engine_config(config));
            open_page(&mut surface, &PageSource::from_args(page), timeout)?;
            let view = surface.view();
            writeln!(out, "{}", render_page(&view))?;
            let company = view
                .page_key
                .as_ref()
                .filter(|_| *reviews)
                .filter(|_| view.page_url.as_deref().is_some_and(offers_review_lookup))
                .map(|key| key.company());
            if let Some(company) = company {
                writeln!(out, "{}", render_reviews(company, REVIEW_PLATFORMS.iter()))?;
            }
            Ok(())
        }
        Command::List => {
            let mut surface = Surface::new(engine_config(config));
            surface.dispatch(Msg::ListingOpened);
            surface.settle(timeout)?;
            let view = surface.view();
            report_alert(&view, out)?;
            writeln!(out, "{}", render_listing(&view.records))?;
            Ok(())
        }
        Command::Export => {
            let mut surface = Surface::new(engine_config(config));
            surface.dispatch(Msg::ExportClicked);
            surface.settle(timeout)?;
            if let Some(contents) = surface.take_unsaved_export() {
                writeln!(out, "Export could not be saved; the drained CSV follows.")?;
                out.write_all(&contents)?;
                writeln!(out)?;
            }
            if let Some(ExportOutcome::Exported { count, path }) = surface.last_export() {
                tracker_info!("Export of {} job(s) written to {}", count, path);
                writeln!(out, "Wrote {count} job(s) to {path}")?;
            }
            report_alert(&surface.view(), out)
        }
        Command::Reviews { company, platform } => {
            let company = company.trim();
            if company.is_empty() {
                bail!("company name is empty");
            }
            let listing = match platform {
                Some(id) => {
                    let Some(platform) = find_platform(id) else {
                        let known: Vec<&str> = REVIEW_PLATFORMS.iter().map(|p| p.id).collect();
                        bail!("unknown platform {id:?}; expected one of {}", known.join(", "));
                    };
                    render_reviews(company, [platform])
                }
                None => render_reviews(company, REVIEW_PLATFORMS.iter()),
            };
            writeln!(out, "{listing}")?;
            Ok(())
        }
    }
}
