use std::time::{Duration, Instant};

use tracker_core::{update, ExportOutcome, Msg, SurfaceState, SurfaceView};
use tracker_engine::{EngineConfig, EngineHandle};
use tracker_logging::{tracker_debug, tracker_warn};

use crate::effects::{is_reply, run_effects, translate, Translated};

/// One headless surface: core state driven by its own engine.
pub struct Surface {
    state: SurfaceState,
    engine: EngineHandle,
    pending: usize,
    page_error: Option<String>,
    unsaved_export: Option<Vec<u8>>,
    last_export: Option<ExportOutcome>,
}

impl Surface {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: SurfaceState::new(),
            engine: EngineHandle::new(config),
            pending: 0,
            page_error: None,
            unsaved_export: None,
            last_export: None,
        }
    }

    pub fn view(&self) -> SurfaceView {
        self.state.view()
    }

    /// Commands sent to the engine and not yet answered.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if let Msg::ExportFinished(outcome) = &msg {
            self.last_export = Some(outcome.clone());
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.pending += run_effects(&self.engine, effects);
        if self.state.consume_dirty() {
            tracker_debug!("Surface now {:?}", self.state.view().button);
        }
    }

    /// Fetches `url` in the background; the page arrives as `PageChanged`.
    pub fn open_url(&mut self, url: &str) {
        self.page_error = None;
        self.engine.load_page(url);
        self.pending += 1;
    }

    /// Handles at most one engine event. Returns false when none arrived.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        let Some(event) = self.engine.recv_timeout(timeout) else {
            return false;
        };
        if is_reply(&event) {
            self.pending = self.pending.saturating_sub(1);
        }
        match translate(event) {
            Translated::Msg(msg) => self.dispatch(msg),
            Translated::UnsavedExport { msg, contents } => {
                self.unsaved_export = Some(contents);
                self.dispatch(msg);
            }
            Translated::PageFailed(message) => self.page_error = Some(message),
        }
        true
    }

    /// Pumps until every command, including follow-ups, has been answered.
    pub fn settle(&mut self, timeout: Duration) -> anyhow::Result<()> {
        let deadline = Instant::now() + timeout;
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracker_warn!("Gave up waiting on {} operation(s)", self.pending);
                anyhow::bail!("timed out waiting for {} operation(s)", self.pending);
            }
            self.pump(remaining);
        }
        Ok(())
    }

    pub fn take_page_error(&mut self) -> Option<String> {
        self.page_error.take()
    }

    /// CSV bytes of an export that cleared the store but was not saved.
    pub fn take_unsaved_export(&mut self) -> Option<Vec<u8>> {
        self.unsaved_export.take()
    }

    pub fn last_export(&self) -> Option<&ExportOutcome> {
        self.last_export.as_ref()
    }
}
