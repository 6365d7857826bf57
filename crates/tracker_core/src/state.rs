use crate::view_model::{Alert, AlertKind, SurfaceView, TrackButton};
use crate::{JobKey, JobRecord};

pub const MSG_TRACKED: &str = "Job tracked successfully!";
pub const MSG_ALREADY_TRACKED: &str = "This job has already been tracked.";
pub const MSG_TRACK_FAILED: &str = "Failed to track job. Please try again.";
pub const MSG_EXPORTED: &str = "Data exported and storage cleared.";
pub const MSG_NOTHING_TO_EXPORT: &str = "No job details to export.";
pub const MSG_EXPORT_FAILED: &str = "Error exporting job details. Please try again.";
pub const MSG_LOAD_FAILED: &str = "Error loading job details. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageContext {
    pub(crate) url: String,
    pub(crate) candidate: JobRecord,
    pub(crate) key: JobKey,
}

/// State of one surface: an in-page agent, a listing window, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceState {
    page_url: Option<String>,
    page: Option<PageContext>,
    button: TrackButton,
    listing: bool,
    records: Vec<JobRecord>,
    exporting: bool,
    alert: Option<Alert>,
    dirty: bool,
}

impl SurfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SurfaceView {
        SurfaceView {
            page_url: self.page_url.clone(),
            page_key: self.page.as_ref().map(|page| page.key.clone()),
            button: self.button,
            listing: self.listing,
            records: self.records.clone(),
            exporting: self.exporting,
            alert: self.alert.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn page(&self) -> Option<&PageContext> {
        self.page.as_ref()
    }

    pub(crate) fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub(crate) fn is_current_key(&self, key: &JobKey) -> bool {
        self.page.as_ref().is_some_and(|page| &page.key == key)
    }

    pub(crate) fn button(&self) -> TrackButton {
        self.button
    }

    pub(crate) fn set_page(&mut self, url: String, page: Option<PageContext>) {
        self.button = if page.is_some() {
            TrackButton::Checking
        } else {
            TrackButton::Hidden
        };
        self.page_url = Some(url);
        self.page = page;
        self.mark_dirty();
    }

    pub(crate) fn set_button(&mut self, button: TrackButton) {
        if self.button != button {
            self.button = button;
            self.mark_dirty();
        }
    }

    pub(crate) fn is_listing(&self) -> bool {
        self.listing
    }

    pub(crate) fn open_listing(&mut self) {
        if !self.listing {
            self.listing = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_records(&mut self, records: Vec<JobRecord>) {
        self.listing = true;
        self.records = records;
        self.mark_dirty();
    }

    pub(crate) fn clear_records(&mut self) {
        self.records.clear();
        self.mark_dirty();
    }

    pub(crate) fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub(crate) fn set_exporting(&mut self, exporting: bool) {
        if self.exporting != exporting {
            self.exporting = exporting;
            self.mark_dirty();
        }
    }

    pub(crate) fn show_alert(&mut self, kind: AlertKind, message: &str) {
        self.alert = Some(Alert {
            message: message.to_string(),
            kind,
        });
        self.mark_dirty();
    }

    pub(crate) fn dismiss_alert(&mut self) {
        if self.alert.take().is_some() {
            self.mark_dirty();
        }
    }
}
