use crate::{JobKey, JobRecord};

/// Rendered state of the track affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackButton {
    /// Not a trackable job page.
    #[default]
    Hidden,
    /// Presence lookup in flight; clicking is still allowed.
    Checking,
    Enabled,
    /// Track request in flight.
    Tracking,
    Tracked,
}

impl TrackButton {
    pub fn label(self) -> &'static str {
        match self {
            TrackButton::Tracked => "Tracked",
            _ => "Track",
        }
    }

    pub fn is_clickable(self) -> bool {
        matches!(self, TrackButton::Checking | TrackButton::Enabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceView {
    pub page_url: Option<String>,
    pub page_key: Option<JobKey>,
    pub button: TrackButton,
    pub listing: bool,
    pub records: Vec<JobRecord>,
    pub exporting: bool,
    pub alert: Option<Alert>,
    pub dirty: bool,
}
