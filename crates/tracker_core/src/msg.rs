use crate::{JobKey, JobRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The observed page changed identity. `candidate` is `None` when the
    /// page is not a job detail view.
    PageChanged {
        url: String,
        candidate: Option<JobRecord>,
    },
    /// Presence lookup finished. `None` means the store could not be read.
    PresenceResolved { key: JobKey, tracked: Option<bool> },
    /// User clicked the track affordance.
    TrackClicked,
    /// Store finished a track request.
    TrackFinished { key: JobKey, outcome: TrackOutcome },
    /// Another surface changed the store.
    StoreChanged,
    /// The record listing was opened.
    ListingOpened,
    RecordsLoaded(Vec<JobRecord>),
    RecordsLoadFailed(String),
    /// User clicked Export.
    ExportClicked,
    ExportFinished(ExportOutcome),
    AlertDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Tracked,
    AlreadyTracked,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported { count: usize, path: String },
    Empty,
    Failed(String),
}
