//! Tracker core: job record model, the tracked-jobs ledger, and the pure
//! surface state machine.
mod effect;
mod ledger;
mod msg;
pub mod page;
mod record;
pub mod review;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use ledger::{InsertOutcome, TrackedJobs, TrackedSet, TRACK_CAP};
pub use msg::{ExportOutcome, Msg, TrackOutcome};
pub use record::{JobKey, JobRecord, COLUMN_TITLES, UNAVAILABLE};
pub use state::{
    SurfaceState, MSG_ALREADY_TRACKED, MSG_EXPORTED, MSG_EXPORT_FAILED, MSG_LOAD_FAILED,
    MSG_NOTHING_TO_EXPORT, MSG_TRACKED, MSG_TRACK_FAILED,
};
pub use update::update;
pub use view_model::{Alert, AlertKind, SurfaceView, TrackButton};
