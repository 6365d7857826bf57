use crate::page::is_trackable_url;
use crate::state::{
    PageContext, MSG_ALREADY_TRACKED, MSG_EXPORTED, MSG_EXPORT_FAILED, MSG_LOAD_FAILED,
    MSG_NOTHING_TO_EXPORT, MSG_TRACKED, MSG_TRACK_FAILED,
};
use crate::view_model::{AlertKind, TrackButton};
use crate::{Effect, ExportOutcome, Msg, SurfaceState, TrackOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SurfaceState, msg: Msg) -> (SurfaceState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageChanged { url, candidate } => {
            let page = candidate
                .filter(|_| is_trackable_url(&url))
                .map(|candidate| PageContext {
                    key: candidate.key(),
                    url: url.clone(),
                    candidate,
                });
            let unchanged = state.page_url() == Some(url.as_str())
                && state.page().map(|p| &p.key) == page.as_ref().map(|p| &p.key);
            if unchanged {
                return (state, Vec::new());
            }
            let query = page.as_ref().map(|page| Effect::QueryPresence {
                key: page.key.clone(),
            });
            state.set_page(url, page);
            query.into_iter().collect()
        }
        Msg::PresenceResolved { key, tracked } => {
            // Results for a page the surface has moved away from are stale.
            if state.is_current_key(&key) && state.button() != TrackButton::Tracking {
                // An unreadable store must not block tracking.
                let button = if tracked.unwrap_or(false) {
                    TrackButton::Tracked
                } else {
                    TrackButton::Enabled
                };
                state.set_button(button);
            }
            Vec::new()
        }
        Msg::TrackClicked => match state.page() {
            Some(page) if state.button().is_clickable() => {
                let candidate = page.candidate.clone();
                state.set_button(TrackButton::Tracking);
                vec![Effect::Track { candidate }]
            }
            _ => Vec::new(),
        },
        Msg::TrackFinished { key, outcome } => {
            let current = state.is_current_key(&key);
            match outcome {
                TrackOutcome::Tracked => {
                    if current {
                        state.set_button(TrackButton::Tracked);
                    }
                    state.show_alert(AlertKind::Info, MSG_TRACKED);
                    // Own writes are not echoed back by the notifier.
                    if state.is_listing() {
                        vec![Effect::LoadRecords]
                    } else {
                        Vec::new()
                    }
                }
                TrackOutcome::AlreadyTracked => {
                    if current {
                        state.set_button(TrackButton::Tracked);
                    }
                    state.show_alert(AlertKind::Info, MSG_ALREADY_TRACKED);
                    Vec::new()
                }
                TrackOutcome::Failed(_) => {
                    if current {
                        state.set_button(TrackButton::Enabled);
                    }
                    state.show_alert(AlertKind::Error, MSG_TRACK_FAILED);
                    Vec::new()
                }
            }
        }
        Msg::StoreChanged => {
            let mut effects = Vec::with_capacity(2);
            if let Some(page) = state.page() {
                if state.button() != TrackButton::Tracking {
                    effects.push(Effect::QueryPresence {
                        key: page.key.clone(),
                    });
                }
            }
            if state.is_listing() {
                effects.push(Effect::LoadRecords);
            }
            effects
        }
        Msg::ListingOpened => {
            state.open_listing();
            vec![Effect::LoadRecords]
        }
        Msg::RecordsLoaded(records) => {
            state.set_records(records);
            Vec::new()
        }
        Msg::RecordsLoadFailed(_) => {
            state.show_alert(AlertKind::Error, MSG_LOAD_FAILED);
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.is_exporting() {
                Vec::new()
            } else {
                state.set_exporting(true);
                vec![Effect::Export]
            }
        }
        Msg::ExportFinished(outcome) => {
            state.set_exporting(false);
            match outcome {
                ExportOutcome::Exported { .. } => {
                    state.clear_records();
                    state.show_alert(AlertKind::Info, MSG_EXPORTED);
                    match state.page() {
                        Some(page) => vec![Effect::QueryPresence {
                            key: page.key.clone(),
                        }],
                        None => Vec::new(),
                    }
                }
                ExportOutcome::Empty => {
                    state.show_alert(AlertKind::Error, MSG_NOTHING_TO_EXPORT);
                    Vec::new()
                }
                ExportOutcome::Failed(_) => {
                    state.show_alert(AlertKind::Error, MSG_EXPORT_FAILED);
                    Vec::new()
                }
            }
        }
        Msg::AlertDismissed => {
            state.dismiss_alert();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
