use tracker_core::{Effect, ExportOutcome, Msg, TrackOutcome};
use tracker_engine::{EngineEvent, EngineHandle, ExportSummary, TrackResult};
use tracker_logging::{tracker_debug, tracker_warn};

/// Hands effects to the engine. Returns how many replies to expect.
pub(crate) fn run_effects(engine: &EngineHandle, effects: Vec<Effect>) -> usize {
    let issued = effects.len();
    for effect in effects {
        match effect {
            Effect::QueryPresence { key } => {
                tracker_debug!("QueryPresence key={}", key);
                engine.query_presence(key);
            }
            Effect::Track { candidate } => {
                tracker_debug!("Track key={}", candidate.key());
                engine.track(candidate);
            }
            Effect::LoadRecords => engine.load_records(),
            Effect::Export => engine.export(),
        }
    }
    issued
}

/// An engine event as the surface consumes it.
pub(crate) enum Translated {
    Msg(Msg),
    /// Export failed after the store was drained.
    UnsavedExport { msg: Msg, contents: Vec<u8> },
    PageFailed(String),
}

pub(crate) fn translate(event: EngineEvent) -> Translated {
    match event {
        EngineEvent::PageLoaded { result, .. } => match result {
            Ok(snapshot) => Translated::Msg(Msg::PageChanged {
                url: snapshot.url,
                candidate: snapshot.candidate,
            }),
            Err(message) => Translated::PageFailed(message),
        },
        EngineEvent::PresenceResolved { key, tracked } => {
            Translated::Msg(Msg::PresenceResolved { key, tracked })
        }
        EngineEvent::TrackFinished { key, result } => {
            let outcome = match result {
                Ok(TrackResult::Tracked) => TrackOutcome::Tracked,
                Ok(TrackResult::AlreadyTracked) => TrackOutcome::AlreadyTracked,
                Err(message) => TrackOutcome::Failed(message),
            };
            Translated::Msg(Msg::TrackFinished { key, outcome })
        }
        EngineEvent::RecordsLoaded(Ok(records)) => Translated::Msg(Msg::RecordsLoaded(records)),
        EngineEvent::RecordsLoaded(Err(message)) => {
            Translated::Msg(Msg::RecordsLoadFailed(message))
        }
        EngineEvent::ExportFinished(result) => match result {
            Ok(ExportSummary::Exported { count, path }) => {
                Translated::Msg(Msg::ExportFinished(ExportOutcome::Exported {
                    count,
                    path: path.display().to_string(),
                }))
            }
            Ok(ExportSummary::Empty) => Translated::Msg(Msg::ExportFinished(ExportOutcome::Empty)),
            Err(failure) => {
                let msg = Msg::ExportFinished(ExportOutcome::Failed(failure.message.clone()));
                match failure.unsaved {
                    Some(contents) => {
                        tracker_warn!(
                            "Export of {} byte(s) was drained but not saved",
                            contents.len()
                        );
                        Translated::UnsavedExport { msg, contents }
                    }
                    None => Translated::Msg(msg),
                }
            }
        },
        EngineEvent::StoreChanged => Translated::Msg(Msg::StoreChanged),
    }
}

/// Whether the event answers a command, as opposed to a foreign change.
pub(crate) fn is_reply(event: &EngineEvent) -> bool {
    !matches!(event, EngineEvent::StoreChanged)
}
