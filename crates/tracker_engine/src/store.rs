use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracker_core::{InsertOutcome, JobKey, JobRecord, TrackedJobs, TrackedSet};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::notify::{ChangeListener, ChangeNotifier, StoreEvent, SurfaceId};
use crate::storage::{StorageBackend, StorageError, StorageMap};

/// Storage key of the record list.
pub const JOB_DETAILS_KEY: &str = "jobDetails";
/// Storage key of the dedup index.
pub const TRACKED_JOBS_KEY: &str = "trackedJobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackResult {
    Tracked,
    AlreadyTracked,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored `{key}` is malformed: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Tracked job records and their dedup index over shared storage.
///
/// Both collections are always read together and written back in a single
/// storage update. Concurrent `track` calls from different surfaces are
/// not coordinated; the later write wins.
///
/// Each handle acts for one surface. [`JobStore::surface`] creates a handle
/// for another surface over the same storage and notifier.
#[derive(Clone)]
pub struct JobStore {
    backend: Arc<dyn StorageBackend>,
    notifier: ChangeNotifier,
    surface: SurfaceId,
}

impl JobStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_notifier(backend, ChangeNotifier::new())
    }

    pub fn with_notifier(backend: Arc<dyn StorageBackend>, notifier: ChangeNotifier) -> Self {
        let surface = notifier.register();
        Self {
            backend,
            notifier,
            surface,
        }
    }

    /// A handle for a new surface sharing this store.
    pub fn surface(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            notifier: self.notifier.clone(),
            surface: self.notifier.register(),
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    /// Listens for changes made through other surfaces' handles.
    pub fn subscribe(&self) -> ChangeListener {
        self.notifier.subscribe(self.surface)
    }

    pub async fn track(&self, candidate: JobRecord) -> Result<TrackResult, StoreError> {
        let key = candidate.key();
        let mut ledger = self.read_ledger().await?;

        let evicted = match ledger.insert_front(candidate) {
            InsertOutcome::Duplicate => {
                tracker_info!("Job {} already tracked", key);
                return Ok(TrackResult::AlreadyTracked);
            }
            InsertOutcome::Inserted { evicted } => evicted,
        };
        for record in &evicted {
            tracker_debug!("Dropping oldest job {} over capacity", record.key());
        }

        let (records, index) = ledger.into_parts();
        let mut items = StorageMap::new();
        items.insert(JOB_DETAILS_KEY.to_string(), encode(JOB_DETAILS_KEY, &records)?);
        items.insert(TRACKED_JOBS_KEY.to_string(), encode(TRACKED_JOBS_KEY, &index)?);
        self.backend.set(items).await?;

        tracker_info!("Tracked job {} ({} stored)", key, records.len());
        self.notifier.notify(self.surface, StoreEvent::JobDetailsUpdated);
        Ok(TrackResult::Tracked)
    }

    /// Read-only. Both collections are consulted so that a stored index
    /// entry without a record never reports as tracked.
    pub async fn is_tracked(&self, key: &JobKey) -> Result<bool, StoreError> {
        Ok(self.read_ledger().await?.contains(key))
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<JobRecord>, StoreError> {
        let (records, _) = self.read_ledger().await?.into_parts();
        Ok(records)
    }

    /// Returns every record and clears the store in one update. An empty
    /// store yields no records and no change event.
    ///
    /// The read and the removal are one backend call, so a record written by
    /// another surface is either drained or left stored. A `track` that read
    /// the ledger before the drain can still write the drained records back
    /// (last write wins).
    pub async fn drain_all(&self) -> Result<Vec<JobRecord>, StoreError> {
        let mut items = self.backend.take(&[JOB_DETAILS_KEY, TRACKED_JOBS_KEY]).await?;
        let removed = items.clone();
        let ledger = match ledger_from(&mut items) {
            Ok(ledger) => ledger,
            Err(err) => {
                // Undecodable values are put back rather than discarded.
                self.backend.set(removed).await?;
                return Err(err);
            }
        };
        if ledger.is_empty() {
            tracker_debug!("Drain requested on empty store");
            return Ok(Vec::new());
        }

        let (records, _) = ledger.into_parts();
        tracker_info!("Drained {} tracked job(s)", records.len());
        self.notifier.notify(self.surface, StoreEvent::JobDetailsUpdated);
        Ok(records)
    }

    async fn read_ledger(&self) -> Result<TrackedJobs, StoreError> {
        let mut items = self.backend.get(&[JOB_DETAILS_KEY, TRACKED_JOBS_KEY]).await?;
        ledger_from(&mut items)
    }
}

fn ledger_from(items: &mut StorageMap) -> Result<TrackedJobs, StoreError> {
    let records: Vec<JobRecord> = decode(JOB_DETAILS_KEY, items.remove(JOB_DETAILS_KEY))?;
    let index: TrackedSet = decode(TRACKED_JOBS_KEY, items.remove(TRACKED_JOBS_KEY))?;

    let (ledger, repaired) = TrackedJobs::from_parts(records, index);
    if repaired {
        tracker_warn!("Stored job list and index disagreed; using the list as authority");
    }
    Ok(ledger)
}

/// Absent or null values read as an empty collection.
fn decode<T>(key: &'static str, value: Option<Value>) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|source| StoreError::Corrupt { key, source })
        }
    }
}

fn encode<T: serde::Serialize>(key: &'static str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode { key, source })
}
