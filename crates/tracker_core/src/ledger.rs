use std::collections::{BTreeMap, BTreeSet};

use crate::{JobKey, JobRecord};

/// Maximum number of records retained; the oldest are dropped first.
pub const TRACK_CAP: usize = 10;

/// Map from a job's storage key to its presence marker.
pub type TrackedSet = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted { evicted: Vec<JobRecord> },
    Duplicate,
}

/// The tracked record list together with its dedup index.
///
/// Dedup runs on the `(title, company)` pair held in `keys`. The stored
/// `index` only mirrors it in its joined string form, so two distinct pairs
/// may share one index entry. Invariant: a key is in `keys` iff a record
/// with that key is in the list, and the list never holds more than
/// [`TRACK_CAP`] records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackedJobs {
    records: Vec<JobRecord>,
    keys: BTreeSet<JobKey>,
    index: TrackedSet,
}

impl TrackedJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored collections, repairing any mismatch
    /// between them. Returns the ledger and whether a repair was needed.
    pub fn from_parts(mut records: Vec<JobRecord>, index: TrackedSet) -> (Self, bool) {
        let mut repaired = false;
        if records.len() > TRACK_CAP {
            records.truncate(TRACK_CAP);
            repaired = true;
        }

        let mut keys = BTreeSet::new();
        let mut rebuilt = TrackedSet::new();
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            let key = record.key();
            if keys.contains(&key) {
                repaired = true;
                continue;
            }
            rebuilt.insert(key.storage_key(), true);
            keys.insert(key);
            kept.push(record);
        }

        if rebuilt.len() != index.len() || !rebuilt.keys().all(|k| index.get(k) == Some(&true)) {
            repaired = true;
        }

        (
            Self {
                records: kept,
                keys,
                index: rebuilt,
            },
            repaired,
        )
    }

    pub fn contains(&self, key: &JobKey) -> bool {
        self.keys.contains(key)
    }

    /// Prepends `candidate` unless its key is already tracked, then drops
    /// tail records beyond the cap along with their index entries.
    pub fn insert_front(&mut self, candidate: JobRecord) -> InsertOutcome {
        let key = candidate.key();
        if self.contains(&key) {
            return InsertOutcome::Duplicate;
        }

        self.records.insert(0, candidate);
        self.index.insert(key.storage_key(), true);
        self.keys.insert(key);

        let evicted = if self.records.len() > TRACK_CAP {
            self.records.split_off(TRACK_CAP)
        } else {
            Vec::new()
        };
        for record in &evicted {
            self.keys.remove(&record.key());
        }
        for record in &evicted {
            let stored = record.key().storage_key();
            if !self.keys.iter().any(|key| key.storage_key() == stored) {
                self.index.remove(&stored);
            }
        }

        InsertOutcome::Inserted { evicted }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn index(&self) -> &TrackedSet {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (Vec<JobRecord>, TrackedSet) {
        (self.records, self.index)
    }
}
