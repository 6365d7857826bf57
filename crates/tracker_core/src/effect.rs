use crate::{JobKey, JobRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the store whether `key` is already tracked.
    QueryPresence { key: JobKey },
    /// Persist `candidate` through the store's track operation.
    Track { candidate: JobRecord },
    /// Re-read the full record list.
    LoadRecords,
    /// Drain the store into the export file.
    Export,
}
