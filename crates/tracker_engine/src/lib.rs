//! Tracker engine: storage, the job store, change notification, page
//! extraction, and export.
mod decode;
mod engine;
mod export;
mod extract;
mod fetch;
mod notify;
mod persist;
mod storage;
mod store;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::{EngineConfig, EngineEvent, EngineHandle, ExportFailure, PageSnapshot};
pub use export::{
    csv_document, records_to_csv, CsvExporter, ExportError, ExportSummary, FileSink,
    EXPORT_FILENAME,
};
pub use extract::{local_capture_stamp, CaptureClock, CaptureStamp, Extractor, JobPageExtractor};
pub use fetch::{FetchError, FetchSettings, FetchedPage, Fetcher, ReqwestFetcher};
pub use notify::{ChangeListener, ChangeNotifier, StoreEvent, SurfaceId};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use storage::{JsonFileStorage, MemoryStorage, StorageBackend, StorageError, StorageMap};
pub use store::{JobStore, StoreError, TrackResult, JOB_DETAILS_KEY, TRACKED_JOBS_KEY};
