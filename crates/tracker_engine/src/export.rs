use std::path::PathBuf;
use std::sync::Arc;

use tracker_core::{JobRecord, COLUMN_TITLES};
use tracker_logging::{tracker_error, tracker_info};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::store::{JobStore, StoreError};

/// Name of the exported file.
pub const EXPORT_FILENAME: &str = "job_tracking_details.csv";

const BYTE_ORDER_MARK: &str = "\u{feff}";
const DELIMITER: char = ',';

/// Destination for exported bytes.
pub trait FileSink: Send + Sync {
    fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, PersistError>;
}

impl FileSink for AtomicFileWriter {
    fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, PersistError> {
        self.write(filename, contents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSummary {
    Exported { count: usize, path: PathBuf },
    /// Nothing was tracked; no file was written.
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not drain tracked jobs: {0}")]
    Store(#[from] StoreError),
    /// The store was already cleared; `contents` holds the export that
    /// could not be saved.
    #[error("could not save {count} exported job(s): {source}")]
    Save {
        count: usize,
        contents: Vec<u8>,
        source: PersistError,
    },
    #[error("export task failed: {0}")]
    Task(String),
}

/// Wraps every cell in quotes, doubling embedded quotes.
fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn csv_row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells
        .into_iter()
        .map(quote_cell)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Header row followed by one row per record, joined with `\n`.
pub fn records_to_csv(records: &[JobRecord]) -> String {
    std::iter::once(csv_row(COLUMN_TITLES))
        .chain(records.iter().map(|record| csv_row(record.columns())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The exported file contents: UTF-8 with a leading byte-order mark.
pub fn csv_document(records: &[JobRecord]) -> Vec<u8> {
    let mut document = String::from(BYTE_ORDER_MARK);
    document.push_str(&records_to_csv(records));
    document.into_bytes()
}

/// Drains the store into a CSV file.
#[derive(Clone)]
pub struct CsvExporter {
    sink: Arc<dyn FileSink>,
}

impl CsvExporter {
    pub fn new(sink: Arc<dyn FileSink>) -> Self {
        Self { sink }
    }

    pub fn to_dir(dir: PathBuf) -> Self {
        Self::new(Arc::new(AtomicFileWriter::new(dir)))
    }

    pub async fn export(&self, store: &JobStore) -> Result<ExportSummary, ExportError> {
        let records = store.drain_all().await?;
        if records.is_empty() {
            tracker_info!("Export skipped: no tracked jobs");
            return Ok(ExportSummary::Empty);
        }

        let count = records.len();
        let contents = csv_document(&records);
        let sink = self.sink.clone();
        let saved = tokio::task::spawn_blocking(move || {
            let result = sink.save(EXPORT_FILENAME, &contents);
            (result, contents)
        })
        .await
        .map_err(|err| ExportError::Task(err.to_string()))?;

        match saved {
            (Ok(path), _) => {
                tracker_info!("Exported {} job(s) to {:?}", count, path);
                Ok(ExportSummary::Exported { count, path })
            }
            (Err(source), contents) => {
                tracker_error!("Saving export of {} job(s) failed: {}", count, source);
                Err(ExportError::Save {
                    count,
                    contents,
                    source,
                })
            }
        }
    }
}
