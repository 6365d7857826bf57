use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use thiserror::Error;
use tracker_logging::tracker_debug;

use crate::persist::{AtomicFileWriter, PersistError};

/// Key/value document held by a storage backend.
pub type StorageMap = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage write failed: {0}")]
    Persist(#[from] PersistError),
    #[error("storage document {path:?} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("storage document could not be serialized: {0}")]
    Serialize(serde_json::Error),
    #[error("storage document {0:?} is not a JSON object")]
    NotAnObject(PathBuf),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Shared persistent key/value storage.
///
/// Each call is applied as one document update: a `set` carrying several
/// keys never becomes visible half-written. Calls from different surfaces
/// are not ordered relative to each other.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the stored values for `keys`; absent keys are omitted.
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StorageError>;
    /// Stores every entry of `items` in one update.
    async fn set(&self, items: StorageMap) -> Result<(), StorageError>;
    /// Removes `keys` in one update. Absent keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// Returns the stored values for `keys` and removes them. Nothing is
    /// written when none of the keys is present.
    ///
    /// The default reads and removes in two calls; backends that can hold
    /// their document across both override it.
    async fn take(&self, keys: &[&str]) -> Result<StorageMap, StorageError> {
        let items = self.get(keys).await?;
        if !items.is_empty() {
            self.remove(keys).await?;
        }
        Ok(items)
    }
}

fn take_from(document: &mut StorageMap, keys: &[&str]) -> StorageMap {
    keys.iter()
        .filter_map(|key| document.remove(*key).map(|value| ((*key).to_string(), value)))
        .collect()
}

fn pick(document: &StorageMap, keys: &[&str]) -> StorageMap {
    keys.iter()
        .filter_map(|key| {
            document
                .get(*key)
                .map(|value| ((*key).to_string(), value.clone()))
        })
        .collect()
}

/// In-process storage. Clones share the same document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Arc<Mutex<StorageMap>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the raw document, for inspection.
    pub fn snapshot(&self) -> StorageMap {
        match self.document.lock() {
            Ok(document) => document.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn with_document<T>(&self, f: impl FnOnce(&mut StorageMap) -> T) -> Result<T, StorageError> {
        let mut document = self
            .document
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))?;
        Ok(f(&mut document))
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StorageError> {
        self.with_document(|document| pick(document, keys))
    }

    async fn set(&self, items: StorageMap) -> Result<(), StorageError> {
        self.with_document(|document| document.extend(items))
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.with_document(|document| {
            for key in keys {
                document.remove(*key);
            }
        })
    }

    async fn take(&self, keys: &[&str]) -> Result<StorageMap, StorageError> {
        self.with_document(|document| take_from(document, keys))
    }
}

/// Storage kept as one JSON object in a file.
///
/// Updates rewrite the whole file atomically. Updates issued through the
/// same instance are serialized; separate processes sharing the file race
/// with last-write-wins.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<StorageMap, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracker_debug!("Storage file {:?} not found; starting empty", self.path);
                return Ok(StorageMap::new());
            }
            Err(err) => return Err(StorageError::Io(err)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StorageMap::new());
        }

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        match value {
            Value::Object(document) => Ok(document),
            _ => Err(StorageError::NotAnObject(self.path.clone())),
        }
    }

    async fn write_document(&self, document: &StorageMap) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(document).map_err(StorageError::Serialize)?;
        let (dir, filename) = split_path(&self.path)?;
        let writer = AtomicFileWriter::new(dir);
        tokio::task::spawn_blocking(move || writer.write(&filename, &content))
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))??;
        Ok(())
    }

    async fn update(&self, f: impl FnOnce(&mut StorageMap) + Send) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        f(&mut document);
        self.write_document(&document).await
    }
}

fn split_path(path: &Path) -> Result<(PathBuf, String), StorageError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            StorageError::Unavailable(format!("storage path {path:?} has no file name"))
        })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, filename))
}

#[async_trait::async_trait]
impl StorageBackend for JsonFileStorage {
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StorageError> {
        let document = self.read_document().await?;
        Ok(pick(&document, keys))
    }

    async fn set(&self, items: StorageMap) -> Result<(), StorageError> {
        self.update(move |document| document.extend(items)).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let keys: Vec<String> = keys.iter().map(|key| (*key).to_string()).collect();
        self.update(move |document| {
            for key in &keys {
                if document.remove(key).is_none() {
                    tracker_debug!("Storage key {} was already absent", key);
                }
            }
        })
        .await
    }

    async fn take(&self, keys: &[&str]) -> Result<StorageMap, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let items = take_from(&mut document, keys);
        if !items.is_empty() {
            self.write_document(&document).await?;
        }
        Ok(items)
    }
}
