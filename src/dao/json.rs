//! JSON-file storage backend with atomic write-then-rename persistence.

use std::path::PathBuf;

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    models::CatalogEntity,
    storage::{GameStore, StorageError, StorageResult},
};

/// Stores the entire catalog as a single pretty-printed JSON document.
///
/// Writes go to a sibling temporary file first and are renamed into place,
/// so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`. Parent directories are created on
    /// the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_snapshot(path: PathBuf, snapshot: CatalogEntity) -> StorageResult<()> {
        let payload = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| StorageError::corrupt("encoding catalog snapshot", err))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StorageError::unavailable("creating snapshot directory", err))?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &payload)
            .await
            .map_err(|err| StorageError::unavailable("writing snapshot file", err))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|err| StorageError::unavailable("renaming snapshot into place", err))?;

        Ok(())
    }

    async fn read_snapshot(path: PathBuf) -> StorageResult<Option<CatalogEntity>> {
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::unavailable("reading snapshot file", err)),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let snapshot = serde_json::from_slice(&raw)
            .map_err(|err| StorageError::corrupt("decoding catalog snapshot", err))?;
        Ok(Some(snapshot))
    }
}

impl GameStore for JsonFileStore {
    fn save_snapshot(&self, snapshot: CatalogEntity) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(Self::write_snapshot(path, snapshot))
    }

    fn load_snapshot(&self) -> BoxFuture<'static, StorageResult<Option<CatalogEntity>>> {
        let path = self.path.clone();
        Box::pin(Self::read_snapshot(path))
    }
}
