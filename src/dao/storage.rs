use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dao::models::CatalogEntity;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or written.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What the backend was doing when it failed.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The persisted snapshot could not be decoded.
    #[error("corrupt snapshot: {message}")]
    Corrupt {
        /// What the backend was decoding when it failed.
        message: String,
        /// Underlying decode failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Construct a corrupt-snapshot error from a decode failure.
    pub fn corrupt(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Corrupt {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

/// Abstraction over the persistence layer for the whole catalog.
///
/// The store must round-trip every entity losslessly, including nested
/// submission histories, since game results stay queryable after a process
/// restart.
pub trait GameStore: Send + Sync {
    /// Replace the persisted snapshot with `snapshot`.
    fn save_snapshot(&self, snapshot: CatalogEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Load the last persisted snapshot, or `None` on first run.
    fn load_snapshot(&self) -> BoxFuture<'static, StorageResult<Option<CatalogEntity>>>;
}
