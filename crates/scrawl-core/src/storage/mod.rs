//! Storage abstraction for persistence.
//!
//! Backends move opaque byte buffers; they never interpret the codec's
//! payload. Naming and directory layout beyond the base path are the
//! host's concern.

mod coordinator;
mod file;
mod memory;

pub use coordinator::SaveCoordinator;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::codec::CodecError;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No document is stored under the requested id. Absence is a normal
    /// first-run condition, kept distinct from a corrupt payload.
    #[error("document not found: {0}")]
    NotFound(String),
    /// A stored payload failed to decode.
    #[error("document {id} is corrupt: {source}")]
    Corrupt { id: String, source: CodecError },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for byte-buffer storage backends.
///
/// Operations may run on a worker away from the interaction thread, so
/// implementations must be Send + Sync.
pub trait Storage: Send + Sync {
    /// Persist a payload under an id.
    fn save(&self, id: &str, bytes: &[u8]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the payload stored under an id.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>>;

    /// Delete a stored payload.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a payload exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
