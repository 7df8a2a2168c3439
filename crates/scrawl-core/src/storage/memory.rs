//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    payloads: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, bytes: &[u8]) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let bytes = bytes.to_vec();
        Box::pin(async move {
            let mut payloads = self
                .payloads
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {}", e)))?;
            payloads.insert(id, bytes);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let id = id.to_string();
        Box::pin(async move {
            let payloads = self
                .payloads
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {}", e)))?;
            payloads
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut payloads = self
                .payloads
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {}", e)))?;
            payloads.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let payloads = self
                .payloads
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {}", e)))?;
            Ok(payloads.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let payloads = self
                .payloads
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {}", e)))?;
            Ok(payloads.contains_key(&id))
        })
    }
}
