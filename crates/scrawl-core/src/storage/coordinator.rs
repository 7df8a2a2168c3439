//! Save coordination between the interaction thread and persistence.
//!
//! The session stamps edits; the coordinator stamps saves. A document is
//! dirty when the latest edit postdates the latest save, and destructive
//! operations (switching documents, teardown) must drain that dirt
//! through [`SaveCoordinator::save_if_dirty`] before proceeding.

use super::{Storage, StorageError, StorageResult};
use crate::codec;
use crate::document::Document;
use std::sync::Arc;
use std::time::Instant;

/// Persistence gatekeeper for one drawing surface.
pub struct SaveCoordinator<S: Storage> {
    storage: Arc<S>,
    /// Completion time of the most recent successful save or load.
    last_save: Option<Instant>,
}

impl<S: Storage> SaveCoordinator<S> {
    /// Create a coordinator over the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            last_save: None,
        }
    }

    /// Whether edits exist that postdate the last completed save.
    pub fn is_dirty(&self, last_edit: Option<Instant>) -> bool {
        match (last_edit, self.last_save) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(edit), Some(save)) => save < edit,
        }
    }

    /// Encode a snapshot and persist it.
    ///
    /// A failure is reported and leaves both the in-memory document and
    /// the dirty state untouched; there is no automatic retry.
    pub async fn save(&mut self, id: &str, document: &Document) -> StorageResult<()> {
        let bytes =
            codec::encode(document).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.save(id, &bytes).await?;
        self.last_save = Some(Instant::now());
        log::debug!("saved document {} ({} strokes)", id, document.len());
        Ok(())
    }

    /// Gate for destructive operations: saves first when dirty, completes
    /// immediately otherwise. Returns whether a save was performed.
    pub async fn save_if_dirty(
        &mut self,
        id: &str,
        document: &Document,
        last_edit: Option<Instant>,
    ) -> StorageResult<bool> {
        if !self.is_dirty(last_edit) {
            return Ok(false);
        }
        self.save(id, document).await?;
        Ok(true)
    }

    /// Load and decode a stored document.
    ///
    /// Absence is `Ok(None)` (a fresh canvas), while a payload that fails
    /// to decode is an error — the host can tell a first run from lost
    /// data.
    pub async fn load_document(&mut self, id: &str) -> StorageResult<Option<Document>> {
        let bytes = match self.storage.load(id).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        match codec::decode(&bytes) {
            Ok(document) => {
                self.last_save = Some(Instant::now());
                Ok(Some(document))
            }
            Err(source) => {
                log::warn!("stored document {} is corrupt: {}", id, source);
                Err(StorageError::Corrupt {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Delete a stored document.
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Check if a document exists.
    pub async fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id).await
    }

    /// List all stored document ids.
    pub async fn list_documents(&self) -> StorageResult<Vec<String>> {
        self.storage.list().await
    }

    /// Completion time of the last successful save, if any.
    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
