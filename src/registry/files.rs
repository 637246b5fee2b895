use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{name_or_anonymous, sort_newest_first, FileRecord, IdSequence, RegistryError};
use crate::blob_store::{BlobStore, BlobStoreError};

/// Authoritative store of file metadata, paired with blob lifecycle
/// management. Every live record had its blob written before the record
/// became visible; deleting a record deletes its blob. An orphaned blob
/// with no record is tolerated and never surfaced.
pub struct FileRegistry {
    blobs: Arc<dyn BlobStore>,
    max_upload_size: u64,
    state: RwLock<FileState>,
}

struct FileState {
    entries: Vec<FileRecord>,
    ids: IdSequence,
}

impl FileRegistry {
    pub fn new(blobs: Arc<dyn BlobStore>, max_upload_size: u64) -> Self {
        Self {
            blobs,
            max_upload_size,
            state: RwLock::new(FileState {
                entries: Vec::new(),
                ids: IdSequence::new(),
            }),
        }
    }

    /// Store a file: size check, then blob write, then metadata append.
    /// The blob write must succeed before any record exists, so a failed
    /// append has no visible effect.
    pub async fn append(
        &self,
        display_name: &str,
        mime_type: &str,
        uploader: Option<&str>,
        source_address: Option<String>,
        data: Bytes,
    ) -> Result<FileRecord, RegistryError> {
        let size_bytes = data.len() as u64;
        if size_bytes > self.max_upload_size {
            return Err(RegistryError::PayloadTooLarge {
                size: size_bytes,
                limit: self.max_upload_size,
            });
        }

        let storage_key = storage_key_for(display_name);
        self.blobs
            .put(&storage_key, data)
            .await
            .map_err(RegistryError::Storage)?;

        let mut state = self.state.write().await;
        let record = FileRecord {
            id: state.ids.take(),
            display_name: display_name.to_string(),
            storage_key,
            size_bytes,
            mime_type: mime_type.to_string(),
            uploader: name_or_anonymous(uploader),
            created_at: Utc::now(),
            source_address,
        };
        state.entries.push(record.clone());

        Ok(record)
    }

    /// Snapshot of all file records, newest first.
    pub async fn list(&self) -> Vec<FileRecord> {
        let mut entries = self.state.read().await.entries.clone();
        sort_newest_first(&mut entries, |f| (f.created_at, f.id));
        entries
    }

    /// Look up a record and fetch its content. A record whose blob has
    /// gone missing is a detectable inconsistency, reported distinctly
    /// from an id that never existed.
    pub async fn resolve(&self, id: u64) -> Result<(FileRecord, Bytes), RegistryError> {
        let record = self
            .state
            .read()
            .await
            .entries
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))?;

        match self.blobs.get(&record.storage_key).await {
            Ok(data) => Ok((record, data)),
            Err(BlobStoreError::NotFound(_)) => Err(RegistryError::BlobMissing(id)),
            Err(e) => Err(RegistryError::Storage(e)),
        }
    }

    /// Delete one record and its blob. A blob already gone at delete time
    /// is the end state we want anyway; other blob failures are logged
    /// and the metadata delete stands.
    pub async fn delete(&self, id: u64) -> Result<(), RegistryError> {
        let record = {
            let mut state = self.state.write().await;
            let pos = state
                .entries
                .iter()
                .position(|f| f.id == id)
                .ok_or(RegistryError::NotFound(id))?;
            state.entries.remove(pos)
        };

        if let Err(e) = self.blobs.delete(&record.storage_key).await {
            tracing::warn!(file_id = id, error = %e, "Failed to remove blob for deleted file");
        }

        Ok(())
    }

    /// Drop every record, restart id numbering, and sweep the backing
    /// blobs best-effort.
    pub async fn clear(&self) {
        let drained: Vec<FileRecord> = {
            let mut state = self.state.write().await;
            state.ids.reset();
            std::mem::take(&mut state.entries)
        };

        for record in &drained {
            if let Err(e) = self.blobs.delete(&record.storage_key).await {
                tracing::warn!(file_id = record.id, error = %e, "Failed to remove blob during clear");
            }
        }
    }
}

/// Build a storage key that cannot collide across concurrent uploads of
/// identically named files: millisecond prefix, random token, sanitized
/// display name as a human-readable tail.
fn storage_key_for(display_name: &str) -> String {
    format!(
        "{}_{}_{}",
        Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        sanitize_name(display_name)
    )
}

/// Strip the display name down to a safe ASCII filename fragment. The
/// result is decoration only; uniqueness comes from the key prefix.
fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    out.truncate(64);
    if out.is_empty() {
        out.push_str("file");
    }
    out
}
