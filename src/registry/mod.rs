mod files;
mod messages;

pub use files::FileRegistry;
pub use messages::MessageRegistry;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::blob_store::BlobStoreError;

/// Display name substituted when a client leaves author/uploader blank.
pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("entry {0} not found")]
    NotFound(u64),
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },
    #[error("blob storage failed: {0}")]
    Storage(#[source] BlobStoreError),
    #[error("blob missing for entry {0}")]
    BlobMissing(u64),
}

/// A posted text message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub source_address: Option<String>,
}

/// Metadata for an uploaded file. The content itself lives in the blob
/// store under `storage_key`; `display_name` is presentation-only and is
/// never used for disk lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: u64,
    pub display_name: String,
    pub storage_key: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub uploader: String,
    pub created_at: DateTime<Utc>,
    pub source_address: Option<String>,
}

/// Monotonic id allocator. Ids start at 1, increase by one per successful
/// append, and are never reused within an epoch -- deletions leave gaps.
/// Only a full clear resets the sequence.
#[derive(Debug)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn take(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub(crate) fn reset(&mut self) {
        self.next = 1;
    }
}

/// Presentation order is computed per read; storage order stays insertion
/// order. Timestamp ties fall back to id, so later appends still list first.
pub(crate) fn sort_newest_first<T>(entries: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, u64)) {
    entries.sort_by(|a, b| key(b).cmp(&key(a)));
}

pub(crate) fn name_or_anonymous(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => ANONYMOUS.to_string(),
    }
}
