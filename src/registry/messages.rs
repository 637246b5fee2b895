use chrono::Utc;
use tokio::sync::RwLock;

use super::{name_or_anonymous, sort_newest_first, IdSequence, Message, RegistryError};

/// Authoritative, ordered store of text posts. All mutations go through the
/// write lock; reads clone a snapshot and never block future appends.
pub struct MessageRegistry {
    state: RwLock<MessageState>,
}

struct MessageState {
    entries: Vec<Message>,
    ids: IdSequence,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MessageState {
                entries: Vec::new(),
                ids: IdSequence::new(),
            }),
        }
    }

    /// Append a message. Content is trimmed and must be non-empty; a blank
    /// author falls back to the anonymous sentinel.
    pub async fn append(
        &self,
        content: &str,
        author: Option<&str>,
        source_address: Option<String>,
    ) -> Result<Message, RegistryError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(RegistryError::Validation(
                "message content must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        let message = Message {
            id: state.ids.take(),
            content: content.to_string(),
            author: name_or_anonymous(author),
            created_at: Utc::now(),
            source_address,
        };
        state.entries.push(message.clone());

        Ok(message)
    }

    /// Snapshot of all messages, newest first.
    pub async fn list(&self) -> Vec<Message> {
        let mut entries = self.state.read().await.entries.clone();
        sort_newest_first(&mut entries, |m| (m.created_at, m.id));
        entries
    }

    /// Delete one message by id. Deleting an absent id fails; it never
    /// silently succeeds.
    pub async fn delete(&self, id: u64) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        let pos = state
            .entries
            .iter()
            .position(|m| m.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        state.entries.remove(pos);
        Ok(())
    }

    /// Empty the registry and restart id numbering from 1.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.ids.reset();
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
