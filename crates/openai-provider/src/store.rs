//! Conversation handle storage.
//!
//! Maps requester identity keys to durable server-side conversation ids,
//! with per-key mutual exclusion on creation and LRU eviction to bound
//! memory. Handle invalidation and recreation stay local to this store;
//! the orchestrator's fallback budget never sees them.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use reply_core::ProviderError;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Default maximum number of requesters to track before LRU eviction.
const DEFAULT_MAX_REQUESTERS: usize = 10000;

/// A durable reference to provider-side conversation state.
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    /// Identity key of the requester this handle belongs to.
    pub requester_key: String,
    /// Provider-side conversation id.
    pub conversation_id: String,
    /// When this handle was created locally.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Slot {
    handle: Option<ConversationHandle>,
}

/// Per-requester conversation handle store with LRU eviction.
///
/// Create-if-absent is atomic per key: concurrent first calls for the same
/// requester serialize on the key's slot lock, so exactly one handle is
/// created and the loser reuses it. An evicted or invalidated handle is
/// harmless; the next call simply creates a fresh one.
#[derive(Debug)]
pub struct ConversationStore {
    slots: RwLock<IndexMap<String, Arc<Mutex<Slot>>>>,
    max_requesters: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTERS)
    }
}

impl ConversationStore {
    /// Create a store tracking at most `max_requesters` keys.
    pub fn new(max_requesters: usize) -> Self {
        Self {
            slots: RwLock::new(IndexMap::new()),
            max_requesters,
        }
    }

    /// Get the slot for a key, creating it and evicting the oldest entries
    /// if the requester limit is exceeded.
    async fn slot(&self, key: &str) -> Arc<Mutex<Slot>> {
        let mut slots = self.slots.write().await;

        // Move to end to mark as recently used (LRU behavior)
        let slot = match slots.shift_remove(key) {
            Some(slot) => slot,
            None => Arc::new(Mutex::new(Slot::default())),
        };
        slots.insert(key.to_string(), slot.clone());

        while slots.len() > self.max_requesters {
            if let Some((evicted, _)) = slots.shift_remove_index(0) {
                debug!(requester = %evicted, "Evicted conversation handle");
            }
        }

        slot
    }

    /// Return the handle for `key`, creating one via `create` if absent.
    ///
    /// The create call runs under the key's slot lock, so a racing caller
    /// waits and then reuses the winner's handle instead of creating a
    /// duplicate.
    pub async fn lookup_or_create<F, Fut>(
        &self,
        key: &str,
        create: F,
    ) -> Result<ConversationHandle, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, ProviderError>>,
    {
        let slot = self.slot(key).await;
        let mut guard = slot.lock().await;

        if let Some(handle) = guard.handle.clone() {
            return Ok(handle);
        }

        let conversation_id = create().await?;
        let handle = ConversationHandle {
            requester_key: key.to_string(),
            conversation_id,
            created_at: Utc::now(),
        };
        debug!(requester = %key, conversation = %handle.conversation_id, "Created conversation");
        guard.handle = Some(handle.clone());
        Ok(handle)
    }

    /// Discard a handle the provider rejected as unknown.
    ///
    /// The handle is removed only if the stored conversation id still
    /// matches; a racing caller may already have recreated it.
    pub async fn invalidate(&self, key: &str, conversation_id: &str) {
        let slot = {
            let slots = self.slots.read().await;
            slots.get(key).cloned()
        };

        if let Some(slot) = slot {
            let mut guard = slot.lock().await;
            let stale = guard
                .handle
                .as_ref()
                .map(|h| h.conversation_id == conversation_id)
                .unwrap_or(false);
            if stale {
                warn!(requester = %key, conversation = %conversation_id, "Discarding rejected conversation handle");
                guard.handle = None;
            }
        }
    }

    /// Number of tracked requesters.
    pub async fn requester_count(&self) -> usize {
        self.slots.read().await.len()
    }
}
