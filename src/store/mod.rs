//! VisualStash storage layer.
//!
//! The whole durable state lives in a single keyed JSON document
//! (see [`crate::types::record::StashRecord`]); the two scalar panel
//! preferences are stored under independent keys. [`StoreTrait`] is the
//! read/write/subscribe contract every component goes through.
//! [`SqliteStore`] persists; [`MemoryStore`] is the deterministic
//! in-memory fake used by tests.
//!
//! Concurrency contract: whole-document last-write-wins. Writers must
//! re-read immediately before mutating and keep the read-mutate-write
//! window short; racing writers can lose each other's updates.

pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::errors::StoreError;
use crate::types::prefs::PanelPrefs;
use crate::types::record::StashRecord;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Callback invoked with the new document after every committed write.
pub type Subscriber = Arc<dyn Fn(&StashRecord) + Send + Sync>;

/// Handle returned by [`StoreTrait::subscribe`].
pub type SubscriptionId = u64;

/// Contract of the shared key-value store.
///
/// `write` is an atomic full-document replace; partial updates must be
/// expressed as read-modify-write by the caller. Every committed write is
/// delivered to all subscribers, including views owned by the writer
/// itself. Preference writes do not notify record subscribers.
pub trait StoreTrait: Send + Sync {
    fn read(&self) -> Result<StashRecord, StoreError>;
    fn write(&self, record: &StashRecord) -> Result<(), StoreError>;
    fn read_prefs(&self) -> Result<PanelPrefs, StoreError>;
    fn write_prefs(&self, prefs: &PanelPrefs) -> Result<(), StoreError>;
    fn subscribe(&self, callback: Subscriber) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Shared subscriber bookkeeping used by both store implementations.
///
/// Callbacks are invoked outside the internal lock, so a subscriber may
/// read from (or even write to) the store that notified it.
pub struct SubscriberSet {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Subscriber)>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, callback: Subscriber) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    pub fn remove(&self, id: SubscriptionId) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn notify(&self, record: &StashRecord) {
        let callbacks: Vec<Subscriber> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(record);
        }
    }
}

impl Default for SubscriberSet {
    fn default() -> Self {
        Self::new()
    }
}
