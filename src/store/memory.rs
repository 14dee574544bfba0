//! In-memory store implementing the same contract as [`super::SqliteStore`].
//!
//! The deterministic fake used by tests and the demo binary. Supports an
//! induced write-failure mode so callers can exercise the
//! fatal-for-operation path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{StoreTrait, Subscriber, SubscriberSet, SubscriptionId};
use crate::types::errors::StoreError;
use crate::types::prefs::PanelPrefs;
use crate::types::record::StashRecord;

/// Store holding everything in process memory.
pub struct MemoryStore {
    record: Mutex<Option<StashRecord>>,
    prefs: Mutex<PanelPrefs>,
    subscribers: SubscriberSet,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(None),
            prefs: Mutex::new(PanelPrefs::default()),
            subscribers: SubscriberSet::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// When enabled, every `write`/`write_prefs` fails with a database
    /// error until disabled again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreTrait for MemoryStore {
    fn read(&self) -> Result<StashRecord, StoreError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default())
    }

    fn write(&self, record: &StashRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::DatabaseError("induced write failure".to_string()));
        }
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        self.subscribers.notify(record);
        Ok(())
    }

    fn read_prefs(&self) -> Result<PanelPrefs, StoreError> {
        Ok(*self.prefs.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_prefs(&self, prefs: &PanelPrefs) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::DatabaseError("induced write failure".to_string()));
        }
        *self.prefs.lock().unwrap_or_else(PoisonError::into_inner) = *prefs;
        Ok(())
    }

    fn subscribe(&self, callback: Subscriber) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id)
    }
}
