// ABOUTME: Process-wide map from batch key to its accumulating pending group.
// ABOUTME: All mutation happens under one mutex; conditional take prevents double dispatch.

use crate::message::{BatchKey, InboundMessage};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::task::AbortHandle;

/// Accumulating group of messages for one batch key, plus the currently
/// armed flush timer.
///
/// Invariants: at most one live flush handle at any instant; `generation`
/// increases on every re-arm, and a flush may only drain the group while
/// its generation still matches the one it was armed with.
#[derive(Default)]
pub struct PendingGroup {
    pub messages: Vec<InboundMessage>,
    pub flush: Option<AbortHandle>,
    pub generation: u64,
}

/// Shared mapping from [`BatchKey`] to [`PendingGroup`].
///
/// A single mutex guards the whole map; every critical section is a few
/// pointer moves, so per-key locking is not worth its bookkeeping here.
#[derive(Default)]
pub struct DebounceStore {
    groups: Mutex<HashMap<BatchKey, PendingGroup>>,
}

impl DebounceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically get-or-create the group for `key` and apply `mutate` to it.
    ///
    /// Append and re-arm happen inside one call so a concurrent flush for
    /// the same key cannot interleave between them.
    pub fn upsert<R>(&self, key: &BatchKey, mutate: impl FnOnce(&mut PendingGroup) -> R) -> R {
        let mut groups = self.lock();
        let group = groups.entry(key.clone()).or_default();
        mutate(group)
    }

    /// Atomically remove and return the batch for `key`, but only if the
    /// group's generation still equals `generation`.
    ///
    /// A timer that was superseded by a later re-arm (and whose abort raced
    /// past its fire point) observes a generation mismatch and drains
    /// nothing. This, not cancellation, is the authoritative guard against
    /// duplicate or early dispatch.
    pub fn take_if_generation(
        &self,
        key: &BatchKey,
        generation: u64,
    ) -> Option<Vec<InboundMessage>> {
        let mut groups = self.lock();
        match groups.get(key) {
            Some(group) if group.generation == generation => {
                groups.remove(key).map(|g| g.messages)
            }
            _ => None,
        }
    }

    /// Atomically remove and return the group for `key` regardless of
    /// generation. Used by the shutdown drain; a second concurrent caller
    /// observes `None`.
    pub fn take_and_remove(&self, key: &BatchKey) -> Option<PendingGroup> {
        let mut group = self.lock().remove(key)?;
        if let Some(handle) = group.flush.take() {
            handle.abort();
        }
        Some(group)
    }

    /// Remove every pending group, aborting any armed flush timers.
    pub fn drain_all(&self) -> Vec<(BatchKey, PendingGroup)> {
        let drained: Vec<_> = self.lock().drain().collect();
        drained
            .into_iter()
            .map(|(key, mut group)| {
                if let Some(handle) = group.flush.take() {
                    handle.abort();
                }
                (key, group)
            })
            .collect()
    }

    /// Number of keys currently accumulating.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BatchKey, PendingGroup>> {
        self.groups.lock().unwrap_or_else(|e| e.into_inner())
    }
}
