// ABOUTME: Debounce coordinator - groups messages by batch key and re-arms one flush per key.
// ABOUTME: submit never blocks on downstream work; shutdown drains pending groups exactly once.

use crate::message::{BatchKey, InboundMessage};
use crate::metrics;
use crate::store::DebounceStore;
use crate::traits::BatchSink;
use std::sync::Arc;
use std::time::Duration;

/// Coordinates debounced batching: each submitted message joins (or starts)
/// the pending group for its batch key and resets that key's flush timer.
///
/// The sole mutator of the [`DebounceStore`]. All state is in-process and
/// volatile; [`Debouncer::shutdown`] is the only exit path that still
/// flushes what is pending.
pub struct Debouncer {
    store: Arc<DebounceStore>,
    sink: Arc<dyn BatchSink>,
}

impl Debouncer {
    pub fn new(sink: Arc<dyn BatchSink>) -> Self {
        Self {
            store: Arc::new(DebounceStore::new()),
            sink,
        }
    }

    /// Accept one message into its pending group and (re)arm the group's
    /// flush to fire after the message's requested debounce window.
    ///
    /// Returns immediately; the flush runs as an independent task. The delay
    /// is taken from the triggering message, so each new arrival resets the
    /// silence timer with its own interval. Must be called from within a
    /// tokio runtime.
    pub fn submit(&self, message: InboundMessage) {
        let key = message.batch_key();
        let delay = message.debounce();
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        let group_key = key.clone();

        // Append, cancel, and re-arm under one store lock so a concurrent
        // submit or firing timer for the same key cannot interleave.
        self.store.upsert(&group_key, move |group| {
            if let Some(prev) = group.flush.take() {
                prev.abort();
            }
            group.messages.push(message);
            group.generation += 1;

            tracing::debug!(
                key = %key,
                pending = group.messages.len(),
                delay_ms = delay.as_millis() as u64,
                "Debounce flush armed"
            );

            let task = tokio::spawn(run_flush(delay, key, group.generation, store, sink));
            group.flush = Some(task.abort_handle());
        });

        metrics::set_pending_groups(self.store.len() as u64);
    }

    /// Number of keys currently accumulating messages.
    pub fn pending_groups(&self) -> usize {
        self.store.len()
    }

    /// Drain every pending group and dispatch it immediately, aborting the
    /// armed timers. Called once at process teardown so queued messages are
    /// flushed rather than silently lost.
    pub async fn shutdown(&self) {
        let pending = self.store.drain_all();
        metrics::set_pending_groups(0);
        if pending.is_empty() {
            return;
        }

        tracing::info!(groups = pending.len(), "Draining pending batches on shutdown");
        for (key, group) in pending {
            if group.messages.is_empty() {
                continue;
            }
            metrics::record_batch_flushed(group.messages.len());
            self.sink.flush(key, group.messages).await;
        }
    }
}

/// The armed flush for one (key, generation). Sleeps out the debounce
/// window, then drains the group only if no newer arrival re-armed it in
/// the meantime. The conditional take, not cancellation, is what makes
/// duplicate or early dispatch impossible.
async fn run_flush(
    delay: Duration,
    key: BatchKey,
    generation: u64,
    store: Arc<DebounceStore>,
    sink: Arc<dyn BatchSink>,
) {
    tokio::time::sleep(delay).await;

    let Some(messages) = store.take_if_generation(&key, generation) else {
        tracing::trace!(key = %key, "Flush superseded by a newer arrival");
        return;
    };

    metrics::set_pending_groups(store.len() as u64);
    metrics::record_batch_flushed(messages.len());
    tracing::info!(key = %key, count = messages.len(), "Flushing message batch");

    // Downstream calls run outside any store lock; other keys (and this
    // one, post-removal) are never blocked by an in-flight dispatch.
    sink.flush(key, messages).await;
}
