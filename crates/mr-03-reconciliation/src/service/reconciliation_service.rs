//! Reconciliation Service
//!
//! Implements `ReconciliationApi` over an injected `MessageStore`.

use std::sync::Arc;
use std::time::Instant;

use mr_01_bloom_filter::BloomFilter;
use mr_02_message_store::{BatchOutcome, MessageStore};
use tracing::{debug, info};

use crate::domain::{engine, ServerFilter, ServerFilterConfig};
use crate::error::ReconcileError;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::ports::ReconciliationApi;

/// Reconciliation Service implementation
///
/// Owns the server-held filter; the store is shared and injected.
pub struct ReconciliationService<S: MessageStore> {
    /// Message store (driven port)
    store: Arc<S>,
    /// Filter of every stored identifier, used by `filter_complement`
    server_filter: ServerFilter,
    metrics: Metrics,
}

impl<S: MessageStore> ReconciliationService<S> {
    /// Create a service over `store`
    ///
    /// Identifiers already in the store are recorded in the server filter.
    pub fn new(store: Arc<S>, config: &ServerFilterConfig) -> Result<Self, ReconcileError> {
        let server_filter = ServerFilter::new(config)?;

        {
            let existing = store.snapshot()?;
            let mut state = server_filter.lock();
            state.record(existing.iter());
            if state.needs_rebuild() {
                server_filter.rebuild(&mut state, &existing)?;
            }
        }

        Ok(Self {
            store,
            server_filter,
            metrics: Metrics::new(),
        })
    }

    /// Create a service with the default server filter sizing
    pub fn with_defaults(store: Arc<S>) -> Result<Self, ReconcileError> {
        Self::new(store, &ServerFilterConfig::default())
    }

    /// The injected store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: MessageStore> ReconciliationApi for ReconciliationService<S> {
    fn publish(&self, ids: &[String]) -> Result<BatchOutcome, ReconcileError> {
        // Held across the store mutation so store and filter move together
        let mut state = self.server_filter.lock();

        let outcome = self.store.add_batch(ids)?;
        state.record(&outcome.added);

        if state.needs_rebuild() {
            let members = self.store.snapshot()?;
            self.server_filter.rebuild(&mut state, &members)?;
            self.metrics.record_rebuild();
        }
        let members = state.members();
        drop(state);

        self.metrics
            .record_publish(outcome.added_count(), outcome.duplicates);
        info!(
            added = outcome.added_count(),
            duplicates = outcome.duplicates,
            total = members,
            "[mr-03] Publish applied"
        );

        Ok(outcome)
    }

    fn filter_out(&self, filter: &BloomFilter) -> Result<Vec<String>, ReconcileError> {
        let snapshot = self.store.snapshot()?;

        let start = Instant::now();
        let matched = engine::filter_out(&snapshot, filter);
        let elapsed = start.elapsed();

        self.metrics.record_filter_out(elapsed, matched.len());
        debug!(
            scanned = snapshot.len(),
            matched = matched.len(),
            size_bits = filter.size_bits(),
            k = filter.hash_count(),
            elapsed_us = elapsed.as_micros() as u64,
            "[mr-03] FilterOut complete"
        );

        Ok(matched)
    }

    fn filter_complement(&self, candidates: &[String]) -> Result<Vec<String>, ReconcileError> {
        let start = Instant::now();
        let novel = self.server_filter.complement(candidates);
        let elapsed = start.elapsed();

        self.metrics.record_filter_complement(elapsed, novel.len());
        debug!(
            candidates = candidates.len(),
            novel = novel.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "[mr-03] FilterComplement complete"
        );

        Ok(novel)
    }

    fn server_filter(&self) -> BloomFilter {
        self.server_filter.current()
    }

    fn message_count(&self) -> Result<usize, ReconcileError> {
        Ok(self.store.len()?)
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
