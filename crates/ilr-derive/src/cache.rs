//! Per-batch memoization of derived aggregations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::trace;

use crate::derived::{DatedAim, DerivedId};

type RecordEntries = HashMap<(DerivedId, String), Option<DatedAim>>;

/// Memoized aggregation results, partitioned by record ordinal.
///
/// Workers touch only the partition of the record they are evaluating, and a
/// partition is dropped with [`DerivedCache::evict_record`] once the record
/// completes.
#[derive(Debug, Default)]
pub struct DerivedCache {
    records: DashMap<usize, RecordEntries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `(record, id, input)`, computing it on a miss.
    pub fn get_or_compute(
        &self,
        record: usize,
        id: DerivedId,
        input: &str,
        compute: impl FnOnce() -> Option<DatedAim>,
    ) -> Option<DatedAim> {
        if let Some(entries) = self.records.get(&record)
            && let Some(value) = entries.get(&(id, input.to_string()))
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *value;
        }

        // Computed outside the shard lock; a racing writer stores the same value.
        let value = compute();
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.records
            .entry(record)
            .or_default()
            .insert((id, input.to_string()), value);
        value
    }

    pub fn evict_record(&self, record: usize) {
        if let Some((_, entries)) = self.records.remove(&record) {
            trace!(record, entries = entries.len(), "evicted derived cache entries");
        }
    }

    /// Number of records with live entries.
    pub fn live_records(&self) -> usize {
        self.records.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
