//! Lookup statistics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of hashing and resolution counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashFsStats {
    /// `translate` calls answered from the forward table
    pub translate_hits: u64,
    /// `translate` calls that read and hashed a file
    pub translate_misses: u64,
    /// `translate` calls that could not read the file
    pub read_failures: u64,
    /// `resolve` calls answered from the reverse table
    pub resolved_hashed: u64,
    /// `resolve` calls that fell back to the literal path
    pub resolved_literal: u64,
    /// Hashed names accepted after recomputing their hash
    pub recovered: u64,
    /// Original paths currently cached
    pub entries: u64,
}

impl HashFsStats {
    /// Fraction of `translate` calls served from cache, 0.0 when idle
    pub fn hit_rate(&self) -> f64 {
        let total = self.translate_hits + self.translate_misses + self.read_failures;
        if total == 0 {
            0.0
        } else {
            self.translate_hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub(crate) struct StatsCounters {
    pub translate_hits: AtomicU64,
    pub translate_misses: AtomicU64,
    pub read_failures: AtomicU64,
    pub resolved_hashed: AtomicU64,
    pub resolved_literal: AtomicU64,
    pub recovered: AtomicU64,
}

impl StatsCounters {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, entries: usize) -> HashFsStats {
        HashFsStats {
            translate_hits: self.translate_hits.load(Ordering::Relaxed),
            translate_misses: self.translate_misses.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            resolved_hashed: self.resolved_hashed.load(Ordering::Relaxed),
            resolved_literal: self.resolved_literal.load(Ordering::Relaxed),
            recovered: self.recovered.load(Ordering::Relaxed),
            entries: entries as u64,
        }
    }
}
