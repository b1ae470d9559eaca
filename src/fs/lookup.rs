//! Forward and reverse lookup tables

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// What a hashed path refers to: the original path to open and the hash
/// to send as the ETag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseEntry {
    pub original_path: String,
    pub hash: String,
}

#[derive(Default)]
struct Tables {
    /// original path -> hashed path
    forward: HashMap<String, String>,
    /// hashed path -> original path + hash
    reverse: HashMap<String, ReverseEntry>,
}

/// Thread-safe pair of lookup tables behind a single lock.
///
/// Both tables are updated in the same write critical section, so a reader
/// never sees a forward entry without its reverse entry. Entries are never
/// removed.
#[derive(Default)]
pub struct LookupTables {
    tables: RwLock<Tables>,
}

impl LookupTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hashed_path(&self, original_path: &str) -> Option<String> {
        self.tables.read().forward.get(original_path).cloned()
    }

    pub fn reverse(&self, hashed_path: &str) -> Option<ReverseEntry> {
        self.tables.read().reverse.get(hashed_path).cloned()
    }

    /// Record both directions of a mapping.
    ///
    /// Re-inserting an identical mapping (two callers racing on the same
    /// uncached path) overwrites with the same values.
    pub fn insert(&self, original_path: &str, hashed_path: &str, hash: &str) {
        let mut tables = self.tables.write();
        tables
            .forward
            .insert(original_path.to_string(), hashed_path.to_string());
        tables.reverse.insert(
            hashed_path.to_string(),
            ReverseEntry {
                original_path: original_path.to_string(),
                hash: hash.to_string(),
            },
        );
    }

    /// Number of original paths with a computed hash
    pub fn len(&self) -> usize {
        self.tables.read().forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted snapshot of the forward table
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.tables
            .read()
            .forward
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
