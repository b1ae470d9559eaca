//! Hashed file system
//!
//! [`HashFs`] wraps an [`AssetSource`] and maps original paths to paths whose
//! filename carries a hash of the file's contents, and back.
//!
//! - `translate` is read-through: the first call for a path reads and hashes
//!   the file, later calls are served from the forward table. A file that
//!   cannot be read is returned unchanged and nothing is cached.
//! - `resolve` takes a path from a request. A hit in the reverse table opens
//!   the original file and reports its hash; a miss opens the requested path
//!   literally and reports no hash.
//!
//! Entries live for the lifetime of the `HashFs`. The source is assumed not
//! to change underneath it.
//!
//! # Example
//!
//! ```rust
//! use hashfs::config::HashFsConfig;
//! use hashfs::fs::HashFs;
//! use hashfs::source::MemorySource;
//!
//! # tokio_test::block_on(async {
//! let source = MemorySource::new().with_file("css/site.css", "body{margin:0}");
//! let hfs = HashFs::new(source, HashFsConfig { hash_length: 8, ..Default::default() });
//!
//! let hashed = hfs.translate("css/site.css").await;
//! assert_eq!(hashed, "css/site.css-20077037.css");
//!
//! let resolved = hfs.resolve(&hashed).await.unwrap();
//! assert_eq!(resolved.hash.as_deref(), Some("20077037"));
//! # });
//! ```

mod lookup;
mod stats;

pub use lookup::{LookupTables, ReverseEntry};
pub use stats::HashFsStats;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::HashFsConfig;
use crate::error::HashFsError;
use crate::hasher::{compute_hash, parse_hashed_name, splice_hash, split_name};
use crate::source::{AssetFile, AssetSource};
use stats::StatsCounters;

/// Result of [`HashFs::resolve`]
#[derive(Debug)]
pub struct Resolved {
    /// The opened file or directory
    pub file: AssetFile,
    /// Path that was actually opened in the source
    pub path: String,
    /// Content hash when the request named a hashed path
    pub hash: Option<String>,
}

/// Outcome of [`HashFs::warm`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    /// (original path, hashed path) pairs now cached
    pub hashed: Vec<(String, String)>,
    /// Paths that could not be read
    pub failed: Vec<String>,
}

/// An [`AssetSource`] with content-hash lookup tables
pub struct HashFs<S> {
    source: S,
    config: HashFsConfig,
    lookup: LookupTables,
    stats: StatsCounters,
}

impl<S: AssetSource> HashFs<S> {
    /// Wrap `source`. The configuration is normalized here: a non-positive
    /// `max_age_seconds` becomes the one year default.
    pub fn new(source: S, config: HashFsConfig) -> Self {
        Self {
            source,
            config: config.normalize(),
            lookup: LookupTables::new(),
            stats: StatsCounters::default(),
        }
    }

    pub fn config(&self) -> &HashFsConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Hashed path for `original_path` if it has already been computed.
    ///
    /// Never touches the source, so it can be called from synchronous code
    /// such as template helpers once the paths have been warmed.
    pub fn hash_path_if_cached(&self, original_path: &str) -> Option<String> {
        self.lookup.hashed_path(original_path)
    }

    /// Original path and hash behind a hashed path, if known
    pub fn reverse_lookup(&self, hashed_path: &str) -> Option<ReverseEntry> {
        self.lookup.reverse(hashed_path)
    }

    /// Like [`translate`](Self::translate) but reports why a path could not
    /// be hashed.
    pub async fn try_translate(&self, original_path: &str) -> Result<String, HashFsError> {
        if let Some(hashed) = self.lookup.hashed_path(original_path) {
            StatsCounters::incr(&self.stats.translate_hits);
            return Ok(hashed);
        }

        // Read and hash outside the lock. Two concurrent first calls for the
        // same path both do the work and insert identical entries.
        let content = match self.source.read(original_path).await {
            Ok(content) => content,
            Err(e) => {
                StatsCounters::incr(&self.stats.read_failures);
                return Err(e.into());
            }
        };
        StatsCounters::incr(&self.stats.translate_misses);

        let hash = compute_hash(&content, self.config.algorithm, self.config.hash_length);
        let (dir, filename) = split_name(original_path);
        let hashed_name = splice_hash(filename, &hash, self.config.location);
        if hashed_name.is_empty() {
            return Ok(original_path.to_string());
        }
        let hashed_path = format!("{}{}", dir, hashed_name);

        self.lookup.insert(original_path, &hashed_path, &hash);
        Ok(hashed_path)
    }

    /// Hashed path for `original_path`, computing and caching it on first use.
    ///
    /// If the file cannot be read the path is returned unchanged so it can
    /// still be served, just without long-lived caching.
    pub async fn translate(&self, original_path: &str) -> String {
        self.try_translate(original_path)
            .await
            .unwrap_or_else(|_| original_path.to_string())
    }

    /// Open the content a request path refers to.
    ///
    /// Errors from the source are passed through; use
    /// [`HashFsError::is_not_found`] to tell a missing file from a failing
    /// backend.
    pub async fn resolve(&self, requested_path: &str) -> Result<Resolved, HashFsError> {
        let known = match self.lookup.reverse(requested_path) {
            Some(entry) => Some(entry),
            None if self.config.verify_unknown_hashed_paths => {
                self.recover(requested_path).await
            }
            None => None,
        };

        match known {
            Some(entry) => {
                StatsCounters::incr(&self.stats.resolved_hashed);
                let file = self.source.open(&entry.original_path).await?;
                Ok(Resolved {
                    file,
                    path: entry.original_path,
                    hash: Some(entry.hash),
                })
            }
            None => {
                StatsCounters::incr(&self.stats.resolved_literal);
                let file = self.source.open(requested_path).await?;
                Ok(Resolved {
                    file,
                    path: requested_path.to_string(),
                    hash: None,
                })
            }
        }
    }

    /// Rebuild the lookup entry for a hashed path that is not in the tables,
    /// e.g. a link rendered by a previous process.
    ///
    /// The hash parsed from the name is only trusted if it matches the hash
    /// of the candidate original's current content and re-splicing yields
    /// exactly `requested_path`.
    async fn recover(&self, requested_path: &str) -> Option<ReverseEntry> {
        let (dir, filename) = split_name(requested_path);
        let parsed = parse_hashed_name(
            filename,
            self.config.location,
            self.config.effective_hash_len(),
        )?;
        let original_path = format!("{}{}", dir, parsed.original);

        let content = self.source.read(&original_path).await.ok()?;
        let hash = compute_hash(&content, self.config.algorithm, self.config.hash_length);
        if hash != parsed.hash {
            return None;
        }
        let rebuilt = format!(
            "{}{}",
            dir,
            splice_hash(&parsed.original, &hash, self.config.location)
        );
        if rebuilt != requested_path {
            return None;
        }

        self.lookup.insert(&original_path, requested_path, &hash);
        StatsCounters::incr(&self.stats.recovered);
        Some(ReverseEntry {
            original_path,
            hash,
        })
    }

    /// Hash each of `paths` ahead of time.
    pub async fn warm<I, P>(&self, paths: I) -> WarmReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut report = WarmReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.try_translate(path).await {
                Ok(hashed) => report.hashed.push((path.to_string(), hashed)),
                Err(_) => report.failed.push(path.to_string()),
            }
        }
        report
    }

    /// Value of the `Cache-Control` header sent with hashed responses
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, immutable",
            self.config.max_age().as_secs()
        )
    }

    /// Sorted original path -> hashed path map of everything hashed so far
    pub fn manifest(&self) -> BTreeMap<String, String> {
        self.lookup.snapshot()
    }

    /// Number of original paths with a cached hash
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn stats(&self) -> HashFsStats {
        self.stats.snapshot(self.lookup.len())
    }
}
