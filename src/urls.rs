//! Template-facing URL rewriting
//!
//! Templates reference assets by their public URL (`/static/css/site.css`),
//! while the source knows them by their source path (`css/site.css`).
//! [`AssetUrls`] strips the mount prefix, translates, and puts the prefix
//! back, so a template helper only has to call [`AssetUrls::url`].

use std::sync::Arc;

use crate::fs::HashFs;
use crate::source::AssetSource;

/// Rewrites public asset URLs to their hashed form
pub struct AssetUrls<S> {
    hfs: Arc<HashFs<S>>,
    prefix: String,
}

impl<S> Clone for AssetUrls<S> {
    fn clone(&self) -> Self {
        Self {
            hfs: Arc::clone(&self.hfs),
            prefix: self.prefix.clone(),
        }
    }
}

impl<S: AssetSource> AssetUrls<S> {
    /// `prefix` is the URL path the assets are served under, e.g. `/static/`
    pub fn new(hfs: Arc<HashFs<S>>, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        Self { hfs, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Hashed URL for `original_url`, hashing the file on first use.
    ///
    /// An unreadable file yields its unhashed URL.
    pub async fn url(&self, original_url: &str) -> String {
        let source_path = self.source_path(original_url);
        let hashed = self.hfs.translate(source_path).await;
        format!("{}{}", self.prefix, hashed)
    }

    /// Hashed URL for `original_url` if already computed, otherwise the
    /// unhashed URL. For template engines whose helpers cannot await;
    /// pair it with [`HashFs::warm`] at startup.
    pub fn cached_url(&self, original_url: &str) -> String {
        let source_path = self.source_path(original_url);
        match self.hfs.hash_path_if_cached(source_path) {
            Some(hashed) => format!("{}{}", self.prefix, hashed),
            None => format!("{}{}", self.prefix, source_path),
        }
    }

    fn source_path<'a>(&self, original_url: &'a str) -> &'a str {
        original_url
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(original_url)
            .trim_start_matches('/')
    }
}
