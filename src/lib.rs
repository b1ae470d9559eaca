//! Hashfs: content-hashed filenames for static assets
//!
//! Wrap an [`AssetSource`](source::AssetSource) in a [`HashFs`](fs::HashFs),
//! call `translate` while rendering pages to get hashed paths, and mount an
//! [`AssetService`](server::AssetService) to serve them with
//! `Cache-Control: immutable`.

pub mod config;
pub mod error;
pub mod fs;
pub mod hasher;
pub mod logging;
pub mod server;
pub mod source;
pub mod urls;

pub use config::HashFsConfig;
pub use error::{HashFsError, SourceError};
pub use fs::HashFs;
