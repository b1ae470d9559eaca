//! Name hashing
//!
//! Stateless building blocks for content-addressed filenames:
//! - `HashAlgorithm`: closed set of digest algorithms
//! - `HashLocation`: where in the filename the hash goes
//! - `compute_hash` / `splice_hash`: build a hashed filename
//! - `parse_hashed_name`: heuristic inverse, for cold starts
//!
//! # Example
//!
//! ```rust
//! use hashfs::hasher::{compute_hash, splice_hash, HashAlgorithm, HashLocation};
//!
//! let hash = compute_hash(b"body{margin:0}", HashAlgorithm::Sha256, 8);
//! assert_eq!(hash, "20077037");
//! assert_eq!(
//!     splice_hash("site.min.css", &hash, HashLocation::End),
//!     "site.min.css-20077037.css"
//! );
//! ```

mod algorithm;
mod location;
mod name;

pub use algorithm::HashAlgorithm;
pub use location::HashLocation;
pub use name::{
    compute_hash, extension, parse_hashed_name, splice_hash, split_name, ParsedName,
    HASH_SEPARATOR,
};
