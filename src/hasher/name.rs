//! Filename manipulation: splitting paths, computing content hashes and
//! splicing them into (or parsing them out of) filenames.
//!
//! Everything here is pure. Caching and I/O live in [`crate::fs`].

use super::{HashAlgorithm, HashLocation};

/// Separator placed between the hash and the rest of the filename
pub const HASH_SEPARATOR: char = '-';

/// Result of [`parse_hashed_name`]: the probable original filename and the
/// hash that was embedded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub original: String,
    pub hash: String,
}

/// Split a slash-separated path immediately after its final slash.
///
/// `css/site/main.css` → (`css/site/`, `main.css`); `main.css` → (``, `main.css`).
pub fn split_name(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..=i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Extension of the final path element, including the leading period.
///
/// Returns an empty string when the filename has no period.
pub fn extension(path: &str) -> &str {
    let (_, name) = split_name(path);
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}

/// Compute the lowercase hex digest of `content`.
///
/// A `truncate_len` of 0, or one at least as long as the encoded digest,
/// keeps the full digest.
pub fn compute_hash(content: &[u8], algorithm: HashAlgorithm, truncate_len: usize) -> String {
    let mut hash = hex::encode(algorithm.digest(content));
    if truncate_len > 0 && truncate_len < hash.len() {
        hash.truncate(truncate_len);
    }
    hash
}

/// Splice `hash` into a bare filename according to `location`.
///
/// Returns an empty string if either `filename` or `hash` is empty.
pub fn splice_hash(filename: &str, hash: &str, location: HashLocation) -> String {
    if filename.is_empty() || hash.is_empty() {
        return String::new();
    }

    match location {
        HashLocation::Start => format!("{}{}{}", hash, HASH_SEPARATOR, filename),
        HashLocation::FirstPeriod => match filename.find('.') {
            Some(i) => format!(
                "{}{}{}{}",
                &filename[..i],
                HASH_SEPARATOR,
                hash,
                &filename[i..]
            ),
            None => format!("{}{}{}", filename, HASH_SEPARATOR, hash),
        },
        HashLocation::End => format!(
            "{}{}{}{}",
            filename,
            HASH_SEPARATOR,
            hash,
            extension(filename)
        ),
    }
}

/// Best-effort inverse of [`splice_hash`].
///
/// Looks for a `-<hash_len lowercase hex chars>` token where `location` would
/// have put it and strips it. This is a heuristic: a real filename that
/// happens to contain such a token is misread. Callers that hold a reverse
/// lookup table should consult it first.
pub fn parse_hashed_name(
    filename: &str,
    location: HashLocation,
    hash_len: usize,
) -> Option<ParsedName> {
    if hash_len == 0 || filename.len() <= hash_len.saturating_add(1) {
        return None;
    }

    match location {
        HashLocation::Start => {
            let hash = filename.get(..hash_len)?;
            let rest = filename.get(hash_len..)?.strip_prefix(HASH_SEPARATOR)?;
            if !is_lower_hex(hash) || rest.is_empty() {
                return None;
            }
            Some(ParsedName {
                original: rest.to_string(),
                hash: hash.to_string(),
            })
        }
        HashLocation::FirstPeriod => {
            let period = filename.find('.').unwrap_or(filename.len());
            let (head, tail) = filename.split_at(period);
            let (stem, hash) = strip_hash_suffix(head, hash_len)?;
            let original = format!("{}{}", stem, tail);
            if original.is_empty() {
                return None;
            }
            Some(ParsedName {
                original,
                hash: hash.to_string(),
            })
        }
        HashLocation::End => {
            let ext = extension(filename);
            let body = &filename[..filename.len() - ext.len()];
            let (original, hash) = strip_hash_suffix(body, hash_len)?;
            if original.is_empty() || !original.ends_with(ext) {
                return None;
            }
            Some(ParsedName {
                original: original.to_string(),
                hash: hash.to_string(),
            })
        }
    }
}

/// Split `s` into (`stem`, `hash`) when it ends with `-<hash>`.
fn strip_hash_suffix(s: &str, hash_len: usize) -> Option<(&str, &str)> {
    let split = s.len().checked_sub(hash_len)?;
    let hash = s.get(split..)?;
    let stem = s.get(..split)?.strip_suffix(HASH_SEPARATOR)?;
    if !is_lower_hex(hash) {
        return None;
    }
    Some((stem, hash))
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
