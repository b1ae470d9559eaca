//! Request path normalization
//!
//! Turns the path of an inbound URL into a source path:
//! 1. Strip the mount prefix (`/static/css/a.css` → `css/a.css`)
//! 2. Percent-decode
//! 3. Clean `.` and `..` segments lexically, never climbing above the root
//! 4. Map an empty result to the root marker `.`

use crate::source::ROOT_PATH;

/// Normalize `uri_path` for lookup in the source.
///
/// Returns `None` when the path is not under `mount_prefix` or cannot be
/// decoded. `mount_prefix` is expected to start and end with `/`.
pub fn normalize_request_path(uri_path: &str, mount_prefix: &str) -> Option<String> {
    let rest = strip_mount_prefix(uri_path, mount_prefix)?;
    let decoded = urlencoding::decode(rest).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(clean(&decoded))
}

fn strip_mount_prefix<'a>(uri_path: &'a str, mount_prefix: &str) -> Option<&'a str> {
    if let Some(rest) = uri_path.strip_prefix(mount_prefix) {
        return Some(rest);
    }
    // `/static` with prefix `/static/` is the mount root
    if uri_path == mount_prefix.trim_end_matches('/') {
        return Some("");
    }
    None
}

/// Lexically clean a slash-separated path into source form
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for elem in path.split('/') {
        match elem {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(elem),
        }
    }
    if parts.is_empty() {
        ROOT_PATH.to_string()
    } else {
        parts.join("/")
    }
}
