//! Request path resolution
//!
//! Turns a request target into a filesystem path under the serving root.

use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

/// Document served for a bare `/`
pub const DEFAULT_DOCUMENT: &str = "/index.html";

/// Rewrite exactly `/` to the default document; every other path is left alone
pub fn rewrite_default_document(path: &str) -> &str {
    if path == "/" {
        DEFAULT_DOCUMENT
    } else {
        path
    }
}

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub fs_path: PathBuf,
    /// The request path ended with `/`, so it may only name a directory
    pub trailing_slash: bool,
}

/// Translate a request target into a path under `root`.
///
/// Query string and fragment are dropped, the path is percent-decoded and then
/// normalized: empty and `.` segments are skipped and `..` removes the previous
/// segment, never climbing above `root`.
pub fn translate(root: &Path, target: &str) -> ResolvedPath {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let trailing_slash = path.trim_end().ends_with('/');
    let decoded = percent_decode(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_segment(s) => segments.push(s),
            _ => {}
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    ResolvedPath {
        fs_path,
        trailing_slash,
    }
}

/// A segment that joins as exactly one normal path component
/// (rejects drive prefixes and backslash separators on Windows)
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Encode everything but unreserved characters and `/`
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'/') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
