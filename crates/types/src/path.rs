//! Helpers for the slash-separated absolute paths used to address data and schema nodes.
//!
//! Paths look like `/interfaces/interface/eth0/mtu`. The empty string addresses the
//! root of a tree.

/// Returns the path with its last segment removed, or `None` when the path has no `/`.
///
/// `"/a/b"` becomes `"/a"`, and `"/a"` becomes the root path `""`.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

/// Returns the text after the last `/`, or `None` when the path has no `/`.
pub fn last_segment(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[idx + 1..])
}

/// Appends a segment to a base path.
pub fn join(base: &str, segment: &str) -> String {
    let mut joined = String::with_capacity(base.len() + segment.len() + 1);
    joined.push_str(base);
    joined.push('/');
    joined.push_str(segment);
    joined
}

/// Iterates the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strips a `prefix:` qualifier, returning everything after the first `:`.
pub fn strip_qualifier(value: &str) -> &str {
    value.split_once(':').map_or(value, |(_, local)| local)
}
