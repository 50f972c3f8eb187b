//! Reserved entry names that are never written to disk.

/// Jar metadata names skipped during extraction.
///
/// Matching is against the last path segment only, so `lib/MANIFEST.MF`
/// is skipped just like the top-level `META-INF/MANIFEST.MF`.
pub const IGNORED_NAMES: [&str; 2] = ["META-INF", "MANIFEST.MF"];

/// Returns `true` if the entry's final segment is a reserved metadata name.
///
/// Directory entries carry a trailing `/`, which is not part of the segment.
pub fn is_ignored(entry_name: &str) -> bool {
    let base = basename(entry_name);
    IGNORED_NAMES.contains(&base)
}

fn basename(entry_name: &str) -> &str {
    let trimmed = entry_name.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
