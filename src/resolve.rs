//! Mapping archive entry names onto the destination tree.
//!
//! Jars from the dependency graph are trusted input: `..` segments are kept
//! as-is rather than rejected.
// TODO: optional containment check for entries that climb out of the root with `..`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Join an archive-relative, `/`-separated entry name onto `root` using
/// platform separators. Empty segments (trailing `/` of directories) are dropped.
pub fn resolve(root: &Path, entry_name: &str) -> PathBuf {
    let mut target = root.to_path_buf();
    for segment in entry_name.split('/').filter(|s| !s.is_empty()) {
        target.push(segment);
    }
    target
}

/// Create every missing directory above `path`. Existing parents are fine.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Create `dir` and its ancestors, mapping failure to [`Error::DirectoryCreate`].
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}
