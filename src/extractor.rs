use std::fs;
use std::io::{self, Read, Seek};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, trace};

use crate::batch::ExtractionRequest;
use crate::error::{Error, Result};
use crate::filter;
use crate::reader::{ArchiveEntry, JarArchive};
use crate::resolve;

/// Mode given to extracted files whose archive entry carries none.
#[cfg(unix)]
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Counters for one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub files_extracted: usize,
    pub dirs_created: usize,
    pub bytes_written: u64,
    /// Reserved metadata entries that were not written.
    pub entries_skipped: usize,
}

impl Report {
    /// Add another report's counters to this one.
    pub fn absorb(&mut self, other: &Report) {
        self.files_extracted += other.files_extracted;
        self.dirs_created += other.dirs_created;
        self.bytes_written += other.bytes_written;
        self.entries_skipped += other.entries_skipped;
    }
}

/// Something that can unpack one archive into one destination.
///
/// The batch driver and [`copy_natives`](crate::copy_natives) only see this
/// trait, so tests and hosts can substitute their own implementation.
pub trait Unpack {
    fn extract(&self, request: &ExtractionRequest) -> Result<Report>;
}

/// The stock [`Unpack`] implementation: streams every jar entry onto disk.
///
/// Reserved metadata names (see [`filter::IGNORED_NAMES`]) are skipped,
/// directories are recreated, and files are staged in a temporary file next
/// to their target and renamed into place once fully written. Extraction
/// stops at the first error; entries after it are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarExtractor;

impl JarExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Unpack for JarExtractor {
    fn extract(&self, request: &ExtractionRequest) -> Result<Report> {
        let mut archive = JarArchive::open(request.source())?;
        info!(
            "copying natives from {}",
            request
                .source()
                .file_name()
                .unwrap_or(request.source().as_os_str())
                .to_string_lossy()
        );
        resolve::ensure_dir(request.destination())?;
        extract_entries(&mut archive, request.destination())
    }
}

/// Drain `archive` into `destination`, which must already exist.
pub fn extract_entries<R: Read + Seek>(
    archive: &mut JarArchive<R>,
    destination: &Path,
) -> Result<Report> {
    let mut report = Report::default();

    while let Some(entry) = archive.next_entry() {
        let mut entry = entry?;

        if filter::is_ignored(entry.name()) {
            trace!(entry = entry.name(), "skipping reserved entry");
            report.entries_skipped += 1;
            continue;
        }
        debug!("copying native - {}", entry.name());

        let target = resolve::resolve(destination, entry.name());
        resolve::ensure_parent_dirs(&target)?;

        if entry.is_dir() {
            if !target.is_dir() {
                fs::create_dir(&target).map_err(|source| Error::DirectoryCreate {
                    path: target.clone(),
                    source,
                })?;
                report.dirs_created += 1;
            }
            continue;
        }

        report.bytes_written += write_file(&mut entry, &target)?;
        report.files_extracted += 1;
    }

    Ok(report)
}

/// Copy the entry into a sibling temp file, then rename it over `target`.
///
/// On failure the temp file is removed when dropped and `target` keeps
/// whatever it held before.
fn write_file(entry: &mut ArchiveEntry<'_>, target: &Path) -> Result<u64> {
    let copy_err = |source: io::Error| Error::Copy {
        path: target.to_path_buf(),
        source,
    };

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(copy_err)?;
    let written = io::copy(entry, &mut staged).map_err(copy_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Strip setuid, setgid and sticky bits
        let mode = entry.unix_mode().map_or(DEFAULT_FILE_MODE, |m| m & 0o777);
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(copy_err)?;
    }

    staged.persist(target).map_err(|e| copy_err(e.error))?;
    Ok(written)
}
