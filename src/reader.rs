//! Sequential access to the entries of a jar.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// An open jar. Dropping it releases the file handle, on every exit path.
///
/// Entries are handed out one at a time, in central-directory order. The
/// walk is not restartable: open the archive again to iterate a second time.
pub struct JarArchive<R: Read + Seek = BufReader<File>> {
    path: PathBuf,
    archive: zip::ZipArchive<R>,
    next: usize,
}

/// One entry of a [`JarArchive`].
///
/// The entry borrows the archive, so its bytes can only be read until the
/// next entry is requested.
pub struct ArchiveEntry<'a> {
    name: String,
    is_dir: bool,
    unix_mode: Option<u32>,
    data: Box<dyn Read + 'a>,
}

impl JarArchive {
    /// Open the jar at `path`.
    ///
    /// Fails with [`Error::ArchiveOpen`] when the file is missing, unreadable
    /// or not a zip container.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::ArchiveOpen {
            archive: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_reader(path, BufReader::new(file))
    }
}

impl<R: Read + Seek> JarArchive<R> {
    /// Wrap an already opened reader. `path` is only used in error messages.
    pub fn from_reader<P: AsRef<Path>>(path: P, reader: R) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let archive = zip::ZipArchive::new(reader).map_err(|source| Error::ArchiveOpen {
            archive: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            archive,
            next: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of entries, ignored ones included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Advance to the next entry. Returns `None` once the archive is drained.
    pub fn next_entry(&mut self) -> Option<Result<ArchiveEntry<'_>>> {
        if self.next >= self.archive.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let file = match self.archive.by_index(index) {
            Ok(f) => f,
            Err(source) => {
                return Some(Err(Error::EntryRead {
                    archive: self.path.clone(),
                    index,
                    source,
                }))
            }
        };

        Some(Ok(ArchiveEntry {
            name: file.name().to_string(),
            is_dir: file.is_dir(),
            unix_mode: file.unix_mode(),
            data: Box::new(file),
        }))
    }
}

impl ArchiveEntry<'_> {
    /// Archive-internal, `/`-separated name. Directories end with `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Unix permission bits recorded by the archiver, if any.
    pub fn unix_mode(&self) -> Option<u32> {
        self.unix_mode
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}
