use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The closed set of failure categories an extraction can end in.
///
/// Wrapping variants ([`Error::Request`], [`Error::Batch`]) report the kind of
/// the failure they carry, so callers can branch on this without unwrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source archive missing, unreadable, or not a zip/jar.
    ArchiveOpen,
    /// A parent or target directory could not be created.
    DirectoryCreate,
    /// Entry bytes could not be streamed onto disk.
    Copy,
    /// Externally supplied configuration is unusable.
    Configuration,
}

/// Errors that can occur while unpacking native archives.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in minor versions without breaking existing code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The archive could not be opened or its central directory is malformed.
    #[error("cannot open archive '{}': {source}", .archive.display())]
    ArchiveOpen {
        archive: PathBuf,
        #[source]
        source: ZipError,
    },

    /// An entry header could not be read after the archive was opened.
    #[error("cannot read entry #{index} of '{}': {source}", .archive.display())]
    EntryRead {
        archive: PathBuf,
        index: usize,
        #[source]
        source: ZipError,
    },

    /// A directory could not be created (permissions, or a file is in the way).
    #[error("cannot create directory '{}': {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying entry bytes to the destination file failed.
    #[error("cannot write '{}': {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The natives target directory cannot be created at all.
    #[error("invalid natives target directory '{}': {source}", .path.display())]
    Configuration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single extraction request failed; names the pair that failed.
    #[error(
        "failed to unpack '{}' into '{}': {source}",
        .archive.display(),
        .destination.display()
    )]
    Request {
        archive: PathBuf,
        destination: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Several requests failed while the batch kept going.
    #[error("{} of the requested archives failed to unpack; first: {}", .failures.len(), first_message(.failures))]
    Batch { failures: Vec<Error> },
}

fn first_message(failures: &[Error]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

impl Error {
    /// The failure category, looking through request and batch wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArchiveOpen { .. } => ErrorKind::ArchiveOpen,
            Self::EntryRead { .. } | Self::Copy { .. } => ErrorKind::Copy,
            Self::DirectoryCreate { .. } => ErrorKind::DirectoryCreate,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Request { source, .. } => source.kind(),
            Self::Batch { failures } => failures
                .first()
                .map(Error::kind)
                .unwrap_or(ErrorKind::Configuration),
        }
    }

    pub(crate) fn in_request(self, archive: PathBuf, destination: PathBuf) -> Self {
        Self::Request {
            archive,
            destination,
            source: Box::new(self),
        }
    }
}
