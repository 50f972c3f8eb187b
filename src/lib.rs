//! Unpack native libraries shipped inside classifier-tagged jars.
//!
//! ```no_run
//! use natives_unpack::{copy_natives, Artifact, JarExtractor, NativesConfig};
//!
//! let config = NativesConfig::new("target/natives").separate_dirs(true);
//! let artifacts = [Artifact::from_path("libs/lwjgl-3.3.1-natives-linux.jar")];
//! copy_natives(&config, &artifacts, &JarExtractor::new(), &|_: &std::path::Path| {})?;
//! # Ok::<(), natives_unpack::Error>(())
//! ```

mod batch;
mod error;
mod extractor;
pub mod filter;
mod natives;
mod reader;
pub mod resolve;

pub use batch::{run_all, BatchReport, ExtractionRequest, FailurePolicy};
pub use error::{Error, ErrorKind, Result};
pub use extractor::{extract_entries, JarExtractor, Report, Unpack};
pub use natives::{
    classifier_from_file_name, copy_natives, plan, Artifact, BuildContext, NativesConfig,
    DEFAULT_TARGET_DIR, NATIVES_PREFIX,
};
pub use reader::{ArchiveEntry, JarArchive};

/// Convenience function to unpack one jar into `destination`.
pub fn extract_file<P: AsRef<std::path::Path>, D: AsRef<std::path::Path>>(
    archive: P,
    destination: D,
) -> Result<Report> {
    JarExtractor::new().extract(&ExtractionRequest::new(
        archive.as_ref(),
        destination.as_ref(),
    ))
}
