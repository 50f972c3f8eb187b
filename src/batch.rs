//! Running many extraction requests in order.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::extractor::{Report, Unpack};

/// One archive to unpack and where to put it.
///
/// Several requests may share a destination; later ones overwrite files
/// written by earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    source: PathBuf,
    destination: PathBuf,
}

impl ExtractionRequest {
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// What the batch does after a request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed request. Later requests are not attempted.
    #[default]
    AbortOnFirst,
    /// Attempt every request and report all failures together.
    KeepGoing,
}

/// Outcome of a fully successful batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-request reports, in request order.
    pub archives: Vec<(ExtractionRequest, Report)>,
    /// Sum of all per-request counters.
    pub total: Report,
}

/// Run `requests` through `unpacker`, one after the other.
///
/// Each failure is wrapped in [`Error::Request`] naming its archive and
/// destination. With [`FailurePolicy::KeepGoing`] all failures are returned
/// as one [`Error::Batch`]; the batch never reports success if any failed.
pub fn run_all(
    unpacker: &dyn Unpack,
    requests: &[ExtractionRequest],
    policy: FailurePolicy,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut failures = Vec::new();

    for request in requests {
        match unpacker.extract(request) {
            Ok(r) => {
                report.total.absorb(&r);
                report.archives.push((request.clone(), r));
            }
            Err(e) => {
                let err = e.in_request(request.source.clone(), request.destination.clone());
                match policy {
                    FailurePolicy::AbortOnFirst => return Err(err),
                    FailurePolicy::KeepGoing => {
                        warn!("{}", err);
                        failures.push(err);
                    }
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(Error::Batch { failures })
    }
}
