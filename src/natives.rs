//! Selecting native artifacts and routing them to their output directories.
//!
//! This is the layer a build tool talks to: it receives resolved artifacts
//! (path plus optional classifier), decides which of them are native
//! archives for an allowed platform, turns those into
//! [`ExtractionRequest`]s, runs them, and notifies the host once the
//! natives directory has changed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::batch::{run_all, BatchReport, ExtractionRequest, FailurePolicy};
use crate::error::{Error, Result};
use crate::extractor::Unpack;

/// Classifier prefix marking an artifact as a native archive.
pub const NATIVES_PREFIX: &str = "natives-";

/// Default location of the natives directory, relative to the project.
pub const DEFAULT_TARGET_DIR: &str = "target/natives";

/// A resolved dependency archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    classifier: Option<String>,
}

impl Artifact {
    pub fn new<P: Into<PathBuf>>(path: P, classifier: Option<String>) -> Self {
        Self {
            path: path.into(),
            classifier,
        }
    }

    /// Build an artifact whose classifier is read off a Maven-style file
    /// name, e.g. `lwjgl-3.3.1-natives-linux.jar` has `natives-linux`.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let classifier = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(classifier_from_file_name);
        Self { path, classifier }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// The platform tag, if this is a native artifact (`natives-<platform>`).
    pub fn platform(&self) -> Option<&str> {
        self.classifier()?.strip_prefix(NATIVES_PREFIX)
    }
}

/// Extract the `natives-*` classifier from a jar file name, if it has one.
pub fn classifier_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);
    let marker = format!("-{NATIVES_PREFIX}");
    let idx = stem.find(&marker)?;
    let classifier = &stem[idx + 1..];
    if classifier.len() > NATIVES_PREFIX.len() {
        Some(classifier.to_string())
    } else {
        None
    }
}

/// Where and how natives are unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativesConfig {
    /// Root of the natives output tree.
    pub natives_target_dir: PathBuf,
    /// Unpack each platform into `natives_target_dir/<platform>`.
    pub separate_dirs: bool,
    /// Platforms to unpack. Empty means all of them.
    pub platforms: Vec<String>,
    pub failure_policy: FailurePolicy,
}

impl Default for NativesConfig {
    fn default() -> Self {
        Self {
            natives_target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            separate_dirs: false,
            platforms: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl NativesConfig {
    pub fn new<P: Into<PathBuf>>(natives_target_dir: P) -> Self {
        Self {
            natives_target_dir: natives_target_dir.into(),
            ..Self::default()
        }
    }

    pub fn separate_dirs(mut self, separate: bool) -> Self {
        self.separate_dirs = separate;
        self
    }

    pub fn platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    fn allows(&self, platform: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == platform)
    }

    fn destination_for(&self, platform: &str) -> PathBuf {
        if self.separate_dirs {
            self.natives_target_dir.join(platform)
        } else {
            self.natives_target_dir.clone()
        }
    }
}

/// Receives the natives directory once it has been (re)populated, so an
/// incremental build can pick up the change.
pub trait BuildContext {
    fn refresh(&self, path: &Path);
}

impl<F: Fn(&Path)> BuildContext for F {
    fn refresh(&self, path: &Path) {
        self(path)
    }
}

/// Turn artifacts into extraction requests, in artifact order.
///
/// Artifacts without a `natives-` classifier are passed over silently;
/// natives for platforms outside the allow-list are logged and skipped.
pub fn plan(config: &NativesConfig, artifacts: &[Artifact]) -> Vec<ExtractionRequest> {
    let mut requests = Vec::new();
    for artifact in artifacts {
        let Some(platform) = artifact.platform() else {
            continue;
        };
        if !config.allows(platform) {
            info!(
                "skipping other platform: {} ({})",
                artifact.path().display(),
                platform
            );
            continue;
        }
        info!("{} ({})", artifact.path().display(), platform);
        requests.push(ExtractionRequest::new(
            artifact.path(),
            config.destination_for(platform),
        ));
    }
    requests
}

/// Unpack every native artifact according to `config`.
///
/// The natives directory is created first; failing that is a
/// [`Error::Configuration`] and nothing is extracted. `context` is refreshed
/// with the natives directory only when the whole batch succeeded.
pub fn copy_natives(
    config: &NativesConfig,
    artifacts: &[Artifact],
    unpacker: &dyn Unpack,
    context: &dyn BuildContext,
) -> Result<BatchReport> {
    info!("saving natives in {}", config.natives_target_dir.display());
    if config.separate_dirs {
        info!("storing artifacts in separate dirs according to classifier");
    }
    if config.platforms.is_empty() {
        info!("copying all platforms");
    } else {
        info!("only copying the following platforms: {:?}", config.platforms);
    }

    fs::create_dir_all(&config.natives_target_dir).map_err(|source| Error::Configuration {
        path: config.natives_target_dir.clone(),
        source,
    })?;

    let requests = plan(config, artifacts);
    let report = run_all(unpacker, &requests, config.failure_policy)?;
    context.refresh(&config.natives_target_dir);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_is_read_from_maven_file_names() {
        assert_eq!(
            classifier_from_file_name("lwjgl-3.3.1-natives-linux.jar").as_deref(),
            Some("natives-linux")
        );
        assert_eq!(
            classifier_from_file_name("jinput-2.0.9-natives-windows-x86_64.jar").as_deref(),
            Some("natives-windows-x86_64")
        );
        assert_eq!(classifier_from_file_name("guava-33.0.jar"), None);
        assert_eq!(classifier_from_file_name("foo-natives-.jar"), None);
    }

    #[test]
    fn platform_requires_natives_prefix() {
        let native = Artifact::new("a.jar", Some("natives-mac".into()));
        let sources = Artifact::new("a.jar", Some("sources".into()));
        let plain = Artifact::new("a.jar", None);
        assert_eq!(native.platform(), Some("mac"));
        assert_eq!(sources.platform(), None);
        assert_eq!(plain.platform(), None);
    }

    #[test]
    fn plan_routes_by_separate_dirs() {
        let artifacts = [
            Artifact::from_path("x-1.0-natives-linux.jar"),
            Artifact::from_path("x-1.0-natives-windows.jar"),
        ];

        let shared = plan(&NativesConfig::new("out"), &artifacts);
        assert!(shared
            .iter()
            .all(|r| r.destination() == Path::new("out")));

        let separate = plan(&NativesConfig::new("out").separate_dirs(true), &artifacts);
        assert_eq!(separate[0].destination(), Path::new("out").join("linux"));
        assert_eq!(separate[1].destination(), Path::new("out").join("windows"));
    }

    #[test]
    fn plan_honours_platform_allow_list() {
        let artifacts = [
            Artifact::from_path("x-natives-windows.jar"),
            Artifact::from_path("x-natives-mac.jar"),
            Artifact::from_path("x-natives-linux.jar"),
            Artifact::from_path("x.jar"),
        ];
        let config = NativesConfig::new("out").platforms(["windows", "linux"]);
        let sources: Vec<_> = plan(&config, &artifacts)
            .iter()
            .map(|r| r.source().to_path_buf())
            .collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("x-natives-windows.jar"),
                PathBuf::from("x-natives-linux.jar")
            ]
        );
    }
}
