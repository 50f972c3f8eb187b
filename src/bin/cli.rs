//! natives_unpack CLI - unpack native libraries from jars
//!
//! # Examples
//!
//! ```bash
//! # Unpack everything into target/natives
//! natives_unpack libs/lwjgl-3.3.1-natives-linux.jar libs/lwjgl-3.3.1-natives-windows.jar
//!
//! # One directory per platform, linux only
//! natives_unpack libs/*.jar -d build/natives --separate-dirs --platform linux
//!
//! # Classifier given explicitly
//! natives_unpack vendor/glfw.jar=natives-macos
//!
//! # Show what a jar contains and what would be skipped
//! natives_unpack libs/lwjgl-3.3.1-natives-linux.jar --list
//! ```

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use natives_unpack::{
    copy_natives, filter, Artifact, Error, FailurePolicy, JarArchive, JarExtractor,
    NativesConfig, DEFAULT_TARGET_DIR,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "natives_unpack",
    about = "Unpack native libraries from classifier-tagged jars",
    version,
    after_help = "EXAMPLES:
    natives_unpack libs/lwjgl-3.3.1-natives-linux.jar
    natives_unpack libs/*.jar -d build/natives --separate-dirs --platform linux
    natives_unpack vendor/glfw.jar=natives-macos
    natives_unpack libs/lwjgl-3.3.1-natives-linux.jar --list"
)]
struct Cli {
    /// Jars to unpack, as PATH or PATH=CLASSIFIER
    #[arg(required_unless_present = "completions", value_name = "JAR")]
    artifacts: Vec<String>,

    /// Natives target directory (created if missing)
    #[arg(short = 'd', long, default_value = DEFAULT_TARGET_DIR)]
    target_dir: PathBuf,

    /// Unpack each platform into its own subdirectory
    #[arg(long)]
    separate_dirs: bool,

    /// Only unpack these platforms (can be repeated)
    #[arg(long = "platform", value_name = "PLATFORM")]
    platforms: Vec<String>,

    /// Keep unpacking after a jar fails, then report every failure
    #[arg(long)]
    keep_going: bool,

    /// List jar contents without unpacking
    #[arg(short, long)]
    list: bool,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum)]
    completions: Option<Shell>,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - show each entry unpacked
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "natives_unpack", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", format_error(&e));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Error> {
    let artifacts: Vec<Artifact> = cli
        .artifacts
        .iter()
        .map(String::as_str)
        .map(parse_artifact)
        .collect();

    if cli.list {
        for artifact in &artifacts {
            list_archive(artifact.path(), cli.quiet)?;
        }
        return Ok(());
    }

    let policy = if cli.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::AbortOnFirst
    };
    let config = NativesConfig::new(&cli.target_dir)
        .separate_dirs(cli.separate_dirs)
        .platforms(cli.platforms.iter().cloned())
        .failure_policy(policy);

    let quiet = cli.quiet;
    let report = copy_natives(&config, &artifacts, &JarExtractor::new(), &|dir: &Path| {
        if !quiet {
            println!("Natives updated in {}", dir.display());
        }
    })?;

    if !quiet {
        println!(
            "Unpacked {} jars: {} files ({} bytes), {} directories",
            report.archives.len(),
            report.total.files_extracted,
            report.total.bytes_written,
            report.total.dirs_created
        );
    }

    Ok(())
}

/// `PATH=CLASSIFIER` or a bare `PATH` whose classifier comes from its name.
fn parse_artifact(arg: &str) -> Artifact {
    match arg.rsplit_once('=') {
        Some((path, classifier)) if !path.is_empty() && !classifier.is_empty() => {
            Artifact::new(path, Some(classifier.to_string()))
        }
        _ => Artifact::from_path(arg),
    }
}

fn list_archive(path: &Path, quiet: bool) -> Result<(), Error> {
    let mut archive = JarArchive::open(path)?;

    if !quiet {
        println!("{} entries in {}:", archive.len(), path.display());
        println!();
    }

    while let Some(entry) = archive.next_entry() {
        let entry = entry?;
        let marker = if filter::is_ignored(entry.name()) {
            "  (skipped)"
        } else {
            ""
        };
        println!("  {}{}", entry.name(), marker);
    }

    Ok(())
}

fn format_error(e: &Error) -> String {
    match e {
        Error::Batch { failures } => {
            let mut msg = format!("{} jars failed to unpack:", failures.len());
            for failure in failures {
                msg.push_str("\n  ");
                msg.push_str(&failure.to_string());
            }
            msg
        }
        _ => e.to_string(),
    }
}
