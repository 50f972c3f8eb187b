//! CLI integration tests
//!
//! These tests verify the CLI works correctly end-to-end.

#![cfg(feature = "cli")]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

fn cli_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_natives_unpack"))
}

fn create_native_jar(dir: &Path, name: &str, lib: &str) -> PathBuf {
    let jar_path = dir.join(name);
    let file = fs::File::create(&jar_path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options: zip::write::FileOptions<()> = zip::write::FileOptions::default();

    zip.start_file("META-INF/MANIFEST.MF", options.clone()).unwrap();
    zip.write_all(b"Manifest-Version: 1.0\n").unwrap();

    zip.start_file(lib, options).unwrap();
    zip.write_all(b"native library").unwrap();

    zip.finish().unwrap();
    jar_path
}

#[test]
fn test_cli_help() {
    let output = cli_binary().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unpack native libraries"));
    assert!(stdout.contains("--separate-dirs"));
    assert!(stdout.contains("--platform"));
    assert!(stdout.contains("--keep-going"));
}

#[test]
fn test_cli_version() {
    let output = cli_binary().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("natives_unpack"));
}

#[test]
fn test_cli_unpack() {
    let temp = tempfile::tempdir().unwrap();
    let jar = create_native_jar(temp.path(), "x-1.0-natives-linux.jar", "libx.so");
    let dest = temp.path().join("natives");

    let output = cli_binary().arg(&jar).arg("-d").arg(&dest).output().unwrap();

    assert!(output.status.success());
    assert_eq!(fs::read(dest.join("libx.so")).unwrap(), b"native library");
    assert!(!dest.join("META-INF").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unpacked 1 jars"));
}

#[test]
fn test_cli_separate_dirs_and_platform_filter() {
    let temp = tempfile::tempdir().unwrap();
    let linux = create_native_jar(temp.path(), "x-natives-linux.jar", "libx.so");
    let windows = create_native_jar(temp.path(), "x-natives-windows.jar", "x.dll");
    let dest = temp.path().join("natives");

    let output = cli_binary()
        .arg(&linux)
        .arg(&windows)
        .arg("-d")
        .arg(&dest)
        .arg("--separate-dirs")
        .arg("--platform")
        .arg("linux")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(dest.join("linux").join("libx.so").is_file());
    assert!(!dest.join("windows").exists());
}

#[test]
fn test_cli_explicit_classifier() {
    let temp = tempfile::tempdir().unwrap();
    let jar = create_native_jar(temp.path(), "glfw.jar", "libglfw.dylib");
    let dest = temp.path().join("natives");

    let output = cli_binary()
        .arg(format!("{}=natives-macos", jar.display()))
        .arg("-d")
        .arg(&dest)
        .arg("--separate-dirs")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(dest.join("macos").join("libglfw.dylib").is_file());
}

#[test]
fn test_cli_list() {
    let temp = tempfile::tempdir().unwrap();
    let jar = create_native_jar(temp.path(), "x-natives-linux.jar", "libx.so");
    let dest = temp.path().join("natives");

    let output = cli_binary()
        .arg(&jar)
        .arg("--list")
        .arg("-d")
        .arg(&dest)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 entries"));
    assert!(stdout.contains("META-INF/MANIFEST.MF  (skipped)"));
    assert!(stdout.contains("libx.so"));
    assert!(!dest.exists());
}

#[test]
fn test_cli_quiet() {
    let temp = tempfile::tempdir().unwrap();
    let jar = create_native_jar(temp.path(), "x-natives-linux.jar", "libx.so");

    let output = cli_binary()
        .arg(&jar)
        .arg("-d")
        .arg(temp.path().join("natives"))
        .arg("-q")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn test_cli_missing_jar_fails() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("gone-natives-linux.jar");

    let output = cli_binary()
        .arg(&missing)
        .arg("-d")
        .arg(temp.path().join("natives"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gone-natives-linux.jar"));
}

#[test]
fn test_cli_keep_going_reports_every_failure() {
    let temp = tempfile::tempdir().unwrap();
    let good = create_native_jar(temp.path(), "ok-natives-linux.jar", "libok.so");
    let dest = temp.path().join("natives");

    let output = cli_binary()
        .arg(temp.path().join("a-natives-linux.jar"))
        .arg(&good)
        .arg(temp.path().join("b-natives-linux.jar"))
        .arg("-d")
        .arg(&dest)
        .arg("--keep-going")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 jars failed"));
    assert!(dest.join("libok.so").is_file());
}

#[test]
fn test_cli_completions() {
    let output = cli_binary()
        .arg("--completions")
        .arg("bash")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("natives_unpack"));
}
