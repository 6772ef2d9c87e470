//! Integration tests for the oodproxy binary
//!
//! Exercises argument handling and the exit-code contract: 0 for a fully
//! successful run, 1 for validation/startup/timeout failures.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

const BINARY: &str = env!("CARGO_BIN_EXE_oodproxy");

fn write_launch_file(dir: &std::path::Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("session.ood");
    let mut file = std::fs::File::create(&path).expect("create launch file");
    for line in lines {
        writeln!(file, "{}", line).expect("write launch file");
    }
    path
}

#[test]
fn test_help_mentions_launch_file() {
    let output = Command::new(BINARY)
        .arg("--help")
        .output()
        .expect("Failed to run oodproxy --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("launch file"));
    assert!(stdout.contains("--debug"));
}

#[test]
fn test_missing_argument_is_a_usage_error() {
    let output = Command::new(BINARY)
        .output()
        .expect("Failed to run oodproxy");

    // clap reports usage errors with exit code 2
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_nonexistent_launch_file_exits_one() {
    let output = Command::new(BINARY)
        .arg("/nonexistent/session.ood")
        .output()
        .expect("Failed to run oodproxy");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be found"));
}

#[test]
fn test_launch_file_missing_proto_exits_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_launch_file(
        dir.path(),
        &[
            "REMOTE_PROXY=1.2.3.4:443",
            "CRT_BASE64=Y2VydA==",
            "KEY_BASE64=a2V5",
            "CACRT_BASE64=Y2E=",
        ],
    );

    let output = Command::new(BINARY)
        .arg(&path)
        .output()
        .expect("Failed to run oodproxy");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PROTO"));
}

#[test]
fn test_unsupported_protocol_exits_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_launch_file(
        dir.path(),
        &[
            "REMOTE_PROXY=1.2.3.4:443",
            "CRT_BASE64=Y2VydA==",
            "KEY_BASE64=a2V5",
            "CACRT_BASE64=Y2E=",
            "PROTO=telnet",
            "PASSWORD=x",
        ],
    );

    let output = Command::new(BINARY)
        .arg(&path)
        .output()
        .expect("Failed to run oodproxy");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported protocol"));
}
