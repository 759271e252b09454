//! Console sink stream selection, checked in a child process so the real
//! stdout and stderr can be captured.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Set in the child; holds the message to log.
const CHILD_MESSAGE: &str = "CHRONILOG_STREAM_TEST_MESSAGE";

/// Logs one record through the default registry when spawned by the tests
/// below; does nothing in a normal run.
#[test]
fn emit_from_child() {
    let Ok(message) = std::env::var(CHILD_MESSAGE) else {
        return;
    };
    let logger = chronilog::get_logger("stream.check").unwrap();
    logger.info(message);
    logger.flush();
}

fn run_child(console_output: &str, message: &str) -> Output {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join(".chronilog.toml");
    fs::write(
        &config,
        format!(
            "[logging]\nlog_path = \"\"\nenable_console = true\nconsole_output = \"{console_output}\"\n"
        ),
    )
    .unwrap();

    Command::new(std::env::current_exe().unwrap())
        .args(["emit_from_child", "--exact", "--nocapture", "--test-threads=1"])
        .current_dir(dir.path())
        .env(CHILD_MESSAGE, message)
        .env("CHRONILOG_CONFIG", &config)
        .env("NO_COLOR", "1")
        .env_remove("CHRONILOG_FORCE_COLOR")
        .env_remove("CHRONILOG_LOG_LEVEL")
        .env_remove("CHRONILOG_LOG_PATH")
        .output()
        .expect("Failed to spawn test binary")
}

#[test]
fn test_console_output_stderr() {
    let output = run_child("stderr", "routed-to-stderr");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[INFO] stream.check: routed-to-stderr"),
        "stderr: {stderr}"
    );
    assert!(!stdout.contains("routed-to-stderr"), "stdout: {stdout}");
}

#[test]
fn test_console_output_stdout() {
    let output = run_child("stdout", "routed-to-stdout");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stdout.contains("[INFO] stream.check: routed-to-stdout"),
        "stdout: {stdout}"
    );
    assert!(!stderr.contains("routed-to-stdout"), "stderr: {stderr}");
}
