use std::io::Write;
use std::process::{Command, Stdio};

fn worker() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_starter-function"));
    cmd.env_clear()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn exits_non_zero_without_configuration() {
    let output = worker().output().unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("appwrite envs not configured!"));
}

#[test]
fn exits_non_zero_with_partial_configuration() {
    let output = worker()
        .env("APPWRITE_ENDPOINT", "http://127.0.0.1:9/v1")
        .env("APPWRITE_FUNCTION_PROJECT_ID", "project")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("APPWRITE_DATABASE_ID"));
}

#[test]
fn configured_worker_exits_cleanly_when_stdin_closes() {
    let mut child = worker()
        .env("APPWRITE_ENDPOINT", "http://127.0.0.1:9/v1")
        .env("APPWRITE_FUNCTION_PROJECT_ID", "project")
        .env("APPWRITE_DATABASE_ID", "db")
        .env("APPWRITE_COLLECTION_ID", "col")
        .spawn()
        .unwrap();

    // Close stdin without sending a frame.
    child.stdin.take().unwrap().flush().unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
