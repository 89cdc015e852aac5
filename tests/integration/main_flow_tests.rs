use serial_test::serial;
use std::process::Command;

const BINARY: &str = env!("CARGO_BIN_EXE_padel-processor");

/// Test that the application exits with error code when database connection fails
#[test]
#[serial]
fn test_application_exits_on_connection_failure() {
    let output = Command::new(BINARY)
        .env(
            "CONNECTION_STRING",
            "host=invalid_host port=5432 user=postgres password=wrong dbname=nonexistent"
        )
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute processor");

    assert!(!output.status.success(), "Process should fail with invalid connection");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to connect to database"),
        "Should log connection error"
    );
    assert!(
        stderr.contains("Application cannot start without a valid database connection"),
        "Should log clear message about needing database connection"
    );
}

/// Test that the application refuses to start without a connection string
#[test]
#[serial]
fn test_application_exits_on_missing_connection_string() {
    // Run from a directory without a .env file
    let temp_dir = std::env::temp_dir().join("padel_processor_test");
    std::fs::create_dir_all(&temp_dir).ok();

    let output = Command::new(BINARY)
        .current_dir(&temp_dir)
        .env_clear()
        .env("RUST_LOG", "error")
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .output()
        .expect("Failed to execute processor");

    std::fs::remove_dir_all(&temp_dir).ok();

    assert!(
        !output.status.success(),
        "Process should fail without CONNECTION_STRING"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--connection-string"),
        "Should report the missing connection string. Got: {}",
        stderr
    );
}

/// Test that an invalid window size is rejected before anything connects
#[test]
#[serial]
fn test_application_rejects_zero_window_size() {
    let output = Command::new(BINARY)
        .env("CONNECTION_STRING", "host=invalid_host")
        .env("RUST_LOG", "error")
        .args(["--window-size", "0"])
        .output()
        .expect("Failed to execute processor");

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--window-size"), "Got: {}", stderr);
    assert!(!stderr.contains("Failed to connect to database"));
}
