//! Short runs of the compiled binary

use std::process::Command;

fn prioqueue() -> Command {
    Command::new(env!("CARGO_BIN_EXE_prioqueue"))
}

#[test]
fn test_short_run_prints_json_summary() {
    let output = prioqueue()
        .args([
            "2",
            "2",
            "3",
            "1",
            "--wait-unit-ms",
            "5",
            "--seed",
            "7",
            "--summary-format",
            "json",
            "--log-level",
            "warn",
            "--no-color",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let produced = summary["produced"].as_u64().unwrap();
    let consumed = summary["consumed"].as_u64().unwrap();
    let remaining = summary["remaining"].as_u64().unwrap();
    assert!(produced > 0);
    assert_eq!(produced, consumed + remaining);
    assert!(remaining <= 3);
    assert_eq!(summary["workers"].as_array().unwrap().len(), 4);
}

#[test]
fn test_invalid_arguments_exit_with_failure() {
    let output = prioqueue()
        .args(["0", "11", "21", "5", "--no-color"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PRODUCERS"), "stderr: {}", stderr);
    assert!(stderr.contains("CAPACITY"), "stderr: {}", stderr);
}

#[test]
fn test_missing_explicit_config_file() {
    let output = prioqueue()
        .args(["--config-file", "/nonexistent/prioqueue.toml", "--no-color"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
