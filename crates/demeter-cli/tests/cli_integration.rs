//! CLI Integration Tests
//!
//! These tests run the `demeter` binary. Tests that need a backend start a
//! local HTTP stub on an ephemeral port.
//!
//! ```
//! cargo test --package demeter-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const BIN: &str = env!("CARGO_BIN_EXE_demeter");

/// Run the binary with an isolated config directory.
fn run(args: &[&str], home: &Path) -> Output {
    Command::new(BIN)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("DEMETER_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run demeter binary")
}

async fn run_async(args: Vec<String>, home: &Path) -> Output {
    tokio::process::Command::new(BIN)
        .args(&args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("DEMETER_URL")
        .env("NO_COLOR", "1")
        .output()
        .await
        .expect("Failed to run demeter binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

type Received = Arc<Mutex<Vec<Value>>>;

async fn start_stub() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route(
            "/api/sensor",
            get(|| async { Json(json!({"Temperature": 22.4, "EC": 1.8, "pH": 0, "99": 6.2})) }),
        )
        .route(
            "/api/history/24h",
            get(|| async {
                Json(json!([
                    {"timestamp": "2025-03-03T08:00:00", "Temperature": 20.5, "EC": 1.4, "pH": 5.9},
                    {"timestamp": "2025-03-03T09:00:00", "Temperature": 20.9, "EC": 1.4, "pH": 6.0}
                ]))
            }),
        )
        .route(
            "/api/set-target-values",
            post(
                |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().unwrap().push(body);
                    StatusCode::OK
                },
            ),
        )
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["--help"], home.path());
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["read", "history", "set", "watch", "dashboard", "config"] {
        assert!(text.contains(command), "help should list {command}");
    }
}

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["--version"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["completions", "bash"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("demeter"));
}

#[test]
fn test_no_color_env_values_accepted() {
    let home = tempfile::tempdir().unwrap();
    for value in ["1", "", "true", "0"] {
        let output = Command::new(BIN)
            .args(["config", "path"])
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join("config"))
            .env("NO_COLOR", value)
            .output()
            .expect("Failed to run demeter binary");
        assert!(
            output.status.success(),
            "NO_COLOR={value:?}: {}",
            stderr(&output)
        );
    }
}

// =============================================================================
// Argument validation
// =============================================================================

#[test]
fn test_history_rejects_unknown_range() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["history", "--range", "30d"], home.path());
    assert!(!output.status.success());
}

#[test]
fn test_set_rejects_non_numeric_input() {
    let home = tempfile::tempdir().unwrap();
    // Validation fails before any request is made.
    let output = run(
        &[
            "set",
            "--url",
            "http://127.0.0.1:9",
            "--low-ph",
            "abc",
            "--high-ph",
            "6.4",
            "--low-ec",
            "1800",
        ],
        home.path(),
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please enter valid numbers for all fields."));
}

#[test]
fn test_read_unreachable_backend_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = run(
        &["read", "--url", "http://127.0.0.1:9", "--timeout", "2"],
        home.path(),
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read sensors"));
}

// =============================================================================
// Config
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_config_path_and_roundtrip() {
    let home = tempfile::tempdir().unwrap();

    let output = run(&["config", "path"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("demeter/config.toml"));

    let output = run(
        &["config", "set", "url", "http://10.0.0.5:5000/"],
        home.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let output = run(&["config", "get", "url"], home.path());
    assert_eq!(stdout(&output).trim(), "http://10.0.0.5:5000");

    let output = run(&["config", "set", "theme", "purple"], home.path());
    assert!(!output.status.success());
}

// =============================================================================
// Against a local backend
// =============================================================================

#[tokio::test]
async fn test_read_json_uses_alternate_ph() {
    let (url, _) = start_stub().await;
    let home = tempfile::tempdir().unwrap();

    let output = run_async(
        vec!["read".into(), "--url".into(), url, "--json".into()],
        home.path(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));

    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["temperature"], 22.4);
    assert_eq!(value["pH"], 6.2);
    assert_eq!(value["ec"], 1.8);
}

#[tokio::test]
async fn test_history_csv() {
    let (url, _) = start_stub().await;
    let home = tempfile::tempdir().unwrap();

    let output = run_async(
        vec![
            "history".into(),
            "--url".into(),
            url,
            "--range".into(),
            "24h".into(),
            "--format".into(),
            "csv".into(),
        ],
        home.path(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("range,label,timestamp,temperature,ph,ec"));
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_set_sends_backend_keys() {
    let (url, received) = start_stub().await;
    let home = tempfile::tempdir().unwrap();

    let output = run_async(
        vec![
            "set".into(),
            "--url".into(),
            url,
            "--low-ph".into(),
            "5.8".into(),
            "--high-ph".into(),
            "6.2".into(),
            "--low-ec".into(),
            "1500".into(),
        ],
        home.path(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Data successfully sent to the device!"));

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0], json!({"low_pH": 5.8, "high_pH": 6.2, "low_EC": 1500.0}));
}
