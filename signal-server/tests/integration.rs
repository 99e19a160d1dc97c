//! Integration tests for the relay server
//!
//! Each test binds the router on 127.0.0.1:0 and talks to it over real HTTP,
//! so the source address seen by the IP filter is the loopback address.
//! A small shell script stands in for the Signal sender and records the
//! arguments it was given.

#![cfg(unix)]

use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde_json::json;
use signal_server::{server, AppState, RuntimeMode, ServerConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Script that records `$#`, `$1` and `$2`, one per line
const RECORDING_SCRIPT: &str = r#"printf '%s\n' "$#" "$1" "$2" > "$(dirname "$0")/args.txt""#;

struct Relay {
    addr: SocketAddr,
    dir: TempDir,
    client: reqwest::Client,
}

impl Relay {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Arguments the fake sender was invoked with, if it ran
    fn recorded_args(&self) -> Option<Vec<String>> {
        std::fs::read_to_string(self.dir.path().join("args.txt"))
            .ok()
            .map(|s| s.lines().map(str::to_string).collect())
    }

    async fn post_json(&self, body: serde_json::Value) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url("/send-message"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }
}

fn write_exe(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("signal-send");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Start a relay whose executable runs `script` (or is missing when `None`)
async fn start_relay(script: Option<&str>, allowed_ips: &[&str], mode: RuntimeMode) -> Relay {
    let dir = tempfile::tempdir().unwrap();
    let exe = match script {
        Some(body) => write_exe(dir.path(), body),
        None => dir.path().join("missing-signal-send"),
    };

    let config = ServerConfig {
        port: 0,
        signal_exe_path: exe,
        allowed_ips: allowed_ips.iter().map(|s| s.to_string()).collect(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(config, mode);
    tokio::spawn(server::run(listener, state, std::future::pending()));

    Relay {
        addr,
        dir,
        client: reqwest::Client::new(),
    }
}

async fn local_relay(script: Option<&str>) -> Relay {
    start_relay(script, &["127.0.0.1"], RuntimeMode::Production).await
}

// ============================================================================
// Routes
// ============================================================================

#[tokio::test]
async fn status_route_reports_running() {
    let relay = local_relay(None).await;
    let (status, body) = relay.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Signal Remote Server is running");
}

#[tokio::test]
async fn send_message_invokes_executable() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let (status, body) = relay
        .post_json(json!({"recipient": "Wife", "message": "omw"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Message sending initiated");
    assert_eq!(relay.recorded_args().unwrap(), vec!["2", "Wife", "omw"]);
}

#[tokio::test]
async fn quotes_reach_executable_as_single_argument() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let (status, _) = relay
        .post_json(json!({"recipient": "\"Mom\"", "message": "say \"hi\" \"now"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        relay.recorded_args().unwrap(),
        vec!["2", "\"Mom\"", "say \"hi\" \"now"]
    );
}

#[tokio::test]
async fn send_busy_uses_default_message() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let (status, body) = relay.get("/send-busy").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Message sending initiated");
    assert_eq!(
        relay.recorded_args().unwrap(),
        vec!["2", "Note to Self", "Busy, can't talk right now"]
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let relay = local_relay(None).await;
    let (status, _) = relay.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn empty_recipient_is_rejected_without_sending() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let (status, body) = relay
        .post_json(json!({"recipient": "", "message": "x"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing recipient or message");
    assert!(relay.recorded_args().is_none(), "executable must not run");
}

#[tokio::test]
async fn missing_message_field_is_rejected_without_sending() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let (status, _) = relay.post_json(json!({"recipient": "Wife"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(relay.recorded_args().is_none());
}

#[tokio::test]
async fn non_json_body_is_rejected_without_sending() {
    let relay = local_relay(Some(RECORDING_SCRIPT)).await;

    let response = relay
        .client
        .post(relay.url("/send-message"))
        .header("content-type", "text/plain")
        .body("recipient=Wife")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(relay.recorded_args().is_none());
}

// ============================================================================
// Send pipeline failures
// ============================================================================

#[tokio::test]
async fn missing_executable_is_server_error() {
    let relay = local_relay(None).await;

    let (status, body) = relay
        .post_json(json!({"recipient": "Wife", "message": "omw"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Signal EXE not found");
}

#[tokio::test]
async fn failing_executable_is_server_error() {
    let relay = local_relay(Some("echo 'Signal window not found' >&2\nexit 1")).await;

    let (status, body) = relay.get("/send-busy").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to send message");
}

// ============================================================================
// IP filter
// ============================================================================

#[tokio::test]
async fn unlisted_address_is_denied_everywhere() {
    let relay = start_relay(Some(RECORDING_SCRIPT), &["10.0.0.1"], RuntimeMode::Production).await;

    for path in ["/", "/send-busy", "/nope"] {
        let (status, body) = relay.get(path).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {path}");
        assert_eq!(body, "Access denied");
    }

    let (status, _) = relay
        .post_json(json!({"recipient": "Wife", "message": "omw"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(relay.recorded_args().is_none(), "executable must not run");
}

#[tokio::test]
async fn development_mode_skips_allow_list() {
    let relay = start_relay(Some(RECORDING_SCRIPT), &["10.0.0.1"], RuntimeMode::Development).await;

    let (status, _) = relay
        .post_json(json!({"recipient": "Wife", "message": "omw"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(relay.recorded_args().unwrap(), vec!["2", "Wife", "omw"]);
}
