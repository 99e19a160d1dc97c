//! Type definitions for the relay server

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Top level of `settings.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsFile {
    pub server: ServerConfig,
}

/// Server configuration, immutable after startup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port to listen on (all interfaces)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Executable that actually delivers the message
    #[serde(default = "default_signal_exe_path")]
    pub signal_exe_path: PathBuf,

    /// Source addresses allowed to call the relay outside development mode
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_signal_exe_path() -> PathBuf {
    PathBuf::from("SignalSend.exe")
}

fn default_allowed_ips() -> Vec<String> {
    vec!["127.0.0.1".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            signal_exe_path: default_signal_exe_path(),
            allowed_ips: default_allowed_ips(),
        }
    }
}

/// Runtime mode, read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RuntimeMode {
    /// Every source address is allowed
    Development,
    /// Only addresses in `allowedIps` are allowed
    #[default]
    Production,
}

impl RuntimeMode {
    pub fn is_development(self) -> bool {
        self == RuntimeMode::Development
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failures of the send pipeline
#[derive(Error, Debug)]
pub enum RelayError {
    /// The configured executable does not exist on disk
    #[error("Signal EXE not found at: {0}")]
    ExecutableNotFound(PathBuf),

    /// The executable could not be started
    #[error("failed to spawn Signal EXE: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The executable ran and exited non-zero
    #[error("Signal EXE failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Exit code, -1 when killed by a signal
        code: i32,
        /// Standard error output of the executable
        stderr: String,
    },
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::ExecutableNotFound(_) => "Signal EXE not found",
            Self::SpawnError(_) | Self::CommandFailed { .. } => "Failed to send message",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Failures while loading `settings.json`
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("no settings file found")]
    NotFound,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
