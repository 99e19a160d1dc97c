//! Send pipeline
//!
//! Hands a recipient and message to the configured Signal sender executable.
//! The executable is spawned directly with an argument vector, so nothing is
//! interpreted by a shell; quote escaping is only applied to the command line
//! rendered for the log.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{error, info, instrument, warn};

use crate::types::{RelayError, ServerConfig};

/// Captured output of a successful send
#[derive(Debug, Clone, Default)]
pub struct SendOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the Signal sender executable
#[derive(Debug, Clone)]
pub struct Dispatcher {
    exe_path: PathBuf,
}

impl Dispatcher {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            exe_path: config.signal_exe_path.clone(),
        }
    }

    /// Send `message` to `recipient`, waiting for the executable to finish
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The executable does not exist (checked on every call)
    /// - The process fails to spawn
    /// - The process exits with a non-zero status
    #[instrument(skip(self, message), fields(exe = %self.exe_path.display()))]
    pub async fn send(&self, recipient: &str, message: &str) -> Result<SendOutput, RelayError> {
        if !tokio::fs::try_exists(&self.exe_path).await.unwrap_or(false) {
            error!("Signal EXE not found at: {}", self.exe_path.display());
            return Err(RelayError::ExecutableNotFound(self.exe_path.clone()));
        }

        info!(
            "Executing: {}",
            display_command(&self.exe_path, recipient, message)
        );

        let output = Command::new(resolve_program(&self.exe_path))
            .arg(recipient)
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                error!("Error executing Signal EXE: {}", e);
                RelayError::SpawnError(e)
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            error!(code, stderr = %stderr.trim(), "Error executing Signal EXE");
            return Err(RelayError::CommandFailed { code, stderr });
        }

        if !stderr.trim().is_empty() {
            warn!("Signal EXE error: {}", stderr.trim());
        }
        if !stdout.trim().is_empty() {
            info!("Signal EXE output: {}", stdout.trim());
        }

        info!("Message to {} sent successfully", recipient);
        Ok(SendOutput { stdout, stderr })
    }
}

/// Relative paths are resolved against the working directory, where the
/// existence check looked, instead of being searched for on PATH.
fn resolve_program(exe_path: &Path) -> PathBuf {
    if exe_path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(exe_path);
        }
    }
    exe_path.to_path_buf()
}

/// Prefix every double quote with a backslash
pub fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Shell-style rendering of the invocation, for logs
pub fn display_command(exe_path: &Path, recipient: &str, message: &str) -> String {
    format!(
        "\"{}\" \"{}\" \"{}\"",
        exe_path.display(),
        escape_quotes(recipient),
        escape_quotes(message)
    )
}
