//! Wire type shared between client and server

use serde::{Deserialize, Serialize};

/// Recipient used when none is given
pub const DEFAULT_RECIPIENT: &str = "Note to Self";

/// Message used when none is given
pub const DEFAULT_MESSAGE: &str = "Busy, can't talk right now";

/// Route the client posts to
pub const SEND_MESSAGE_PATH: &str = "/send-message";

/// Body of `POST /send-message`
///
/// Missing fields decode as empty strings; the server rejects those with a
/// 400 rather than a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub message: String,
}

impl MessageRequest {
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            message: message.into(),
        }
    }

    /// Both fields are present and non-empty
    pub fn is_complete(&self) -> bool {
        !self.recipient.is_empty() && !self.message.is_empty()
    }
}
