//! Signal Common - Shared pieces of the Signal relay
//!
//! Used by both the relay server and the command-line client:
//!
//! - **Message**: [`MessageRequest`], the JSON body of `POST /send-message`
//! - **Defaults**: the fallback recipient/message used by the legacy busy route
//!   and by the client when no arguments are given
//! - **Initialization**: [`init_tracing`] for consistent log setup

pub mod init;
pub mod message;

pub use init::init_tracing;
pub use message::{MessageRequest, DEFAULT_MESSAGE, DEFAULT_RECIPIENT, SEND_MESSAGE_PATH};
