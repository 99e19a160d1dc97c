//! Signal Client Library
//!
//! Builds a [`signal_common::MessageRequest`] from command-line arguments and
//! posts it to the relay server.

pub mod args;
pub mod sender;

pub use args::{help_text, parse_args, wants_help, ClientArgs};
pub use sender::{send_message, ClientError, SendOutcome};
