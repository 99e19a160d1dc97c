//! Message sender
//!
//! One POST to `http://{server}:{port}/send-message`, no retries. Any HTTP
//! status counts as an answer. A request that never gets an answer is not an
//! error either: the relay may still have run the sender before the
//! connection dropped.

use std::time::Duration;

use reqwest::StatusCode;
use signal_common::{MessageRequest, SEND_MESSAGE_PATH};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::args::ClientArgs;

/// Timeout for the whole request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that stop the client before a request could be made
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server/port combination does not form a usable URL
    #[error("Request setup error: invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The request could not be built
    #[error("Request setup error: {0}")]
    Request(#[source] reqwest::Error),
}

/// What happened to the request
#[derive(Debug)]
pub enum SendOutcome {
    /// The server answered, with any status
    Response { status: StatusCode, body: String },
    /// Connection refused, reset, or timed out before an answer
    NoResponse { reason: String },
}

/// Target URL for the parsed arguments, unvalidated
pub fn endpoint(args: &ClientArgs) -> String {
    format!("http://{}:{}{}", args.server_ip, args.port, SEND_MESSAGE_PATH)
}

/// Target URL for the parsed arguments
pub fn endpoint_url(args: &ClientArgs) -> Result<Url, ClientError> {
    let raw = endpoint(args);
    Url::parse(&raw).map_err(|source| ClientError::InvalidUrl { url: raw, source })
}

/// Send the message with the default 10 second timeout
pub async fn send_message(args: &ClientArgs) -> Result<SendOutcome, ClientError> {
    send_message_with_timeout(args, REQUEST_TIMEOUT).await
}

/// Send the message, giving up on an answer after `timeout`
#[instrument(skip(args), fields(server = %args.server_ip, port = args.port))]
pub async fn send_message_with_timeout(
    args: &ClientArgs,
    timeout: Duration,
) -> Result<SendOutcome, ClientError> {
    let url = endpoint_url(args)?;
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ClientError::Request)?;

    let payload = MessageRequest::new(args.recipient.as_str(), args.message.as_str());
    debug!("Posting {:?} to {}", payload, url);

    let response = match client.post(url).json(&payload).send().await {
        Ok(response) => response,
        Err(e) if e.is_builder() => return Err(ClientError::Request(e)),
        Err(e) => {
            debug!("No response: {:?}", e);
            return Ok(SendOutcome::NoResponse {
                reason: describe(&e),
            });
        }
    };

    let status = response.status();
    match response.text().await {
        Ok(body) => Ok(SendOutcome::Response { status, body }),
        Err(e) => Ok(SendOutcome::NoResponse {
            reason: format!("server answered {} but the body was lost: {}", status, describe(&e)),
        }),
    }
}

fn describe(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "could not connect"
    } else {
        "request failed"
    };
    match std::error::Error::source(e) {
        Some(source) => format!("{}: {}", kind, source),
        None => format!("{}: {}", kind, e),
    }
}

/// Print the outcome for the user
pub fn report(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Response { status, body } => {
            println!("Server status: {}", status);
            println!("Server response: {}", body);
            if status.is_success() {
                println!("Message sent successfully!");
            } else {
                eprintln!("Server responded with status {}", status);
            }
        }
        SendOutcome::NoResponse { reason } => {
            eprintln!("Error sending message request:");
            eprintln!("No response received from server, but request was sent ({}).", reason);
            println!("The message may still have been triggered successfully.");
        }
    }
}
