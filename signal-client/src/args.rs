//! Command-line argument scanning
//!
//! The scanner is deliberately lenient: a flag with no following value is
//! ignored, an unparsable port keeps the previous port, and nothing here ever
//! fails. A trailing token that is not a flag replaces the message, even when
//! `-m` appeared earlier (last token wins).

use signal_common::{DEFAULT_MESSAGE, DEFAULT_RECIPIENT};
use tracing::debug;

/// Server address used when `-s` is not given
pub const DEFAULT_SERVER_IP: &str = "192.168.100.3";

/// Server port used when `-p` is not given
pub const DEFAULT_PORT: u16 = 8888;

/// Parsed client arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientArgs {
    pub recipient: String,
    pub message: String,
    pub server_ip: String,
    pub port: u16,
}

impl Default for ClientArgs {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            server_ip: DEFAULT_SERVER_IP.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// `-h` or `--help` anywhere in the raw arguments
pub fn wants_help<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .any(|arg| matches!(arg.as_ref(), "-h" | "--help"))
}

/// Scan `args` (program name excluded) left to right over the defaults
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> ClientArgs {
    let mut parsed = ClientArgs::default();
    let last = args.len().saturating_sub(1);
    let mut i = 0;

    while i < args.len() {
        let arg: &str = args[i].as_ref();
        let value: Option<&str> = args.get(i + 1).map(|v| v.as_ref());

        match (arg, value) {
            ("-r" | "--recipient", Some(value)) => {
                parsed.recipient = value.to_string();
                debug!("Set recipient to: {}", value);
                i += 1;
            }
            ("-m" | "--message", Some(value)) => {
                parsed.message = value.to_string();
                debug!("Set message to: {}", value);
                i += 1;
            }
            ("-s" | "--server", Some(value)) => {
                parsed.server_ip = value.to_string();
                debug!("Set server IP to: {}", value);
                i += 1;
            }
            ("-p" | "--port", Some(value)) => {
                match parse_port(value) {
                    Some(port) => {
                        parsed.port = port;
                        debug!("Set port to: {}", port);
                    }
                    None => debug!("Ignoring invalid port: {}", value),
                }
                i += 1;
            }
            (
                "-r" | "--recipient" | "-m" | "--message" | "-s" | "--server" | "-p" | "--port",
                None,
            ) => {
                debug!("Ignoring {} with no value", arg);
            }
            (other, _) => {
                if i == last && !other.starts_with('-') {
                    parsed.message = other.to_string();
                    debug!("Set message from positional argument: {}", other);
                }
            }
        }

        i += 1;
    }

    parsed
}

/// Leading decimal digits of `value` as a port, ignoring any trailing text
///
/// `"9000abc"` is port 9000. No leading digits, or a number outside the u16
/// range, yields `None`.
fn parse_port(value: &str) -> Option<u16> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Usage text printed for `-h`/`--help`
pub fn help_text() -> String {
    format!(
        r#"
Signal Client - Send messages via Signal remotely

Usage:
  signal-client [options] [message]

Options:
  -r, --recipient <name>   Recipient name (default: "{recipient}")
  -m, --message <text>     Message to send (default: "{message}")
  -s, --server <ip>        Server IP address (default: {server})
  -p, --port <number>      Server port (default: {port})
  -h, --help               Show this help message

Examples:
  signal-client
  signal-client "I'll call you back in 5 minutes"
  signal-client -r "Wife" -m "Running late, be home soon"
"#,
        recipient = DEFAULT_RECIPIENT,
        message = DEFAULT_MESSAGE,
        server = DEFAULT_SERVER_IP,
        port = DEFAULT_PORT,
    )
}
