//! Signal Server Library
//!
//! HTTP relay in front of a local Signal sender executable. Requests are
//! filtered by source address, then `POST /send-message` (or the legacy
//! `GET /send-busy`) runs the executable with the recipient and message as
//! two arguments.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use signal_server::{server, settings, RuntimeMode};
//!
//! let config = settings::load_or_default(None);
//! server::serve(config, RuntimeMode::Production).await?;
//! ```

pub mod dispatch;
pub mod guard;
pub mod server;
pub mod settings;
pub mod types;

pub use dispatch::Dispatcher;
pub use guard::AccessGuard;
pub use server::AppState;
pub use types::{RelayError, RuntimeMode, ServerConfig};
