//! # mailshot-smtp
//!
//! Sends one email per call over an implicit-TLS SMTP connection, using a
//! fixed `HELO` / `AUTH LOGIN` / `MAIL` / `RCPT` / `DATA` / `QUIT` dialect.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailshot_smtp::{Config, Mail, send_mail};
//!
//! #[tokio::main]
//! async fn main() -> mailshot_smtp::Result<()> {
//!     let mail = Mail::new("me@gmail.com", "app-password", "you@example.com")
//!         .subject("Hi")
//!         .body("hello");
//!
//!     send_mail(&Config::default(), &mail).await
//! }
//! ```
//!
//! ## Session
//!
//! Every reply is checked against the code the current step expects:
//!
//! ```text
//! 220 HELO ─ 250 AUTH LOGIN ─ 334 user ─ 334 pass ─ 235 MAIL FROM
//!   ─ 250 RCPT TO ─ 250 DATA ─ 354 message ─ 250 QUIT ─ 221 done
//! ```
//!
//! A reply with any other code fails the session with
//! [`Error::ProtocolMismatch`] after a best-effort `QUIT`. The server closing
//! the connection early fails it with [`Error::ConnectionClosed`].
//!
//! Each inbound read is treated as one whole reply; replies split across
//! reads or several replies in one read are not reassembled.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Transport trait, TLS connector, configuration
//! - [`driver`]: Session state machine and delivery loop
//! - [`message`]: DATA payload formatting
//! - [`plan`]: The fixed command plan
//! - [`types`]: Reply codes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

/// Logs a session event at `info` when verbose, `debug` otherwise.
macro_rules! verbose_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod command;
pub mod connection;
pub mod driver;
mod error;
pub mod message;
pub mod plan;
mod send;
pub mod types;

pub use connection::{Config, ConfigBuilder, Inbound, StreamTransport, Transport, connect_tls};
pub use driver::{Session, SessionState, deliver};
pub use error::{Error, Result};
pub use message::Message;
pub use plan::{Plan, Step};
pub use send::{Mail, send_mail, send_mail_over};
pub use types::ReplyCode;
