//! Error types for SMTP submission.

use std::io;
use std::time::Duration;

use crate::types::ReplyCode;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the underlying connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Hostname cannot be used as a TLS server name.
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// TCP connect plus TLS handshake did not finish in time.
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Server reply did not start with the status code expected for the step.
    #[error("Unexpected response (expected {expected}): {reply}")]
    ProtocolMismatch {
        /// Status code the current step was waiting for.
        expected: ReplyCode,
        /// Raw reply text as received.
        reply: String,
    },

    /// Connection closed before the final reply arrived.
    #[error("Connection closed before the session completed")]
    ConnectionClosed,

    /// A reply arrived after every step of the plan was consumed.
    #[error("Reply received after the command plan was exhausted")]
    ProtocolExhausted,
}

impl Error {
    /// Returns the reply code carried by a [`Error::ProtocolMismatch`], if it
    /// starts with one.
    #[must_use]
    pub fn reply_code(&self) -> Option<ReplyCode> {
        match self {
            Self::ProtocolMismatch { reply, .. } => ReplyCode::from_reply(reply),
            _ => None,
        }
    }

    /// Returns true if the server rejected a step permanently (5xx).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.reply_code().is_some_and(ReplyCode::is_permanent)
    }

    /// Returns true if the server rejected a step transiently (4xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.reply_code().is_some_and(ReplyCode::is_transient)
    }
}
