//! DATA payload formatting.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Local};

/// The message written after the server accepts `DATA`.
///
/// Headers are emitted in a fixed order (`Subject`, `From`, `To`, `Date`),
/// followed by a blank line, the body verbatim, and the `.` terminator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Envelope and header sender.
    pub from: String,
    /// Envelope and header recipient.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Value of the `Date` header.
    pub date: DateTime<FixedOffset>,
}

impl Message {
    /// Creates a message dated now, in local time.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            date: Local::now().fixed_offset(),
        }
    }

    /// Overrides the `Date` header.
    #[must_use]
    pub const fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = date;
        self
    }

    /// Renders the full DATA payload, terminator included.
    ///
    /// The body is not dot-stuffed: a body line consisting of a single `.`
    /// ends the message early on the server side.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        let mut payload = String::new();

        // Writing to a String cannot fail
        let _ = write!(payload, "Subject: {}\r\n", self.subject);
        let _ = write!(payload, "From: <{}>\r\n", self.from);
        let _ = write!(payload, "To: <{}>\r\n", self.to);
        let _ = write!(payload, "Date: {}\r\n", self.date.to_rfc2822());
        payload.push_str("\r\n");
        payload.push_str(&self.body);
        payload.push_str("\r\n.\r\n");

        payload.into_bytes()
    }
}
