//! SMTP reply codes.

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Reads the leading three-digit code of a raw reply.
    #[must_use]
    pub fn from_reply(reply: &str) -> Option<Self> {
        let digits = reply.get(..3)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }

    /// Returns true if `reply` starts with this code's text.
    ///
    /// Only the prefix is compared; `"2501"` matches `250`.
    #[must_use]
    pub fn prefixes(self, reply: &str) -> bool {
        reply.starts_with(&self.to_string())
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns true if this is an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Common reply codes
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication successful
    pub const AUTH_SUCCESSFUL: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 334 Continue with authentication
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
    /// 421 Service not available, closing transmission channel
    pub const SERVICE_UNAVAILABLE: Self = Self(421);
    /// 451 Local error in processing
    pub const LOCAL_ERROR: Self = Self(451);
    /// 535 Authentication credentials invalid
    pub const AUTH_FAILED: Self = Self(535);
    /// 550 Mailbox unavailable (not found, access denied)
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
    /// 554 Transaction failed
    pub const TRANSACTION_FAILED: Self = Self(554);
}
