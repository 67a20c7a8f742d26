//! SMTP command builder.
//!
//! Only the commands of the fixed submission dialect are represented. Note
//! that `MAIL FROM:` and `RCPT TO:` carry a space before the bracketed
//! address; servers speaking this dialect accept it and the wire form is kept
//! as-is.

use base64::Engine;

/// SMTP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// HELO - Simple greeting
    Helo {
        /// Server name announced in the greeting
        hostname: String,
    },
    /// AUTH LOGIN - Begin two-step LOGIN authentication
    AuthLogin,
    /// One base64-encoded line answering a `334` challenge
    AuthResponse {
        /// Already-encoded response
        encoded: String,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Sender address
        from: String,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Recipient address
        to: String,
    },
    /// DATA - Begin message data
    Data,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Builds an AUTH LOGIN response line for a raw credential.
    #[must_use]
    pub fn credential(raw: &str) -> Self {
        Self::AuthResponse {
            encoded: encode_credential(raw),
        }
    }

    /// Returns true if the serialized form carries a secret.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        matches!(self, Self::AuthResponse { .. })
    }

    /// Serializes the command to bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Self::Helo { hostname } => {
                buf.extend_from_slice(b"HELO ");
                buf.extend_from_slice(hostname.as_bytes());
            }
            Self::AuthLogin => {
                buf.extend_from_slice(b"AUTH LOGIN");
            }
            Self::AuthResponse { encoded } => {
                buf.extend_from_slice(encoded.as_bytes());
            }
            Self::MailFrom { from } => {
                buf.extend_from_slice(b"MAIL FROM: <");
                buf.extend_from_slice(from.as_bytes());
                buf.push(b'>');
            }
            Self::RcptTo { to } => {
                buf.extend_from_slice(b"RCPT TO: <");
                buf.extend_from_slice(to.as_bytes());
                buf.push(b'>');
            }
            Self::Data => {
                buf.extend_from_slice(b"DATA");
            }
            Self::Quit => {
                buf.extend_from_slice(b"QUIT");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

/// Encodes a credential's raw bytes with standard, padded base64.
#[must_use]
pub fn encode_credential(raw: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_helo_command() {
        let cmd = Command::Helo {
            hostname: "smtp.gmail.com".to_string(),
        };
        assert_eq!(cmd.serialize(), b"HELO smtp.gmail.com\r\n");
    }

    #[test]
    fn test_auth_login_command() {
        assert_eq!(Command::AuthLogin.serialize(), b"AUTH LOGIN\r\n");
    }

    #[test]
    fn test_credential_command() {
        let cmd = Command::credential("user@example.com");
        assert_eq!(cmd.serialize(), b"dXNlckBleGFtcGxlLmNvbQ==\r\n");
        assert!(cmd.is_sensitive());
    }

    #[test]
    fn test_mail_from_keeps_space() {
        let cmd = Command::MailFrom {
            from: "a@x.com".to_string(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM: <a@x.com>\r\n");
        assert!(!cmd.is_sensitive());
    }

    #[test]
    fn test_rcpt_to_keeps_space() {
        let cmd = Command::RcptTo {
            to: "b@y.com".to_string(),
        };
        assert_eq!(cmd.serialize(), b"RCPT TO: <b@y.com>\r\n");
    }

    #[test]
    fn test_data_command() {
        assert_eq!(Command::Data.serialize(), b"DATA\r\n");
    }

    #[test]
    fn test_quit_command() {
        assert_eq!(Command::Quit.serialize(), b"QUIT\r\n");
    }

    #[test]
    fn test_encode_credential_known_values() {
        assert_eq!(encode_credential("user@example.com"), "dXNlckBleGFtcGxlLmNvbQ==");
        assert_eq!(encode_credential("hunter2"), "aHVudGVyMg==");
        assert_eq!(encode_credential(""), "");
    }

    #[test]
    fn test_encode_credential_is_deterministic() {
        let first = encode_credential("user@example.com");
        let second = encode_credential("user@example.com");
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn credential_round_trips(raw in any::<String>()) {
            let encoded = encode_credential(&raw);
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .unwrap();
            prop_assert_eq!(decoded, raw.as_bytes());
        }

        #[test]
        fn credential_is_single_line(raw in any::<String>()) {
            let encoded = encode_credential(&raw);
            prop_assert!(!encoded.contains('\r'));
            prop_assert!(!encoded.contains('\n'));
        }
    }
}
