//! One-call email submission.

use crate::connection::{Config, Transport, connect_tls};
use crate::driver::deliver;
use crate::error::Result;
use crate::message::Message;
use crate::plan::Plan;

/// Everything needed to send one email.
#[derive(Clone, PartialEq, Eq)]
pub struct Mail {
    /// Login name and sender address.
    pub sender: String,
    /// Password for `sender`.
    pub password: String,
    /// Single recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Raise per-step session events to `info` level.
    pub verbose: bool,
}

impl Mail {
    /// Creates a mail with an empty subject and body.
    #[must_use]
    pub fn new(
        sender: impl Into<String>,
        password: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            password: password.into(),
            recipient: recipient.into(),
            subject: String::new(),
            body: String::new(),
            verbose: false,
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Enables or disables verbose session logging.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the DATA payload, dated now.
    #[must_use]
    pub fn message(&self) -> Message {
        Message::new(&self.sender, &self.recipient, &self.subject, &self.body)
    }

    /// Builds the submission plan, dated now.
    #[must_use]
    pub fn plan(&self, helo_name: &str) -> Plan {
        Plan::submission(helo_name, &self.password, &self.message())
    }
}

impl std::fmt::Debug for Mail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mail")
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .field("body_len", &self.body.len())
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Connects to the configured server over implicit TLS and sends `mail`.
///
/// The plan (including the `Date` header) is built before connecting.
///
/// # Errors
///
/// Returns an error if connecting fails or any reply deviates from the plan.
/// See [`deliver`] for the session errors.
pub async fn send_mail(config: &Config, mail: &Mail) -> Result<()> {
    let plan = mail.plan(&config.helo_name);
    let transport = connect_tls(config).await?;
    verbose_event!(mail.verbose, host = %config.host, port = config.port, "Socket connected");
    deliver(transport, &plan, mail.verbose).await
}

/// Sends `mail` over an already-connected transport.
///
/// # Errors
///
/// See [`deliver`].
pub async fn send_mail_over<T: Transport>(transport: T, helo_name: &str, mail: &Mail) -> Result<()> {
    let plan = mail.plan(helo_name);
    deliver(transport, &plan, mail.verbose).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connection::StreamTransport;
    use crate::error::Error;
    use crate::types::ReplyCode;
    use tokio_test::io::Builder;

    fn mail() -> Mail {
        Mail::new("a@x.com", "secret", "b@y.com")
            .subject("Hi")
            .body("hello")
    }

    #[test]
    fn test_builder() {
        let mail = mail().verbose(true);
        assert_eq!(mail.sender, "a@x.com");
        assert_eq!(mail.recipient, "b@y.com");
        assert_eq!(mail.subject, "Hi");
        assert_eq!(mail.body, "hello");
        assert!(mail.verbose);
    }

    #[test]
    fn test_debug_redacts_password() {
        let text = format!("{:?}", mail());
        assert!(text.contains("<redacted>"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_plan_uses_mail_fields() {
        let plan = mail().plan("smtp.gmail.com");
        assert_eq!(plan.len(), 10);
        assert_eq!(
            plan.get(4).unwrap().outbound(),
            Some(&b"MAIL FROM: <a@x.com>\r\n"[..])
        );
        assert_eq!(
            plan.get(5).unwrap().outbound(),
            Some(&b"RCPT TO: <b@y.com>\r\n"[..])
        );
        let payload = String::from_utf8_lossy(plan.get(7).unwrap().outbound().unwrap()).into_owned();
        assert!(payload.starts_with("Subject: Hi\r\nFrom: <a@x.com>\r\nTo: <b@y.com>\r\nDate: "));
        assert!(payload.ends_with("\r\n\r\nhello\r\n.\r\n"));
    }

    #[tokio::test]
    async fn test_send_over_rejected_greeting() {
        let mock = Builder::new()
            .read(b"421 too busy\r\n")
            .write(b"QUIT\r\n")
            .build();

        let err = send_mail_over(StreamTransport::new(mock), "smtp.gmail.com", &mail())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::ProtocolMismatch { expected, .. } if expected == ReplyCode::SERVICE_READY
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_send_over_wrong_password() {
        let mock = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"HELO smtp.gmail.com\r\n")
            .read(b"250 hi\r\n")
            .write(b"AUTH LOGIN\r\n")
            .read(b"334 VXNlcm5hbWU6\r\n")
            .write(b"YUB4LmNvbQ==\r\n")
            .read(b"334 UGFzc3dvcmQ6\r\n")
            .write(b"c2VjcmV0\r\n")
            .read(b"535 5.7.8 Username and Password not accepted\r\n")
            .write(b"QUIT\r\n")
            .build();

        let err = send_mail_over(StreamTransport::new(mock), "smtp.gmail.com", &mail())
            .await
            .unwrap_err();

        assert_eq!(err.reply_code(), Some(ReplyCode::AUTH_FAILED));
        assert!(err.to_string().contains("Username and Password not accepted"));
    }
}
