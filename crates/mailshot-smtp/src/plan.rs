//! The fixed command plan for one submission.
//!
//! A [`Plan`] is built once, before connecting, and never changes. Each
//! [`Step`] names the reply code that must arrive next and what to write once
//! it does. The last step writes nothing; its reply ends the session.

use bytes::Bytes;

use crate::command::Command;
use crate::message::Message;
use crate::types::ReplyCode;

/// One reply/command pair of a [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    expected: ReplyCode,
    outbound: Option<Bytes>,
    sensitive: bool,
}

impl Step {
    /// Step that writes `command` once a reply starting with `expected` arrives.
    #[must_use]
    pub fn command(expected: ReplyCode, command: &Command) -> Self {
        Self {
            expected,
            outbound: Some(Bytes::from(command.serialize())),
            sensitive: command.is_sensitive(),
        }
    }

    /// Step that writes raw bytes once a reply starting with `expected` arrives.
    #[must_use]
    pub fn raw(expected: ReplyCode, outbound: impl Into<Bytes>) -> Self {
        Self {
            expected,
            outbound: Some(outbound.into()),
            sensitive: false,
        }
    }

    /// Terminal step: a reply starting with `expected` completes the session.
    #[must_use]
    pub const fn finish(expected: ReplyCode) -> Self {
        Self {
            expected,
            outbound: None,
            sensitive: false,
        }
    }

    /// Reply code this step waits for.
    #[must_use]
    pub const fn expected(&self) -> ReplyCode {
        self.expected
    }

    /// Bytes to write after a matching reply, `None` for the terminal step.
    #[must_use]
    pub fn outbound(&self) -> Option<&[u8]> {
        self.outbound.as_deref()
    }

    /// Returns true if this is the terminal step.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.outbound.is_none()
    }

    /// Returns true if the outbound bytes must not be logged.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

/// Ordered, immutable sequence of [`Step`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    /// Builds the ten-step LOGIN submission plan.
    ///
    /// ```text
    /// 220 -> HELO <server_name>
    /// 250 -> AUTH LOGIN
    /// 334 -> base64(sender)
    /// 334 -> base64(password)
    /// 235 -> MAIL FROM: <sender>
    /// 250 -> RCPT TO: <recipient>
    /// 250 -> DATA
    /// 354 -> message payload
    /// 250 -> QUIT
    /// 221 -> (done)
    /// ```
    ///
    /// The sender and recipient come from `message`.
    #[must_use]
    pub fn submission(server_name: &str, password: &str, message: &Message) -> Self {
        let steps = vec![
            Step::command(
                ReplyCode::SERVICE_READY,
                &Command::Helo {
                    hostname: server_name.to_string(),
                },
            ),
            Step::command(ReplyCode::OK, &Command::AuthLogin),
            Step::command(ReplyCode::AUTH_CONTINUE, &Command::credential(&message.from)),
            Step::command(ReplyCode::AUTH_CONTINUE, &Command::credential(password)),
            Step::command(
                ReplyCode::AUTH_SUCCESSFUL,
                &Command::MailFrom {
                    from: message.from.clone(),
                },
            ),
            Step::command(
                ReplyCode::OK,
                &Command::RcptTo {
                    to: message.to.clone(),
                },
            ),
            Step::command(ReplyCode::OK, &Command::Data),
            Step::raw(ReplyCode::START_DATA, message.to_payload()),
            Step::command(ReplyCode::OK, &Command::Quit),
            Step::finish(ReplyCode::CLOSING),
        ];

        Self { steps }
    }

    /// Builds a plan from arbitrary steps.
    #[must_use]
    pub const fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Returns the step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Number of steps that write something.
    #[must_use]
    pub fn outbound_count(&self) -> usize {
        self.steps.iter().filter(|step| !step.is_terminal()).count()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
