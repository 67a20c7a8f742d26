//! The reply-checking state machine.

use std::borrow::Cow;

use crate::error::Error;
use crate::plan::{Plan, Step};

/// Session state. The step cursor is data, not state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next reply.
    Running,
    /// The terminal step's reply arrived.
    Succeeded,
    /// A reply mismatched, the peer closed, or the plan ran out.
    Failed,
}

impl SessionState {
    /// Returns true for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Inbound event fed to [`Session::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// One reply chunk.
    Reply(&'a [u8]),
    /// The connection closed.
    Closed,
}

/// What the caller must do after a transition.
#[derive(Debug)]
pub enum Action<'p> {
    /// Write the next command and keep waiting.
    Send {
        /// Index of the step whose reply was accepted.
        step: usize,
        /// Bytes to write verbatim.
        bytes: &'p [u8],
        /// Whether `bytes` carries a credential.
        sensitive: bool,
    },
    /// The session succeeded; close the connection.
    Complete,
    /// The session failed; optionally send `QUIT`, then close.
    Abort {
        /// Failure to hand back to the caller.
        error: Error,
        /// Whether a best-effort `QUIT` should be written first.
        quit: bool,
    },
    /// The session is already over; nothing to do.
    Ignore,
}

/// One run over a [`Plan`].
///
/// The plan is only read; progress is a cursor that moves forward by one on
/// every reply. The state leaves [`SessionState::Running`] at most once.
#[derive(Debug, Clone)]
pub struct Session<'p> {
    plan: &'p Plan,
    cursor: usize,
    state: SessionState,
}

impl<'p> Session<'p> {
    /// Starts a session at the first step of `plan`.
    #[must_use]
    pub const fn new(plan: &'p Plan) -> Self {
        Self {
            plan,
            cursor: 0,
            state: SessionState::Running,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the step the next reply is checked against.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Step the next reply is checked against, if any remain.
    #[must_use]
    pub fn current_step(&self) -> Option<&'p Step> {
        self.plan.get(self.cursor)
    }

    /// Applies one inbound event.
    pub fn handle(&mut self, event: Event<'_>) -> Action<'p> {
        if self.state.is_terminal() {
            return Action::Ignore;
        }

        match event {
            Event::Reply(data) => self.on_reply(data),
            Event::Closed => self.fail(Error::ConnectionClosed, false),
        }
    }

    fn on_reply(&mut self, data: &[u8]) -> Action<'p> {
        let Some(step) = self.current_step() else {
            return self.fail(Error::ProtocolExhausted, false);
        };
        let index = self.cursor;
        self.cursor += 1;

        let reply = String::from_utf8_lossy(data);
        if !step.expected().prefixes(&reply) {
            let error = Error::ProtocolMismatch {
                expected: step.expected(),
                reply: Cow::into_owned(reply),
            };
            return self.fail(error, true);
        }

        match step.outbound() {
            Some(bytes) => Action::Send {
                step: index,
                bytes,
                sensitive: step.is_sensitive(),
            },
            None => {
                self.state = SessionState::Succeeded;
                Action::Complete
            }
        }
    }

    fn fail(&mut self, error: Error, quit: bool) -> Action<'p> {
        self.state = SessionState::Failed;
        Action::Abort { error, quit }
    }
}
