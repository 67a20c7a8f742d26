//! Async loop feeding transport events into a [`Session`].

use tracing::debug;

use super::session::{Action, Event, Session};
use crate::command::Command;
use crate::connection::{Inbound, Transport};
use crate::error::{Error, Result};
use crate::plan::Plan;

/// Runs `plan` over `transport` until the session ends.
///
/// Each inbound chunk is checked against the next step. On success every
/// outbound step has been written once and the transport is closed. On a
/// mismatched reply a best-effort `QUIT` is written before closing. The
/// transport is closed exactly once on every path.
///
/// There is no reply timeout: a silent server keeps this future pending.
///
/// # Errors
///
/// Returns [`Error::ProtocolMismatch`], [`Error::ConnectionClosed`],
/// [`Error::ProtocolExhausted`], or [`Error::Io`] if reading or writing fails.
pub async fn deliver<T: Transport>(mut transport: T, plan: &Plan, verbose: bool) -> Result<()> {
    let mut session = Session::new(plan);

    loop {
        let inbound = match transport.next_event().await {
            Ok(inbound) => inbound,
            Err(err) => return abort(&mut transport, err.into(), false, verbose).await,
        };

        let action = match &inbound {
            Inbound::Data(chunk) => {
                let text = String::from_utf8_lossy(chunk);
                verbose_event!(verbose, step = session.cursor(), reply = %text.trim_end(), "Received");
                session.handle(Event::Reply(chunk))
            }
            Inbound::Closed => {
                verbose_event!(verbose, step = session.cursor(), "Connection closed by server");
                session.handle(Event::Closed)
            }
        };

        match action {
            Action::Send {
                step,
                bytes,
                sensitive,
            } => {
                if sensitive {
                    verbose_event!(verbose, step, "Sending: <credential redacted>");
                } else {
                    let text = String::from_utf8_lossy(bytes);
                    verbose_event!(verbose, step, command = %text.trim_end(), "Sending");
                }
                if let Err(err) = transport.write(bytes).await {
                    return abort(&mut transport, err.into(), false, verbose).await;
                }
            }
            Action::Complete => {
                verbose_event!(verbose, "Message accepted, session complete");
                close(&mut transport).await;
                return Ok(());
            }
            Action::Abort { error, quit } => {
                return abort(&mut transport, error, quit, verbose).await;
            }
            // Unreachable while the loop returns on every terminal action
            Action::Ignore => {}
        }
    }
}

async fn abort<T: Transport>(
    transport: &mut T,
    error: Error,
    quit: bool,
    verbose: bool,
) -> Result<()> {
    verbose_event!(verbose, %error, "Session failed");
    if quit {
        if let Err(err) = transport.write(&Command::Quit.serialize()).await {
            debug!(%err, "QUIT after failure not delivered");
        }
    }
    close(transport).await;
    Err(error)
}

async fn close<T: Transport>(transport: &mut T) {
    if let Err(err) = transport.close().await {
        debug!(%err, "Closing connection failed");
    }
}
