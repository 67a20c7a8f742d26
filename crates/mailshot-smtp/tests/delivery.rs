//! Integration tests for a full submission session.
//!
//! These tests use `tokio_test` mock streams to play the server side, so
//! every byte the client writes is checked in order.

#![allow(clippy::unwrap_used)]

use chrono::DateTime;
use tokio_test::io::{Builder, Mock};

use mailshot_smtp::{Error, Message, Plan, ReplyCode, StreamTransport, deliver};

const PAYLOAD: &[u8] = b"Subject: Hi\r\n\
From: <a@x.com>\r\n\
To: <b@y.com>\r\n\
Date: Sun, 18 Oct 2026 09:30:00 +0000\r\n\
\r\n\
hello\r\n\
.\r\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mailshot_smtp=debug")
        .with_test_writer()
        .try_init();
}

fn plan() -> Plan {
    let date = DateTime::parse_from_rfc3339("2026-10-18T09:30:00+00:00").unwrap();
    let message = Message::new("a@x.com", "b@y.com", "Hi", "hello").with_date(date);
    Plan::submission("smtp.gmail.com", "secret", &message)
}

/// Server side of the session up to (not including) reply number `upto`.
fn script(upto: usize) -> Builder {
    let exchanges: [(&[u8], &[u8]); 9] = [
        (b"220 smtp.gmail.com ESMTP\r\n", b"HELO smtp.gmail.com\r\n"),
        (b"250 smtp.gmail.com at your service\r\n", b"AUTH LOGIN\r\n"),
        (b"334 VXNlcm5hbWU6\r\n", b"YUB4LmNvbQ==\r\n"),
        (b"334 UGFzc3dvcmQ6\r\n", b"c2VjcmV0\r\n"),
        (b"235 2.7.0 Accepted\r\n", b"MAIL FROM: <a@x.com>\r\n"),
        (b"250 2.1.0 OK\r\n", b"RCPT TO: <b@y.com>\r\n"),
        (b"250 2.1.5 OK\r\n", b"DATA\r\n"),
        (b"354 Go ahead\r\n", PAYLOAD),
        (b"250 2.0.0 OK queued\r\n", b"QUIT\r\n"),
    ];

    let mut builder = Builder::new();
    for (reply, command) in exchanges.iter().take(upto) {
        builder.read(reply).write(command);
    }
    builder
}

fn transport(mock: Mock) -> StreamTransport<Mock> {
    StreamTransport::new(mock)
}

#[tokio::test]
async fn test_full_session_succeeds() {
    init_tracing();
    let mock = script(9).read(b"221 2.0.0 closing connection\r\n").build();

    deliver(transport(mock), &plan(), true).await.unwrap();
}

#[tokio::test]
async fn test_rejected_sender_sends_quit() {
    let mock = script(5)
        .read(b"550 5.7.1 Sender address rejected\r\n")
        .write(b"QUIT\r\n")
        .build();

    let err = deliver(transport(mock), &plan(), false).await.unwrap_err();

    match &err {
        Error::ProtocolMismatch { expected, reply } => {
            assert_eq!(*expected, ReplyCode::OK);
            assert!(reply.starts_with("550 5.7.1"));
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
    assert_eq!(err.reply_code(), Some(ReplyCode::MAILBOX_UNAVAILABLE));
    assert!(err.to_string().contains("550"));
}

#[tokio::test]
async fn test_mail_from_requires_235() {
    let mock = script(4)
        .read(b"250 2.7.0 Accepted\r\n")
        .write(b"QUIT\r\n")
        .build();

    let err = deliver(transport(mock), &plan(), false).await.unwrap_err();

    assert!(matches!(
        err,
        Error::ProtocolMismatch { expected, .. } if expected == ReplyCode::AUTH_SUCCESSFUL
    ));
}

#[tokio::test]
async fn test_server_hangs_up_before_goodbye() {
    init_tracing();
    let mock = script(9).build();

    let err = deliver(transport(mock), &plan(), true).await.unwrap_err();

    assert!(matches!(err, Error::ConnectionClosed));
}

#[tokio::test]
async fn test_server_hangs_up_mid_session() {
    let mock = script(3).build();

    let err = deliver(transport(mock), &plan(), false).await.unwrap_err();

    assert!(matches!(err, Error::ConnectionClosed));
}

#[tokio::test]
async fn test_reset_is_io_error() {
    let mock = script(2)
        .read_error(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
        .build();

    let err = deliver(transport(mock), &plan(), false).await.unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}
