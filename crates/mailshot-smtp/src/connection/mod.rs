//! Connection boundary: the [`Transport`] trait and its TLS implementation.

mod config;
mod stream;

pub use config::{
    Config, ConfigBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT,
};
pub use stream::{StreamTransport, TlsTransport, connect_tls};

use bytes::Bytes;
use std::future::Future;
use std::io;

/// One inbound event from the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A chunk of bytes, assumed to hold exactly one complete reply.
    Data(Bytes),
    /// The peer closed the connection.
    Closed,
}

/// Duplex byte stream the protocol driver talks through.
///
/// The stream is already connected and secured when handed over; the driver
/// only writes commands, waits for the next [`Inbound`] event, and closes it.
pub trait Transport {
    /// Writes `data` in full.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Waits for the next chunk or the close notification.
    fn next_event(&mut self) -> impl Future<Output = io::Result<Inbound>> + Send;

    /// Closes the connection.
    fn close(&mut self) -> impl Future<Output = io::Result<()>> + Send;
}

impl<T: Transport> Transport for &mut T {
    fn write(&mut self, data: &[u8]) -> impl Future<Output = io::Result<()>> + Send {
        (**self).write(data)
    }

    fn next_event(&mut self) -> impl Future<Output = io::Result<Inbound>> + Send {
        (**self).next_event()
    }

    fn close(&mut self) -> impl Future<Output = io::Result<()>> + Send {
        (**self).close()
    }
}
