//! Byte-stream transport and the implicit TLS connector.

use std::io;
use std::sync::Arc;

use bytes::BytesMut;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::{
    TlsConnector,
    client::TlsStream,
    rustls::{ClientConfig, RootCertStore},
};

use super::{Config, Inbound, Transport};
use crate::error::{Error, Result};

/// Capacity reserved before each read.
const READ_CHUNK: usize = 8192;

/// [`Transport`] over any tokio duplex stream.
///
/// Every successful read becomes one [`Inbound::Data`] chunk, exactly as the
/// stream delivered it. No line framing is applied.
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: S,
    buffer: BytesMut,
}

impl<S> StreamTransport<S> {
    /// Wraps an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }

    async fn next_event(&mut self) -> io::Result<Inbound> {
        self.buffer.reserve(READ_CHUNK);
        let read = self.stream.read_buf(&mut self.buffer).await?;
        if read == 0 {
            return Ok(Inbound::Closed);
        }
        Ok(Inbound::Data(self.buffer.split().freeze()))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

/// Connected implicit-TLS transport.
pub type TlsTransport = StreamTransport<TlsStream<TcpStream>>;

/// Connects to `config.host:config.port` and completes the TLS handshake.
///
/// # Errors
///
/// Returns an error if the hostname is not a valid server name, the
/// connection or handshake fails, or both together exceed
/// `config.connect_timeout`.
pub async fn connect_tls(config: &Config) -> Result<TlsTransport> {
    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|_| Error::InvalidHostname(config.host.clone()))?;
    let connector = create_tls_connector();

    let handshake = async {
        let tcp_stream = TcpStream::connect((config.host.as_str(), config.port)).await?;
        connector.connect(server_name, tcp_stream).await
    };

    let tls_stream: TlsStream<TcpStream> = tokio::time::timeout(config.connect_timeout, handshake)
        .await
        .map_err(|_| Error::ConnectTimeout(config.connect_timeout))??;

    tracing::debug!(host = %config.host, port = config.port, "TLS connection established");
    Ok(StreamTransport::new(tls_stream))
}

/// Creates a TLS connector with the webpki root certificates.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
