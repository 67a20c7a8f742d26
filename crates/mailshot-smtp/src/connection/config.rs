//! Connection configuration types.

use std::time::Duration;

/// Default submission server.
pub const DEFAULT_HOST: &str = "smtp.gmail.com";

/// Implicit TLS submission port.
pub const DEFAULT_PORT: u16 = 465;

/// Default limit for TCP connect plus TLS handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server hostname, also used as the TLS server name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Name announced in `HELO`.
    pub helo_name: String,
    /// Connection timeout. Replies themselves are never timed out.
    pub connect_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `host` with implicit TLS on port 465.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::builder(host).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(host)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

/// Builder for connection configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: u16,
    helo_name: Option<String>,
    connect_timeout: Duration,
}

impl ConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            helo_name: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the name sent in `HELO`. Defaults to the hostname.
    #[must_use]
    pub fn helo_name(mut self, name: impl Into<String>) -> Self {
        self.helo_name = Some(name.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            helo_name: self.helo_name.unwrap_or_else(|| self.host.clone()),
            host: self.host,
            port: self.port,
            connect_timeout: self.connect_timeout,
        }
    }
}
