//! Builder pattern for remote configuration.
//!
//! Provides a fluent API for configuring and connecting a [`Remote`].
//!
//! # Example
//!
//! ```no_run
//! use lgtv_remote::Remote;
//!
//! # async fn example() -> lgtv_remote::Result<()> {
//! let remote = Remote::builder()
//!     .address("192.168.1.40")
//!     .client_key(Some("stored-key".to_string()))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};
use crate::session::PairingOptions;

use super::core::Remote;

// ============================================================================
// Constants
// ============================================================================

/// Port of the TV's plain WebSocket endpoint.
pub const DEFAULT_PORT: u16 = 3000;

// ============================================================================
// RemoteBuilder
// ============================================================================

/// Builder for configuring a [`Remote`] connection.
///
/// Use [`Remote::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct RemoteBuilder {
    /// TV host name, IP address, or full `ws://` URL.
    address: Option<String>,
    /// Port used when `address` is a bare host.
    port: u16,
    /// Key from an earlier pairing.
    client_key: Option<String>,
    /// Pairing settings.
    options: PairingOptions,
}

impl Default for RemoteBuilder {
    fn default() -> Self {
        Self {
            address: None,
            port: DEFAULT_PORT,
            client_key: None,
            options: PairingOptions::default(),
        }
    }
}

// ============================================================================
// RemoteBuilder Implementation
// ============================================================================

impl RemoteBuilder {
    /// Creates a new builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TV address.
    ///
    /// Accepts a host name, an IPv4 or IPv6 address, or a complete
    /// `ws://`/`wss://` URL, which is used as is.
    #[inline]
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the port. Defaults to [`DEFAULT_PORT`].
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the client key from an earlier pairing.
    ///
    /// Without a key the TV shows a pairing prompt.
    #[inline]
    #[must_use]
    pub fn client_key(mut self, client_key: Option<String>) -> Self {
        self.client_key = client_key;
        self
    }

    /// Asks the TV to prompt even when it already knows the key.
    #[inline]
    #[must_use]
    pub fn force_pairing(mut self, force: bool) -> Self {
        self.options.force_pairing = force;
        self
    }

    /// Connects and waits until the remote is ready.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no address is set
    /// - [`Error::Url`] if the address does not form a valid URL
    /// - any error from the bootstrap, see [`Remote::connect`]
    pub async fn connect(self) -> Result<Remote> {
        let url = self.url()?;
        Remote::open(&url, self.client_key, self.options).await
    }
}

// ============================================================================
// Validation
// ============================================================================

impl RemoteBuilder {
    /// Assembles the primary socket URL.
    fn url(&self) -> Result<Url> {
        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .ok_or_else(|| {
                Error::config(
                    "TV address is required. Use .address() to set it.\n\
                     Example: Remote::builder().address(\"192.168.1.40\")",
                )
            })?;

        if address.starts_with("ws://") || address.starts_with("wss://") {
            return Ok(Url::parse(address)?);
        }

        let host = if address.contains(':') && !address.starts_with('[') {
            format!("[{address}]")
        } else {
            address.to_string()
        };

        Ok(Url::parse(&format!("ws://{host}:{}", self.port))?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_defaults() {
        let builder = RemoteBuilder::new();
        assert!(builder.address.is_none());
        assert_eq!(builder.port, DEFAULT_PORT);
        assert!(builder.client_key.is_none());
        assert_eq!(builder.options, PairingOptions::default());
    }

    #[test]
    fn test_url_from_host() {
        let url = RemoteBuilder::new().address("192.168.1.40").url().expect("url");
        assert_eq!(url.as_str(), "ws://192.168.1.40:3000/");
    }

    #[test]
    fn test_url_custom_port() {
        let url = RemoteBuilder::new()
            .address("lgwebostv.local")
            .port(3001)
            .url()
            .expect("url");
        assert_eq!(url.host_str(), Some("lgwebostv.local"));
        assert_eq!(url.port(), Some(3001));
    }

    #[test]
    fn test_url_ipv6() {
        let url = RemoteBuilder::new().address("fe80::1").url().expect("url");
        assert_eq!(url.as_str(), "ws://[fe80::1]:3000/");
    }

    #[test]
    fn test_url_verbatim() {
        let url = RemoteBuilder::new()
            .address("ws://10.0.0.2:3333")
            .port(1)
            .url()
            .expect("url");
        assert_eq!(url.port(), Some(3333));
    }

    #[test]
    fn test_missing_address() {
        let err = RemoteBuilder::new().url().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn test_blank_address() {
        let err = RemoteBuilder::new().address("  ").url().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_address() {
        let err = RemoteBuilder::new().address("bad host").url().unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_pairing_settings() {
        let builder = RemoteBuilder::new()
            .force_pairing(true)
            .client_key(Some("key".to_string()));

        assert!(builder.options.force_pairing);
        assert_eq!(builder.client_key.as_deref(), Some("key"));
    }

    #[tokio::test]
    async fn test_connect_fails_without_address() {
        let result = RemoteBuilder::new().connect().await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
