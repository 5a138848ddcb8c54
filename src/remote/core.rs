//! Remote handle.
//!
//! A [`Remote`] is a connected, paired TV with an open pointer socket. It is
//! cheap to clone; every clone drives the same connection.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::{PointerCommand, ssap_uri};
use crate::session::{PairingOptions, Reply, SetupStage, callback_handler, forwarding_handler};
use crate::transport::{Connection, ConnectionState};

use super::builder::RemoteBuilder;
use super::button::Button;

// ============================================================================
// Remote
// ============================================================================

/// Connected TV remote.
///
/// # Example
///
/// ```no_run
/// use lgtv_remote::{Button, Remote};
///
/// # async fn example() -> lgtv_remote::Result<()> {
/// let remote = Remote::connect("192.168.1.40", None).await?;
/// println!("Store this key: {:?}", remote.client_key());
///
/// remote.volume_up().await?;
/// remote.press(Button::Home)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Remote {
    connection: Connection,
}

// ============================================================================
// Remote - Connection
// ============================================================================

impl Remote {
    /// Creates a builder for custom connection settings.
    #[inline]
    #[must_use]
    pub fn builder() -> RemoteBuilder {
        RemoteBuilder::new()
    }

    /// Connects to the TV at `address` on the default port.
    ///
    /// Resolves once pairing has finished and the pointer socket is open.
    /// Without `client_key` the TV shows a prompt and this waits, with no
    /// timeout, until the user answers.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] or [`Error::Url`] for a bad address
    /// - [`Error::Connection`] if a socket cannot be opened
    /// - [`Error::Protocol`] if the TV rejects pairing or the pointer request
    /// - [`Error::ConnectionClosed`] if the TV hangs up during setup
    pub async fn connect(address: impl Into<String>, client_key: Option<String>) -> Result<Self> {
        Self::builder()
            .address(address)
            .client_key(client_key)
            .connect()
            .await
    }

    /// Opens a connection to an assembled URL.
    pub(crate) async fn open(
        url: &Url,
        client_key: Option<String>,
        options: PairingOptions,
    ) -> Result<Self> {
        let connection = Connection::open(url, client_key, options).await?;
        Ok(Self { connection })
    }

    /// Returns the client key.
    ///
    /// After a first pairing this is the key the TV issued; store it and
    /// pass it to the next [`Remote::connect`] to skip the prompt.
    #[inline]
    #[must_use]
    pub fn client_key(&self) -> Option<String> {
        self.connection.client_key()
    }

    /// Returns the socket state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Returns the bootstrap stage.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> SetupStage {
        self.connection.stage()
    }

    /// Returns `true` once the pointer socket has failed.
    ///
    /// Button and pointer commands are then dropped; requests are unaffected.
    #[inline]
    #[must_use]
    pub fn is_pointer_lost(&self) -> bool {
        self.connection.is_pointer_lost()
    }

    /// Closes both sockets.
    ///
    /// Callers still waiting on a reply get [`Error::ConnectionClosed`].
    pub fn close(&self) {
        debug!("Closing remote");
        self.connection.shutdown();
    }
}

// ============================================================================
// Remote - Requests
// ============================================================================

impl Remote {
    /// Sends `ssap://{uri_suffix}` and waits for the reply.
    ///
    /// A reply with `returnValue: false` is not an error: it comes back as
    /// [`Reply::Rejected`] and is logged as a warning.
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if the TV answers with an error
    /// - [`Error::Protocol`] for an unexpected reply kind
    /// - [`Error::ConnectionClosed`] if the connection ends first
    pub async fn request(&self, uri_suffix: &str, payload: Value) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let handler = forwarding_handler(ssap_uri(uri_suffix), reply_tx);
        self.connection.request(uri_suffix, payload, handler)?;

        reply_rx.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Sends a request and returns without waiting.
    ///
    /// `on_success` runs on the connection task with the reply payload if
    /// the TV accepts. Declined requests and errors are only logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn request_with<F>(&self, uri_suffix: &str, payload: Value, on_success: F) -> Result<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let handler = callback_handler(ssap_uri(uri_suffix), on_success);
        self.connection.request(uri_suffix, payload, handler)
    }

    /// Like [`Remote::request`], giving up after `deadline`.
    ///
    /// The request stays registered on the connection; a reply arriving
    /// after the deadline is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestTimeout`] when the deadline expires, or any
    /// error [`Remote::request`] returns.
    pub async fn request_within(
        &self,
        uri_suffix: &str,
        payload: Value,
        deadline: Duration,
    ) -> Result<Reply> {
        let uri = ssap_uri(uri_suffix);
        let (reply_tx, reply_rx) = oneshot::channel();
        let handler = forwarding_handler(uri.clone(), reply_tx);
        self.connection.request(uri_suffix, payload, handler)?;

        match tokio::time::timeout(deadline, reply_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
                Err(Error::request_timeout(uri, timeout_ms))
            }
        }
    }
}

// ============================================================================
// Remote - Pointer
// ============================================================================

impl Remote {
    /// Presses a button by name, e.g. `"UP"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn button(&self, name: impl Into<String>) -> Result<()> {
        self.connection.pointer(PointerCommand::button(name))
    }

    /// Presses a well-known button.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn press(&self, button: Button) -> Result<()> {
        self.button(button.as_str())
    }

    /// Clicks at the pointer position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn click(&self) -> Result<()> {
        self.connection.pointer(PointerCommand::Click)
    }

    /// Moves the pointer by a relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn move_pointer(&self, dx: i32, dy: i32) -> Result<()> {
        self.connection.pointer(PointerCommand::Move { dx, dy })
    }

    /// Scrolls by a relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection has ended.
    pub fn scroll(&self, dx: i32, dy: i32) -> Result<()> {
        self.connection.pointer(PointerCommand::Scroll { dx, dy })
    }
}

// ============================================================================
// Tests
// ============================================================================
