//! Primary connection and event loop.
//!
//! This module owns the primary WebSocket to the TV and everything that
//! must only be touched from one place: the [`Correlator`], the
//! [`Session`], and the pointer socket.
//!
//! # Event Loop
//!
//! [`Connection::open`] spawns a tokio task that handles:
//!
//! - Bootstrap: pairing, pointer socket, ready notification
//! - Incoming frames, routed through the correlator
//! - Commands from [`Connection`] handles, received over an `mpsc` channel
//!
//! Handles never touch protocol state directly. They enqueue commands and
//! read the snapshot the loop publishes ([`ConnectionState`], stage,
//! client key).
//!
//! The loop does not reconnect. When the socket closes or fails, the task
//! ends and every caller still waiting on a reply gets
//! [`Error::ConnectionClosed`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use serde_json::{Value, from_str, json, to_string};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::CommandId;
use crate::protocol::{InboundFrame, OutboundFrame, PointerCommand, ssap_uri};
use crate::session::{
    Effect, POINTER_SOCKET_URI, PairingOptions, Session, SetupStage, SetupStep, pairing_frame,
    pairing_handler, pointer_socket_handler,
};

use super::correlator::{Correlator, Handler};
use super::pointer::{PointerChannel, WsStream};

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of the primary socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Socket being opened.
    Connecting,
    /// Socket open.
    Open,
    /// Closed by either side.
    Closed,
    /// Ended by a transport error.
    Errored,
}

impl ConnectionState {
    /// Returns `true` for `Closed` and `Errored`.
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Shared
// ============================================================================

/// Snapshot written by the event loop and read by handles.
struct Shared {
    state: RwLock<ConnectionState>,
    stage: RwLock<SetupStage>,
    client_key: RwLock<Option<String>>,
    pointer_lost: RwLock<bool>,
}

impl Shared {
    fn new(client_key: Option<String>) -> Self {
        Self {
            state: RwLock::new(ConnectionState::Connecting),
            stage: RwLock::new(SetupStage::Connected),
            client_key: RwLock::new(client_key),
            pointer_lost: RwLock::new(false),
        }
    }
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a request and register its handler.
    Request {
        uri_suffix: String,
        payload: Value,
        handler: Handler<Session>,
    },
    /// Write to the pointer socket.
    Pointer(PointerCommand),
    /// Close the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to a bootstrapped TV connection.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone. Every method only
/// enqueues work for the event loop, so it can be called from any task or
/// thread.
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Snapshot published by the event loop.
    shared: Arc<Shared>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .field("stage", &self.stage())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Opens the primary socket and runs the bootstrap.
    ///
    /// Resolves once the connection is [`SetupStage::Ready`]. Pairing may
    /// wait on the user accepting the prompt on the TV; there is no timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if a socket cannot be opened
    /// - [`Error::Protocol`] if pairing or the pointer request goes wrong
    /// - [`Error::ConnectionClosed`] if the TV closes the socket first
    pub async fn open(url: &Url, client_key: Option<String>, options: PairingOptions) -> Result<Self> {
        info!(%url, "Connecting");

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::connection(format!("{url}: {e}")))?;

        info!("Connected. Registering");

        let shared = Arc::new(Shared::new(client_key.clone()));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (ws_write, ws_read) = ws_stream.split();

        let event_loop = EventLoop {
            correlator: Correlator::new(),
            session: Session::new(client_key),
            options,
            shared: Arc::clone(&shared),
            ws_write,
            pointer: None,
            ready_tx: Some(ready_tx),
        };
        tokio::spawn(event_loop.run(ws_read, command_rx));

        let connection = Self { command_tx, shared };
        ready_rx.await.map_err(|_| Error::ConnectionClosed)??;

        Ok(connection)
    }

    /// Sends `ssap://{uri_suffix}` and registers `handler` for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has ended.
    pub fn request(
        &self,
        uri_suffix: impl Into<String>,
        payload: Value,
        handler: Handler<Session>,
    ) -> Result<()> {
        self.command_tx
            .send(ConnectionCommand::Request {
                uri_suffix: uri_suffix.into(),
                payload,
                handler,
            })
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Writes a command to the pointer socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has ended.
    pub fn pointer(&self, command: PointerCommand) -> Result<()> {
        self.command_tx
            .send(ConnectionCommand::Pointer(command))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Returns the socket state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.read()
    }

    /// Returns the bootstrap stage.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> SetupStage {
        *self.shared.stage.read()
    }

    /// Returns the current client key.
    #[inline]
    #[must_use]
    pub fn client_key(&self) -> Option<String> {
        self.shared.client_key.read().clone()
    }

    /// Returns `true` once a pointer socket write has failed.
    ///
    /// Pointer commands are dropped from then on; requests keep working.
    #[inline]
    #[must_use]
    pub fn is_pointer_lost(&self) -> bool {
        *self.shared.pointer_lost.read()
    }

    /// Closes the connection.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }
}

// ============================================================================
// EventLoop
// ============================================================================

/// State owned by the connection task.
struct EventLoop {
    correlator: Correlator<Session>,
    session: Session,
    options: PairingOptions,
    shared: Arc<Shared>,
    ws_write: SplitSink<WsStream, Message>,
    pointer: Option<PointerChannel>,
    /// Taken when the bootstrap finishes or fails.
    ready_tx: Option<oneshot::Sender<Result<()>>>,
}

impl EventLoop {
    async fn run(
        mut self,
        mut ws_read: SplitStream<WsStream>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    ) {
        self.set_state(ConnectionState::Open);
        self.session.advance();
        self.drain_effects().await;

        loop {
            tokio::select! {
                // Incoming frames from the TV
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_incoming_message(&text);
                            self.drain_effects().await;
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by TV");
                            self.set_state(ConnectionState::Closed);
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            self.set_state(ConnectionState::Errored);
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            self.set_state(ConnectionState::Closed);
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from handles
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Request { uri_suffix, payload, handler }) => {
                            if let Err(e) = self.send_request(&uri_suffix, payload, handler).await {
                                warn!(uri = %ssap_uri(&uri_suffix), error = %e, "Request not sent");
                            }
                        }

                        Some(ConnectionCommand::Pointer(command)) => {
                            match self.pointer.as_mut() {
                                Some(pointer) => {
                                    pointer.send(&command).await;
                                    if pointer.is_lost() {
                                        *self.shared.pointer_lost.write() = true;
                                    }
                                }
                                None => warn!(?command, "Pointer socket not open"),
                            }
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = self.ws_write.close().await;
                            self.set_state(ConnectionState::Closed);
                            break;
                        }

                        None => {
                            debug!("All handles dropped");
                            let _ = self.ws_write.close().await;
                            self.set_state(ConnectionState::Closed);
                            break;
                        }
                    }
                }
            }
        }

        if let Some(pointer) = self.pointer.as_mut() {
            pointer.close().await;
        }

        if let Some(ready_tx) = self.ready_tx.take() {
            let _ = ready_tx.send(Err(Error::ConnectionClosed));
        }

        let abandoned = self.correlator.pending_count();
        if abandoned > 0 {
            debug!(abandoned, "Pending handlers dropped with connection");
        }

        debug!("Event loop terminated");
    }

    /// Routes an incoming text frame through the correlator.
    fn handle_incoming_message(&mut self, text: &str) {
        let frame = match from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse incoming message");
                return;
            }
        };

        if let Err(e) = self.correlator.dispatch_frame(frame, &mut self.session) {
            if self.session.is_bootstrapping() {
                self.fail_setup(e);
            } else {
                warn!(error = %e, "Reply handler failed");
            }
        }

        self.publish_session();
    }

    /// Performs every queued session effect.
    async fn drain_effects(&mut self) {
        while let Some(effect) = self.session.next_effect() {
            if let Err(e) = self.perform(effect).await {
                self.fail_setup(e);
            }
        }

        self.publish_session();
    }

    async fn perform(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::Setup(SetupStep::Register) => {
                let frame = pairing_frame(self.options, self.session.client_key())?;
                self.correlator.register(CommandId::register(), pairing_handler())?;
                if let Err(e) = self.write_frame(&frame).await {
                    self.correlator.remove(&frame.id);
                    return Err(e);
                }
                Ok(())
            }

            Effect::Setup(SetupStep::RequestPointerSocket) => {
                let handler = pointer_socket_handler(ssap_uri(POINTER_SOCKET_URI));
                self.send_request(POINTER_SOCKET_URI, json!({}), handler).await
            }

            Effect::Setup(SetupStep::NotifyReady) => {
                info!("Ready");
                if let Some(ready_tx) = self.ready_tx.take() {
                    let _ = ready_tx.send(Ok(()));
                }
                Ok(())
            }

            Effect::ConnectPointer(address) => {
                self.pointer = Some(PointerChannel::connect(&address).await?);
                self.session.advance();
                Ok(())
            }
        }
    }

    /// Registers `handler` under a fresh id and sends the request.
    async fn send_request(
        &mut self,
        uri_suffix: &str,
        payload: Value,
        handler: Handler<Session>,
    ) -> Result<()> {
        let id = self.correlator.next_id();
        let frame = OutboundFrame::request(id.clone(), uri_suffix, payload);

        // Register before sending so a fast reply is never unmatched.
        self.correlator.register(id.clone(), handler)?;

        if let Err(e) = self.write_frame(&frame).await {
            self.correlator.remove(&id);
            return Err(e);
        }

        debug!(%id, uri = ?frame.uri, "Request sent");
        Ok(())
    }

    async fn write_frame(&mut self, frame: &OutboundFrame) -> Result<()> {
        let json = to_string(frame)?;
        self.ws_write.send(Message::Text(json.into())).await?;
        trace!(id = %frame.id, "Frame written");
        Ok(())
    }

    /// Reports a bootstrap failure to the waiting caller.
    fn fail_setup(&mut self, err: Error) {
        match self.ready_tx.take() {
            Some(ready_tx) => {
                error!(error = %err, stage = %self.session.stage(), "Setup failed");
                let _ = ready_tx.send(Err(err));
            }
            None => warn!(error = %err, "Error after setup finished"),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        debug!(%state, "Connection state changed");
        *self.shared.state.write() = state;
    }

    /// Publishes stage and client key to handles.
    fn publish_session(&self) {
        *self.shared.stage.write() = self.session.stage();

        let mut client_key = self.shared.client_key.write();
        if client_key.as_deref() != self.session.client_key() {
            *client_key = self.session.client_key().map(str::to_string);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    #[test]
    fn test_terminal_states() {
        assert!(!ConnectionState::Connecting.is_terminal());
        assert!(!ConnectionState::Open.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Errored.is_terminal());
    }

    #[test]
    fn test_shared_defaults() {
        let shared = Shared::new(Some("key".to_string()));
        assert_eq!(*shared.state.read(), ConnectionState::Connecting);
        assert_eq!(*shared.stage.read(), SetupStage::Connected);
        assert_eq!(shared.client_key.read().as_deref(), Some("key"));
        assert!(!*shared.pointer_lost.read());
    }

    #[tokio::test]
    async fn test_open_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let url = Url::parse(&format!("ws://127.0.0.1:{port}")).expect("url");
        let result = Connection::open(&url, None, PairingOptions::default()).await;
        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[tokio::test]
    async fn test_close_before_ready() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream).await.expect("upgrade");
            // Read the register frame, then hang up.
            let _ = ws.next().await;
            let _ = ws.close(None).await;
        });

        let url = Url::parse(&format!("ws://127.0.0.1:{port}")).expect("url");
        let result = Connection::open(&url, None, PairingOptions::default()).await;
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }
}
