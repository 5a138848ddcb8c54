//! Pointer socket.
//!
//! Secondary WebSocket carrying button, click, and pointer motion events in
//! the line format of [`PointerCommand`]. Writes are fire-and-forget: the
//! TV never answers, and a broken pointer socket only disables pointer
//! input. The primary channel keeps working.

// ============================================================================
// Imports
// ============================================================================

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::PointerCommand;

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// PointerChannel
// ============================================================================

/// Write half of the pointer socket.
pub struct PointerChannel {
    /// Outgoing frames.
    sink: SplitSink<WsStream, Message>,
    /// Set after the first failed write.
    lost: bool,
}

impl PointerChannel {
    /// Opens the pointer socket at `address`.
    ///
    /// Inbound traffic is drained by a background task so control frames
    /// keep flowing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the socket cannot be opened.
    pub async fn connect(address: &str) -> Result<Self> {
        let (ws_stream, _) = connect_async(address)
            .await
            .map_err(|e| Error::connection(format!("pointer socket {address}: {e}")))?;

        info!(%address, "Pointer socket open");

        let (sink, mut stream) = ws_stream.split();
        tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Close(_)) => break,
                    Err(e) => {
                        warn!(error = %e, "Pointer socket error");
                        break;
                    }
                    Ok(_) => {}
                }
            }
            debug!("Pointer socket reader finished");
        });

        Ok(Self { sink, lost: false })
    }

    /// Returns `true` once a write has failed.
    #[inline]
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Writes one command.
    ///
    /// Failures are logged and mark the channel lost; later commands are
    /// dropped.
    pub async fn send(&mut self, command: &PointerCommand) {
        if self.lost {
            warn!(?command, "Pointer socket lost, dropping command");
            return;
        }

        match self.sink.send(Message::Text(command.encode().into())).await {
            Ok(()) => trace!(?command, "Pointer command sent"),
            Err(e) => {
                warn!(error = %e, "Pointer socket write failed");
                self.lost = true;
            }
        }
    }

    /// Closes the socket.
    pub async fn close(&mut self) {
        if let Err(e) = self.sink.close().await {
            debug!(error = %e, "Pointer socket close failed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let result = PointerChannel::connect(&format!("ws://127.0.0.1:{port}")).await;
        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[tokio::test]
    async fn test_writes_line_protocol() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream).await.expect("upgrade");
            let mut received = Vec::new();
            while received.len() < 2 {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => received.push(text.to_string()),
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
            received
        });

        let mut pointer = PointerChannel::connect(&format!("ws://127.0.0.1:{port}"))
            .await
            .expect("connect");
        pointer.send(&PointerCommand::button("UP")).await;
        pointer.send(&PointerCommand::Click).await;
        assert!(!pointer.is_lost());

        let received = server.await.expect("server");
        assert_eq!(received, vec!["type:button\nname:UP\n\n", "type:click\n\n"]);
    }

    #[tokio::test]
    async fn test_lost_after_peer_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream).await.expect("upgrade");
            let _ = ws.close(None).await;
            while ws.next().await.is_some() {}
        });

        let mut pointer = PointerChannel::connect(&format!("ws://127.0.0.1:{port}"))
            .await
            .expect("connect");

        for _ in 0..50 {
            pointer.send(&PointerCommand::button("UP")).await;
            if pointer.is_lost() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(pointer.is_lost());

        // Later commands are dropped without touching the socket.
        pointer.send(&PointerCommand::Click).await;
        assert!(pointer.is_lost());
    }
}
