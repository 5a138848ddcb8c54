//! Per-connection protocol state.
//!
//! A [`Session`] is the context every reply handler receives. It holds the
//! client key, the bootstrap stage, and a queue of [`Effect`]s that handlers
//! request but cannot perform themselves (sending frames, opening sockets).
//! The connection task drains that queue after each event.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `handshake` | Pairing frame and handler |
//! | `reply` | Request reply resolution |
//! | `setup` | Bootstrap stage sequencing |

// ============================================================================
// Submodules
// ============================================================================

/// Pairing handshake.
pub mod handshake;

/// Request reply resolution.
pub mod reply;

/// Bootstrap sequencing.
pub mod setup;

// ============================================================================
// Re-exports
// ============================================================================

pub use handshake::{PairingOptions, pairing_frame, pairing_handler};
pub use reply::{Reply, SoftRejection, callback_handler, forwarding_handler};
pub use setup::{SetupSequencer, SetupStage, SetupStep};

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::protocol::MessageKind;
use crate::transport::correlator::{Handler, Signal};

// ============================================================================
// Constants
// ============================================================================

/// Service returning the pointer socket address.
pub const POINTER_SOCKET_URI: &str = "com.webos.service.networkinput/getPointerInputSocket";

// ============================================================================
// Effect
// ============================================================================

/// Work queued for the connection task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Perform a bootstrap step.
    Setup(SetupStep),
    /// Open the pointer socket at this address.
    ConnectPointer(String),
}

// ============================================================================
// Session
// ============================================================================

/// Protocol state for one connection.
#[derive(Debug)]
pub struct Session {
    /// Current client key.
    client_key: Option<String>,
    /// Bootstrap progress.
    setup: SetupSequencer,
    /// Queued work.
    effects: VecDeque<Effect>,
}

impl Session {
    /// Creates a session for a freshly opened connection.
    #[must_use]
    pub fn new(client_key: Option<String>) -> Self {
        Self {
            client_key,
            setup: SetupSequencer::new(),
            effects: VecDeque::new(),
        }
    }

    /// Returns the client key, if one is known.
    #[inline]
    #[must_use]
    pub fn client_key(&self) -> Option<&str> {
        self.client_key.as_deref()
    }

    /// Stores the key issued by the TV.
    pub fn set_client_key(&mut self, key: impl Into<String>) {
        self.client_key = Some(key.into());
    }

    /// Returns the bootstrap stage.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> SetupStage {
        self.setup.stage()
    }

    /// Returns `true` until the bootstrap has reached [`SetupStage::Ready`].
    #[inline]
    #[must_use]
    pub fn is_bootstrapping(&self) -> bool {
        !self.setup.is_ready()
    }

    /// Advances the bootstrap and queues the resulting step.
    pub fn advance(&mut self) {
        if let Some(step) = self.setup.advance() {
            self.effects.push_back(Effect::Setup(step));
        }
    }

    /// Queues opening the pointer socket.
    pub fn connect_pointer(&mut self, address: impl Into<String>) {
        self.effects.push_back(Effect::ConnectPointer(address.into()));
    }

    /// Pops the next queued effect.
    #[inline]
    pub fn next_effect(&mut self) -> Option<Effect> {
        self.effects.pop_front()
    }
}

// ============================================================================
// Pointer Socket Handler
// ============================================================================

/// Builds the handler for the pointer socket request.
///
/// On success, queues [`Effect::ConnectPointer`] with the returned
/// `socketPath`.
pub fn pointer_socket_handler(uri: String) -> Handler<Session> {
    Box::new(move |session: &mut Session, kind: MessageKind, payload: Value| {
        let Reply::Success(payload) = reply::resolve(&uri, kind, payload)? else {
            return Err(Error::protocol("TV declined the pointer socket request"));
        };

        let address = payload
            .get("socketPath")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::protocol("pointer socket reply without socketPath"))?;

        debug!(%address, "Pointer socket address received");
        session.connect_pointer(address);
        Ok(Signal::Complete)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::CommandId;
    use crate::transport::correlator::Correlator;

    #[test]
    fn test_advance_queues_steps_in_order() {
        let mut session = Session::new(None);
        session.advance();
        session.advance();

        assert_eq!(session.next_effect(), Some(Effect::Setup(SetupStep::Register)));
        assert_eq!(
            session.next_effect(),
            Some(Effect::Setup(SetupStep::RequestPointerSocket))
        );
        assert_eq!(session.next_effect(), None);
    }

    #[test]
    fn test_pointer_socket_reply() {
        let mut correlator = Correlator::new();
        let mut session = Session::new(Some("key".to_string()));
        let id = correlator.next_id();
        correlator
            .register(id, pointer_socket_handler(format!("ssap://{POINTER_SOCKET_URI}")))
            .expect("register");

        correlator
            .dispatch(
                r#"{"type":"response","id":"101","payload":{"returnValue":true,"socketPath":"ws://10.0.0.2:3000/resources/abc/netinput.pointer.sock"}}"#,
                &mut session,
            )
            .expect("dispatch");

        assert_eq!(
            session.next_effect(),
            Some(Effect::ConnectPointer(
                "ws://10.0.0.2:3000/resources/abc/netinput.pointer.sock".to_string()
            ))
        );
    }

    #[test]
    fn test_pointer_socket_declined() {
        let mut correlator = Correlator::new();
        let mut session = Session::new(None);
        correlator
            .register(CommandId::from("101"), pointer_socket_handler("uri".to_string()))
            .expect("register");

        let err = correlator
            .dispatch(
                r#"{"type":"response","id":"101","payload":{"returnValue":false}}"#,
                &mut session,
            )
            .unwrap_err();

        assert!(matches!(err, Error::Protocol { .. }));
        assert_eq!(session.next_effect(), None);
    }

    #[test]
    fn test_is_bootstrapping() {
        let mut session = Session::new(None);
        assert!(session.is_bootstrapping());

        for _ in 0..3 {
            session.advance();
        }
        assert!(!session.is_bootstrapping());
        assert_eq!(session.stage(), SetupStage::Ready);
    }
}
