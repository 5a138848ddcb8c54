//! Pairing handshake.
//!
//! The client sends one `register` frame under the reserved `reg0` id. The
//! TV answers `response` while its confirmation prompt is on screen, then
//! `registered` with the client key once the user accepts. A TV that already
//! knows the key skips straight to `registered`.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, to_value};
use tracing::info;

use crate::error::{Error, Result};
use crate::identifiers::CommandId;
use crate::protocol::{MessageKind, OutboundFrame, PairingPayload};
use crate::transport::correlator::{Handler, Signal};

use super::Session;

// ============================================================================
// PairingOptions
// ============================================================================

/// Per-connection pairing settings merged into the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingOptions {
    /// Ask the TV to prompt even for a known key.
    pub force_pairing: bool,
}

// ============================================================================
// Frame
// ============================================================================

/// Builds the `register` frame for the given client key.
///
/// A missing key is sent as an empty string.
///
/// # Errors
///
/// Returns [`Error::Json`] if the payload fails to serialize.
pub fn pairing_frame(options: PairingOptions, client_key: Option<&str>) -> Result<OutboundFrame> {
    let payload = PairingPayload {
        force_pairing: options.force_pairing,
        ..PairingPayload::new(client_key)
    };

    Ok(OutboundFrame::register(CommandId::register(), to_value(payload)?))
}

// ============================================================================
// Handler
// ============================================================================

/// Builds the handler that drives the pairing exchange.
///
/// - `response`: prompt pending, stays registered
/// - `registered`: stores the key and advances setup
/// - anything else: [`Error::Protocol`]
pub fn pairing_handler() -> Handler<Session> {
    Box::new(|session: &mut Session, kind: MessageKind, payload: Value| match kind {
        MessageKind::Response => {
            info!("Waiting for TV user response");
            Ok(Signal::Keep)
        }

        MessageKind::Registered => {
            let key = payload
                .get("client-key")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::protocol("registered message without client-key"))?;

            info!("Paired with TV");
            session.set_client_key(key);
            session.advance();
            Ok(Signal::Complete)
        }

        other => Err(Error::protocol(format!(
            "unexpected message during pairing: {other} {payload}"
        ))),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::session::{Effect, SetupStage, SetupStep};
    use crate::transport::correlator::{Correlator, Dispatch};

    /// Session that has already sent its pairing frame.
    fn registering_session(client_key: Option<&str>) -> Session {
        let mut session = Session::new(client_key.map(str::to_string));
        session.advance();
        assert_eq!(session.next_effect(), Some(Effect::Setup(SetupStep::Register)));
        session
    }

    #[test]
    fn test_frame_without_key() {
        let frame = pairing_frame(PairingOptions::default(), None).expect("frame");
        let value = serde_json::to_value(&frame).expect("serialize");

        assert_eq!(value["type"], json!("register"));
        assert_eq!(value["id"], json!("reg0"));
        assert_eq!(value["payload"]["client-key"], json!(""));
        assert_eq!(value["payload"]["pairingType"], json!("PROMPT"));
    }

    #[test]
    fn test_frame_with_options() {
        let options = PairingOptions { force_pairing: true };
        let frame = pairing_frame(options, Some("stored")).expect("frame");

        assert_eq!(frame.payload["client-key"], json!("stored"));
        assert_eq!(frame.payload["forcePairing"], json!(true));
        assert_eq!(frame.payload["pairingType"], json!("PROMPT"));
        assert_eq!(frame.payload["manifest"]["appVersion"], json!("1.1"));
    }

    #[test]
    fn test_prompt_then_registered() {
        let mut correlator = Correlator::new();
        let mut session = registering_session(None);
        correlator
            .register(CommandId::register(), pairing_handler())
            .expect("register");

        let outcome = correlator
            .dispatch(
                r#"{"type":"response","id":"reg0","payload":{"pairingType":"PROMPT","returnValue":true}}"#,
                &mut session,
            )
            .expect("prompt");
        assert_eq!(outcome, Dispatch::Kept);
        assert!(correlator.is_pending(&CommandId::register()));
        assert_eq!(session.stage(), SetupStage::Registering);
        assert_eq!(session.client_key(), None);

        let outcome = correlator
            .dispatch(
                r#"{"type":"registered","id":"reg0","payload":{"client-key":"XYZ"}}"#,
                &mut session,
            )
            .expect("registered");
        assert_eq!(outcome, Dispatch::Completed);
        assert!(!correlator.is_pending(&CommandId::register()));
        assert_eq!(session.client_key(), Some("XYZ"));
        assert_eq!(session.stage(), SetupStage::AwaitingPointer);

        assert_eq!(
            session.next_effect(),
            Some(Effect::Setup(SetupStep::RequestPointerSocket))
        );
        assert_eq!(session.next_effect(), None);
    }

    #[test]
    fn test_registered_replaces_stored_key() {
        let mut correlator = Correlator::new();
        let mut session = registering_session(Some("old"));
        correlator
            .register(CommandId::register(), pairing_handler())
            .expect("register");

        correlator
            .dispatch(
                r#"{"type":"registered","id":"reg0","payload":{"client-key":"new"}}"#,
                &mut session,
            )
            .expect("registered");
        assert_eq!(session.client_key(), Some("new"));
    }

    #[test]
    fn test_error_during_pairing() {
        let mut correlator = Correlator::new();
        let mut session = registering_session(None);
        correlator
            .register(CommandId::register(), pairing_handler())
            .expect("register");

        let err = correlator
            .dispatch(
                r#"{"type":"error","id":"reg0","error":"403 User rejected pairing"}"#,
                &mut session,
            )
            .unwrap_err();

        assert!(matches!(err, Error::Protocol { .. }));
        assert_eq!(session.stage(), SetupStage::Registering);
        assert!(!correlator.is_pending(&CommandId::register()));
    }

    #[test]
    fn test_registered_without_key() {
        let mut correlator = Correlator::new();
        let mut session = registering_session(None);
        correlator
            .register(CommandId::register(), pairing_handler())
            .expect("register");

        let err = correlator
            .dispatch(r#"{"type":"registered","id":"reg0","payload":{}}"#, &mut session)
            .unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
        assert_eq!(session.client_key(), None);
    }
}
