//! Request reply resolution.
//!
//! Turns the `(kind, payload)` pair delivered to a request handler into a
//! [`Reply`] or an error:
//!
//! | Kind | `returnValue` | Result |
//! |------|---------------|--------|
//! | `error` | - | [`Error::Remote`] |
//! | `response` | `true` or absent | [`Reply::Success`] |
//! | `response` | `false` | [`Reply::Rejected`], logged as a warning |
//! | anything else | - | [`Error::Protocol`] |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::protocol::MessageKind;
use crate::transport::correlator::{Handler, Signal};

// ============================================================================
// SoftRejection
// ============================================================================

/// The TV accepted the request at the transport level but declined it.
///
/// Not an error: it is a valid application-level outcome such as
/// "channel not available". Reported through the log, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftRejection {
    /// Full request URI.
    pub uri: String,
    /// Payload of the declining reply.
    pub payload: Value,
}

impl SoftRejection {
    /// Returns the TV's explanation, if it sent one.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.payload.get("errorText").and_then(Value::as_str)
    }
}

impl fmt::Display for SoftRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} declined: {reason}", self.uri),
            None => write!(f, "{} declined", self.uri),
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

/// Outcome of a request the TV answered with a `response`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `returnValue` was true; carries the full payload.
    Success(Value),
    /// `returnValue` was false.
    Rejected(SoftRejection),
}

impl Reply {
    /// Returns `true` for [`Reply::Success`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success payload, or `None` if the TV declined.
    #[inline]
    #[must_use]
    pub fn into_success(self) -> Option<Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Rejected(_) => None,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves a reply for the request sent to `uri`.
///
/// # Errors
///
/// - [`Error::Remote`] for `error` frames
/// - [`Error::Protocol`] for kinds other than `response`
pub fn resolve(uri: &str, kind: MessageKind, payload: Value) -> Result<Reply> {
    match kind {
        MessageKind::Error => {
            let message = match payload {
                Value::String(message) => message,
                other => other.to_string(),
            };
            Err(Error::remote(uri, message))
        }

        MessageKind::Response => {
            let accepted = payload
                .get("returnValue")
                .and_then(Value::as_bool)
                .unwrap_or(true);

            if accepted {
                debug!(%uri, "Request succeeded");
                Ok(Reply::Success(payload))
            } else {
                let rejection = SoftRejection {
                    uri: uri.to_string(),
                    payload,
                };
                warn!(%uri, reason = rejection.reason().unwrap_or_default(), "Request declined by TV");
                Ok(Reply::Rejected(rejection))
            }
        }

        other => Err(Error::protocol(format!(
            "unexpected message {other} in reply to {uri}"
        ))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Builds a one-shot handler that calls `on_success` with the payload of an
/// accepted reply.
///
/// Declined replies only produce a log entry. Remote and protocol errors are
/// returned to the dispatcher.
pub fn callback_handler<C, F>(uri: String, on_success: F) -> Handler<C>
where
    C: 'static,
    F: FnOnce(Value) + Send + 'static,
{
    let mut on_success = Some(on_success);
    Box::new(move |_: &mut C, kind: MessageKind, payload: Value| {
        if let Reply::Success(payload) = resolve(&uri, kind, payload)?
            && let Some(on_success) = on_success.take()
        {
            on_success(payload);
        }
        Ok(Signal::Complete)
    })
}

/// Builds a one-shot handler that forwards the resolved reply to a waiting
/// caller.
pub fn forwarding_handler<C: 'static>(
    uri: String,
    reply_tx: oneshot::Sender<Result<Reply>>,
) -> Handler<C> {
    let mut reply_tx = Some(reply_tx);
    Box::new(move |_: &mut C, kind: MessageKind, payload: Value| {
        let outcome = resolve(&uri, kind, payload);
        if let Some(tx) = reply_tx.take()
            && tx.send(outcome).is_err()
        {
            debug!(%uri, "Reply arrived after caller stopped waiting");
        }
        Ok(Signal::Complete)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    const URI: &str = "ssap://audio/volumeUp";

    #[test]
    fn test_success() {
        let reply = resolve(URI, MessageKind::Response, json!({"returnValue": true})).expect("ok");
        assert_eq!(reply, Reply::Success(json!({"returnValue": true})));
    }

    #[test]
    fn test_soft_rejection() {
        let payload = json!({"returnValue": false, "errorText": "channel not available"});
        let reply = resolve(URI, MessageKind::Response, payload.clone()).expect("ok");

        let Reply::Rejected(rejection) = reply else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.reason(), Some("channel not available"));
        assert_eq!(rejection.payload, payload);
        assert_eq!(
            rejection.to_string(),
            "ssap://audio/volumeUp declined: channel not available"
        );
    }

    #[test]
    fn test_missing_return_value_is_success() {
        let reply = resolve(URI, MessageKind::Response, json!({"volume": 3})).expect("ok");
        assert!(reply.is_success());
    }

    #[test]
    fn test_error_kind() {
        let err = resolve(URI, MessageKind::Error, json!("401 insufficient permissions")).unwrap_err();
        assert!(
            matches!(err, Error::Remote { ref uri, ref message } if uri == URI && message == "401 insufficient permissions")
        );
    }

    #[test]
    fn test_unexpected_kind() {
        let err = resolve(URI, MessageKind::Registered, json!({})).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[test]
    fn test_callback_handler_invoked_on_success() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mut handler: Handler<()> =
            callback_handler(URI.to_string(), move |payload| *sink.lock() = Some(payload));

        let signal = handler(&mut (), MessageKind::Response, json!({"returnValue": true}))
            .expect("handler");

        assert_eq!(signal, Signal::Complete);
        assert_eq!(*seen.lock(), Some(json!({"returnValue": true})));
    }

    #[test]
    fn test_callback_handler_skipped_on_rejection() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mut handler: Handler<()> =
            callback_handler(URI.to_string(), move |payload| *sink.lock() = Some(payload));

        let signal = handler(&mut (), MessageKind::Response, json!({"returnValue": false}))
            .expect("rejection is not an error");

        assert_eq!(signal, Signal::Complete);
        assert!(seen.lock().is_none());
    }

    #[test]
    fn test_callback_handler_propagates_remote_error() {
        let mut handler: Handler<()> = callback_handler(URI.to_string(), |_| {});
        let err = handler(&mut (), MessageKind::Error, json!("500 Application error")).unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_forwarding_handler() {
        let (tx, rx) = oneshot::channel();
        let mut handler: Handler<()> = forwarding_handler(URI.to_string(), tx);

        handler(&mut (), MessageKind::Error, json!("boom")).expect("forwarding never fails");

        let outcome = rx.await.expect("reply forwarded");
        assert!(matches!(outcome, Err(Error::Remote { .. })));
    }

    #[test]
    fn test_forwarding_handler_after_receiver_dropped() {
        let (tx, rx) = oneshot::channel();
        drop(rx);
        let mut handler: Handler<()> = forwarding_handler(URI.to_string(), tx);

        let signal = handler(&mut (), MessageKind::Response, json!({"returnValue": true}))
            .expect("late reply is absorbed");
        assert_eq!(signal, Signal::Complete);
    }
}
