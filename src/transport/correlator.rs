//! Command/reply correlation.
//!
//! Maps outstanding [`CommandId`]s to the handler waiting for their reply
//! and routes every inbound primary-channel frame to it.
//!
//! The correlator is owned by a single task and never locked. Handlers
//! receive a mutable context `C` at dispatch time instead of capturing
//! shared state, so a handler can advance the session it belongs to.
//!
//! # Handler Lifetime
//!
//! | Handler returns | Entry |
//! |-----------------|-------|
//! | `Ok(Signal::Complete)` | removed |
//! | `Ok(Signal::Keep)` | stays registered for the next frame with this id |
//! | `Err(_)` | removed, error returned from [`Correlator::dispatch`] |

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde_json::{Value, from_str};
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{CommandId, CommandIdGenerator};
use crate::protocol::{InboundFrame, MessageKind};

// ============================================================================
// Types
// ============================================================================

/// What a handler asks the correlator to do with its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Remove the entry.
    Complete,
    /// Keep the entry for a later frame with the same id.
    Keep,
}

/// Pending reply handler.
///
/// Called with the dispatch context, the frame kind, and the frame body
/// (`error` field for error frames, `payload` otherwise).
pub type Handler<C> = Box<dyn FnMut(&mut C, MessageKind, Value) -> Result<Signal> + Send>;

/// Outcome of a dispatch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No handler was pending for the frame's id.
    Unmatched,
    /// A handler ran and was removed.
    Completed,
    /// A handler ran and stays registered.
    Kept,
}

// ============================================================================
// Correlator
// ============================================================================

/// Identifier source and pending handler map for one connection.
pub struct Correlator<C> {
    /// Fresh identifiers for requests.
    ids: CommandIdGenerator,
    /// Handlers waiting for a reply.
    pending: FxHashMap<CommandId, Handler<C>>,
}

impl<C> Default for Correlator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Correlator<C> {
    /// Creates an empty correlator with a fresh id counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: CommandIdGenerator::new(),
            pending: FxHashMap::default(),
        }
    }

    /// Returns a fresh command identifier.
    #[inline]
    pub fn next_id(&mut self) -> CommandId {
        self.ids.next_id()
    }

    /// Registers the handler for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCallback`] if a handler is already pending
    /// for `id`. The existing handler is left untouched.
    pub fn register(&mut self, id: CommandId, handler: Handler<C>) -> Result<()> {
        if self.pending.contains_key(&id) {
            return Err(Error::duplicate_callback(id));
        }

        trace!(%id, "Handler registered");
        self.pending.insert(id, handler);
        Ok(())
    }

    /// Drops the handler for `id` without invoking it.
    ///
    /// Used when the command never made it onto the wire.
    pub fn remove(&mut self, id: &CommandId) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Parses a raw frame and routes it to its handler.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the frame is not a valid envelope
    /// - any error returned by the handler
    pub fn dispatch(&mut self, raw: &str, ctx: &mut C) -> Result<Dispatch> {
        let frame: InboundFrame = from_str(raw)?;
        self.dispatch_frame(frame, ctx)
    }

    /// Routes an already parsed frame to its handler.
    ///
    /// Frames without an id, or with an id nobody waits for, are logged and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns any error produced by the handler.
    pub fn dispatch_frame(&mut self, frame: InboundFrame, ctx: &mut C) -> Result<Dispatch> {
        let Some(id) = frame.id.clone() else {
            warn!(kind = %frame.kind, "Message without id");
            return Ok(Dispatch::Unmatched);
        };

        let Some(mut handler) = self.pending.remove(&id) else {
            warn!(%id, kind = %frame.kind, "Message for unknown command");
            return Ok(Dispatch::Unmatched);
        };

        let (kind, body) = frame.into_parts();
        trace!(%id, %kind, "Dispatching message");

        match handler(ctx, kind, body)? {
            Signal::Complete => Ok(Dispatch::Completed),
            Signal::Keep => {
                self.pending.insert(id, handler);
                Ok(Dispatch::Kept)
            }
        }
    }

    /// Returns the number of pending handlers.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if a handler is pending for `id`.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, id: &CommandId) -> bool {
        self.pending.contains_key(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
