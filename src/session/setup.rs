//! Bootstrap sequencing.
//!
//! After the primary socket opens, the client walks a fixed sequence before
//! it hands a usable remote to the caller:
//!
//! ```text
//! Connected ──► Registering ──► AwaitingPointer ──► Ready
//!   (pair)       (pointer socket)   (notify caller)
//! ```
//!
//! Each [`SetupSequencer::advance`] moves one stage forward and returns the
//! work the new stage requires. Stages never repeat or go back.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::debug;

// ============================================================================
// SetupStage
// ============================================================================

/// Bootstrap progress marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetupStage {
    /// Primary socket open, nothing sent yet.
    Connected,
    /// Pairing frame sent, waiting for `registered`.
    Registering,
    /// Paired, opening the pointer socket.
    AwaitingPointer,
    /// Fully bootstrapped.
    Ready,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connected => "connected",
            Self::Registering => "registering",
            Self::AwaitingPointer => "awaiting-pointer",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SetupStep
// ============================================================================

/// Work triggered by entering a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Send the pairing frame.
    Register,
    /// Ask the TV for the pointer socket address.
    RequestPointerSocket,
    /// Tell the caller the remote is ready.
    NotifyReady,
}

// ============================================================================
// SetupSequencer
// ============================================================================

/// Monotonic stage counter for one connection.
#[derive(Debug, Clone)]
pub struct SetupSequencer {
    stage: SetupStage,
}

impl Default for SetupSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupSequencer {
    /// Creates a sequencer at [`SetupStage::Connected`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: SetupStage::Connected,
        }
    }

    /// Returns the current stage.
    #[inline]
    #[must_use]
    pub const fn stage(&self) -> SetupStage {
        self.stage
    }

    /// Returns `true` once the sequence has completed.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.stage == SetupStage::Ready
    }

    /// Moves to the next stage and returns its step.
    ///
    /// Returns `None` once [`SetupStage::Ready`] has been reached.
    pub fn advance(&mut self) -> Option<SetupStep> {
        let (next, step) = match self.stage {
            SetupStage::Connected => (SetupStage::Registering, SetupStep::Register),
            SetupStage::Registering => {
                (SetupStage::AwaitingPointer, SetupStep::RequestPointerSocket)
            }
            SetupStage::AwaitingPointer => (SetupStage::Ready, SetupStep::NotifyReady),
            SetupStage::Ready => return None,
        };

        debug!(from = %self.stage, to = %next, "Setup advanced");
        self.stage = next;
        Some(step)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut setup = SetupSequencer::new();
        assert_eq!(setup.stage(), SetupStage::Connected);

        assert_eq!(setup.advance(), Some(SetupStep::Register));
        assert_eq!(setup.stage(), SetupStage::Registering);

        assert_eq!(setup.advance(), Some(SetupStep::RequestPointerSocket));
        assert_eq!(setup.stage(), SetupStage::AwaitingPointer);

        assert_eq!(setup.advance(), Some(SetupStep::NotifyReady));
        assert!(setup.is_ready());
    }

    #[test]
    fn test_advance_past_ready_is_noop() {
        let mut setup = SetupSequencer::new();
        while setup.advance().is_some() {}

        assert_eq!(setup.advance(), None);
        assert_eq!(setup.advance(), None);
        assert_eq!(setup.stage(), SetupStage::Ready);
    }

    #[test]
    fn test_notify_ready_emitted_once() {
        let mut setup = SetupSequencer::new();
        let steps: Vec<_> = std::iter::from_fn(|| setup.advance()).collect();

        let notifications = steps
            .iter()
            .filter(|step| **step == SetupStep::NotifyReady)
            .count();
        assert_eq!(notifications, 1);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_stages_ordered() {
        assert!(SetupStage::Connected < SetupStage::Registering);
        assert!(SetupStage::Registering < SetupStage::AwaitingPointer);
        assert!(SetupStage::AwaitingPointer < SetupStage::Ready);
    }
}
