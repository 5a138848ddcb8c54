//! Type-safe identifiers for protocol commands.
//!
//! Every frame sent on the primary channel carries a [`CommandId`]. The TV
//! echoes it back on the reply, which is how replies are matched to the
//! command that produced them.
//!
//! # Id Ranges
//!
//! | Range | Source |
//! |-------|--------|
//! | `reg0` | Reserved for the pairing handshake |
//! | `101`, `102`, ... | [`CommandIdGenerator`], hexadecimal, per connection |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Identifier reserved for the pairing `register` command.
const REGISTER_ID: &str = "reg0";

/// Generated identifiers start above this value.
const FIRST_COUNTER: u64 = 0x100;

// ============================================================================
// CommandId
// ============================================================================

/// Opaque identifier correlating a command with its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    /// Returns the reserved pairing identifier.
    #[inline]
    #[must_use]
    pub fn register() -> Self {
        Self(REGISTER_ID.to_string())
    }

    /// Returns `true` if this is the reserved pairing identifier.
    #[inline]
    #[must_use]
    pub fn is_register(&self) -> bool {
        self.0 == REGISTER_ID
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommandId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// CommandIdGenerator
// ============================================================================

/// Per-connection source of fresh command identifiers.
///
/// The counter is pre-incremented and rendered in lowercase hexadecimal, so
/// the first identifier is `"101"`. Identifiers are never reused.
#[derive(Debug, Clone)]
pub struct CommandIdGenerator {
    current: u64,
}

impl Default for CommandIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandIdGenerator {
    /// Creates a generator at its initial value.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: FIRST_COUNTER,
        }
    }

    /// Returns the next identifier.
    pub fn next_id(&mut self) -> CommandId {
        self.current += 1;
        CommandId(format!("{:x}", self.current))
    }
}

// ============================================================================
// Tests
// ============================================================================
