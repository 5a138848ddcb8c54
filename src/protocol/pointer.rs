//! Pointer channel line protocol.
//!
//! The pointer socket does not use the JSON envelope. Each command is a set
//! of `key:value` lines terminated by an empty line:
//!
//! ```text
//! type:button
//! name:UP
//!
//! ```

// ============================================================================
// PointerCommand
// ============================================================================

/// A command written to the pointer socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerCommand {
    /// Press a remote button by name.
    Button {
        /// Button name, e.g. `UP` or `ENTER`.
        name: String,
    },
    /// Click at the current pointer position.
    Click,
    /// Move the pointer by a relative offset.
    Move {
        /// Horizontal offset.
        dx: i32,
        /// Vertical offset.
        dy: i32,
    },
    /// Scroll by a relative offset.
    Scroll {
        /// Horizontal offset.
        dx: i32,
        /// Vertical offset.
        dy: i32,
    },
}

impl PointerCommand {
    /// Creates a button command.
    #[inline]
    #[must_use]
    pub fn button(name: impl Into<String>) -> Self {
        Self::Button { name: name.into() }
    }

    /// Renders the command in wire format.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Button { name } => format!("type:button\nname:{name}\n\n"),
            Self::Click => "type:click\n\n".to_string(),
            Self::Move { dx, dy } => format!("type:move\ndx:{dx}\ndy:{dy}\ndown:0\n\n"),
            Self::Scroll { dx, dy } => format!("type:scroll\ndx:{dx}\ndy:{dy}\n\n"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
