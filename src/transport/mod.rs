//! WebSocket transport layer.
//!
//! This module handles communication with the TV over two WebSockets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Remote (Rust)  │     primary (JSON frames)    │  TV             │
//! │                 │◄────────────────────────────►│                 │
//! │  Connection     │        ws://HOST:3000        │  SSAP service   │
//! │  → Correlator   │                              │                 │
//! │                 │     pointer (line format)    │                 │
//! │  PointerChannel │─────────────────────────────►│  netinput       │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - Open the primary socket
//! 2. Pair under `reg0`, waiting for the user if prompted
//! 3. Request the pointer socket address and open it
//! 4. `Connection` - Send requests and pointer commands
//! 5. `Connection::shutdown` - Close both sockets
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Primary socket and event loop |
//! | `correlator` | Request/reply matching |
//! | `pointer` | Pointer socket |

// ============================================================================
// Submodules
// ============================================================================

/// Primary socket and event loop.
pub mod connection;

/// Request/reply matching.
pub mod correlator;

/// Pointer socket.
pub mod pointer;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionState};
pub use correlator::{Correlator, Dispatch, Handler, Signal};
pub use pointer::PointerChannel;
