//! LG webOS TV remote - Async remote-control client.
//!
//! This library pairs with an LG webOS television over its local WebSocket
//! API and drives it: volume, text input, inputs, apps, power, and remote
//! buttons through the pointer socket.
//!
//! # Architecture
//!
//! The client talks to the TV over two sockets:
//!
//! - **Primary (JSON)**: Requests and replies correlated by message id
//! - **Pointer (line format)**: Buttons, clicks, and pointer motion
//!
//! Key design principles:
//!
//! - One tokio task owns each connection: sockets, pending replies, setup
//! - Handles ([`Remote`]) are `Clone + Send + Sync` and only enqueue work
//! - Replies may arrive in any order; nothing in the protocol times out
//! - A declined request (`returnValue: false`) is logged, not raised
//!
//! # Quick Start
//!
//! ```no_run
//! use lgtv_remote::{Button, Remote, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // First run: accept the prompt on the TV, then store the key
//!     let remote = Remote::connect("192.168.1.40", None).await?;
//!     println!("Client key: {:?}", remote.client_key());
//!
//!     remote.volume_up().await?;
//!     remote.press(Button::Home)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`remote`] | Public API: [`Remote`], [`RemoteBuilder`], [`Button`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Message id type and generator |
//! | [`protocol`] | Frame, manifest, and pointer wire formats |
//! | [`session`] | Pairing, setup stages, reply resolution |
//! | [`transport`] | WebSocket connection and correlation (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Message identifiers.
pub mod identifiers;

/// Wire formats.
///
/// Outbound and inbound JSON frames, the pairing manifest, and the pointer
/// line protocol.
pub mod protocol;

/// Public remote control API.
///
/// Use [`Remote::connect`] or [`Remote::builder()`] to get a handle.
pub mod remote;

/// Per-connection protocol state.
pub mod session;

/// WebSocket transport layer.
///
/// Internal module handling the sockets and reply correlation.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Remote types
pub use remote::{Button, InputDevice, LaunchPoint, Remote, RemoteBuilder, Volume};

// Session types
pub use session::{Reply, SetupStage, SoftRejection};

// Transport types
pub use transport::ConnectionState;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::CommandId;
