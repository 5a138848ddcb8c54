//! Public remote control API.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Remote`] | Connected TV handle |
//! | [`RemoteBuilder`] | Fluent connection configuration |
//! | [`Button`] | Well-known button names |
//! | [`Volume`], [`InputDevice`], [`LaunchPoint`] | Typed results |
//!
//! # Example
//!
//! ```no_run
//! use lgtv_remote::{Button, Remote, Result};
//!
//! # async fn example() -> Result<()> {
//! let remote = Remote::builder()
//!     .address("192.168.1.40")
//!     .client_key(Some("stored-key".to_string()))
//!     .connect()
//!     .await?;
//!
//! remote.press(Button::Down)?;
//! if let Some(volume) = remote.get_volume().await? {
//!     println!("Volume: {}", volume.level);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for connection settings.
pub mod builder;

/// Button names.
pub mod button;

/// Named service wrappers.
mod commands;

/// Remote handle.
pub mod core;

/// Typed request results.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DEFAULT_PORT, RemoteBuilder};
pub use button::Button;
pub use core::Remote;
pub use types::{InputDevice, LaunchPoint, Volume};
