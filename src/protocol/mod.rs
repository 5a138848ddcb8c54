//! Wire formats for both TV channels.
//!
//! # Protocol Overview
//!
//! | Message | Channel | Direction | Purpose |
//! |---------|---------|-----------|---------|
//! | `register` | Primary | Client → TV | Pairing handshake |
//! | `request` | Primary | Client → TV | Command request |
//! | `response` / `registered` / `error` | Primary | TV → Client | Replies |
//! | Button / click lines | Pointer | Client → TV | Raw input, no reply |
//!
//! # Request URIs
//!
//! Requests address a service with `ssap://{service}/{method}`:
//!
//! - `ssap://audio/volumeUp`
//! - `ssap://com.webos.service.ime/insertText`
//! - `ssap://system/turnOff`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frame` | JSON envelope for the primary channel |
//! | `manifest` | Pairing manifest and payload |
//! | `pointer` | Line format of the pointer channel |

// ============================================================================
// Submodules
// ============================================================================

/// Primary channel frame types.
pub mod frame;

/// Pairing manifest and payload.
pub mod manifest;

/// Pointer channel commands.
pub mod pointer;

// ============================================================================
// Re-exports
// ============================================================================

pub use frame::{FrameType, InboundFrame, MessageKind, OutboundFrame, SSAP_SCHEME, ssap_uri};
pub use manifest::{MANIFEST, Manifest, PAIRING_TYPE, PairingPayload};
pub use pointer::PointerCommand;
