//! Remote control button names.
//!
//! Provides constants for the buttons the pointer socket accepts.
//!
//! # Example
//!
//! ```ignore
//! use lgtv_remote::Button;
//!
//! remote.press(Button::Up)?;
//! remote.press(Button::Enter)?;
//!
//! // Names missing from the enum can still be sent as strings:
//! remote.button("ASPECT_RATIO")?;
//! ```

use std::fmt;

// ============================================================================
// Button Enum
// ============================================================================

/// Well-known remote control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    // ========================================================================
    // Navigation
    // ========================================================================
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// OK / select
    Enter,
    /// Back
    Back,
    /// Home menu
    Home,
    /// Settings menu
    Menu,
    /// Exit current app
    Exit,
    /// Program guide
    Guide,
    /// Info overlay
    Info,
    /// Text input dash
    Dash,

    // ========================================================================
    // Volume & Channels
    // ========================================================================
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
    /// Mute toggle
    Mute,
    /// Channel up
    ChannelUp,
    /// Channel down
    ChannelDown,

    // ========================================================================
    // Colour Keys
    // ========================================================================
    /// Red
    Red,
    /// Green
    Green,
    /// Yellow
    Yellow,
    /// Blue
    Blue,

    // ========================================================================
    // Playback
    // ========================================================================
    /// Play
    Play,
    /// Pause
    Pause,
    /// Stop
    Stop,
    /// Rewind
    Rewind,
    /// Fast forward
    FastForward,

    // ========================================================================
    // Digits
    // ========================================================================
    /// Digit key `0`-`9`. Values above 9 are clamped.
    Digit(u8),
}

impl Button {
    /// Returns the name sent on the pointer socket.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Button::Up => "UP",
            Button::Down => "DOWN",
            Button::Left => "LEFT",
            Button::Right => "RIGHT",
            Button::Enter => "ENTER",
            Button::Back => "BACK",
            Button::Home => "HOME",
            Button::Menu => "MENU",
            Button::Exit => "EXIT",
            Button::Guide => "GUIDE",
            Button::Info => "INFO",
            Button::Dash => "DASH",
            Button::VolumeUp => "VOLUMEUP",
            Button::VolumeDown => "VOLUMEDOWN",
            Button::Mute => "MUTE",
            Button::ChannelUp => "CHANNELUP",
            Button::ChannelDown => "CHANNELDOWN",
            Button::Red => "RED",
            Button::Green => "GREEN",
            Button::Yellow => "YELLOW",
            Button::Blue => "BLUE",
            Button::Play => "PLAY",
            Button::Pause => "PAUSE",
            Button::Stop => "STOP",
            Button::Rewind => "REWIND",
            Button::FastForward => "FASTFORWARD",
            Button::Digit(digit) => DIGITS[usize::from(digit.min(9))],
        }
    }
}

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_names() {
        assert_eq!(Button::Up.as_str(), "UP");
        assert_eq!(Button::Down.as_str(), "DOWN");
        assert_eq!(Button::Left.as_str(), "LEFT");
        assert_eq!(Button::Right.as_str(), "RIGHT");
        assert_eq!(Button::Back.as_str(), "BACK");
    }

    #[test]
    fn test_digits() {
        assert_eq!(Button::Digit(0).as_str(), "0");
        assert_eq!(Button::Digit(7).as_str(), "7");
        assert_eq!(Button::Digit(42).as_str(), "9");
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Button::FastForward.to_string(), "FASTFORWARD");
    }
}
