//! Generic input event types for host integration.

use serde::{Deserialize, Serialize};

/// Generic key representation.
///
/// Hosts map their native key events to these values before forwarding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Printable character
    Char(char),
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Left mouse button (primary drawing button)
    #[default]
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// What the host should do with a pointer event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDisposition {
    /// The canvas consumed the event
    Handled,
    /// The event was ignored (wrong button, no gesture in progress)
    Ignored,
    /// Click-through: forward the event to whatever is underneath the canvas
    PassThrough,
}
