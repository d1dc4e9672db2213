//! Input events delivered by the host.
//!
//! Every event carries a host timestamp in milliseconds so that double-click
//! detection and caret blinking are deterministic.

use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn action(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in screen coordinates.
    pub position: Point,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Host timestamp in milliseconds.
    #[serde(default)]
    pub time_ms: u64,
}

impl PointerEvent {
    /// Left-button press with no modifiers.
    pub fn left(position: Point, time_ms: u64) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    pub fn with_button(self, button: MouseButton) -> Self {
        Self { button, ..self }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
}

/// Logical keys the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Escape,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub time_ms: u64,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers, time_ms: u64) -> Self {
        Self {
            key,
            modifiers,
            time_ms,
        }
    }

    /// Unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE, 0)
    }
}

/// Double-click detection on text shapes.
///
/// A click counts as a double-click when it lands on the same shape as the
/// previous click within the configured window.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(ShapeId, u64)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click on `id` and report whether it completes a double-click.
    pub fn register(&mut self, id: ShapeId, time_ms: u64, window_ms: u64) -> bool {
        let is_double = matches!(
            self.last,
            Some((last_id, last_time))
                if last_id == id && time_ms.saturating_sub(last_time) < window_ms
        );
        // Reset after a double-click so a third click starts over.
        self.last = if is_double { None } else { Some((id, time_ms)) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
