//! Keyboard shortcut registry and documentation.

use crate::input::{Key, KeyEvent};

/// Editor commands reachable from the keyboard outside text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Undo,
    Redo,
    SelectAll,
    DeleteSelection,
    ResetZoom,
    Cancel,
}

impl Command {
    /// Map a key press to a command. Letter keys match regardless of case
    /// since hosts report Shift+z as `Z`.
    pub fn from_key(event: &KeyEvent) -> Option<Command> {
        let action = event.modifiers.action();
        let shift = event.modifiers.shift;
        match event.key {
            Key::Escape => Some(Command::Cancel),
            Key::Delete | Key::Backspace if !action => Some(Command::DeleteSelection),
            Key::Char(c) if action => match c.to_ascii_lowercase() {
                'z' if shift => Some(Command::Redo),
                'z' => Some(Command::Undo),
                'y' => Some(Command::Redo),
                'a' => Some(Command::SelectAll),
                '0' => Some(Command::ResetZoom),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, Command::SelectAll, "Select all shapes"),
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("0", true, false, Command::ResetZoom, "Reset zoom"),
            Shortcut::new(
                "Delete",
                false,
                false,
                Command::DeleteSelection,
                "Delete selected shapes",
            ),
            Shortcut::new(
                "Backspace",
                false,
                false,
                Command::DeleteSelection,
                "Delete selected shapes",
            ),
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current action"),
        ]
    }

    /// Render the shortcut table as text.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}\n", s.format(), s.description))
            .collect()
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        print!("{}", Self::describe());
        println!();
    }
}
