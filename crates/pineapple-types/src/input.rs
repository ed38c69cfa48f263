//! Platform-agnostic input event types.
//!
//! Every backend maps its native input (keyboard, game controller) to these
//! enums. The controller never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A face / d-pad button pressed.
    ButtonPress(Button),
    /// A face / d-pad button released.
    ButtonRelease(Button),
    /// Shoulder button pressed.
    TriggerPress(Trigger),
    /// Shoulder button released.
    TriggerRelease(Trigger),
    /// Character typed on a physical keyboard. Screens use these for
    /// shortcuts such as the donation amounts.
    TextInput(char),
    /// User requested quit (window close, etc.).
    Quit,
}

/// Buttons that map across keyboard and game controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// A / Return / Space.
    Confirm,
    /// B / Escape / Backspace.
    Cancel,
    /// Start: fullscreen toggle plus video window focus.
    Start,
    /// Back: fullscreen toggle.
    Select,
}

/// Shoulder buttons (LB / RB, `[` / `]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Left,
    Right,
}

impl InputEvent {
    /// The pressed button, if this is a press event.
    pub fn pressed_button(&self) -> Option<Button> {
        match self {
            Self::ButtonPress(b) => Some(*b),
            _ => None,
        }
    }
}
