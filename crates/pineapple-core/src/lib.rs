//! Application core for Perfect Pineapple Player.
//!
//! The [`Controller`] owns the menu stack, the three players, any open
//! modal screen and the persisted [`Settings`]. Each frame it dispatches
//! input to exactly one focus, polls the external video process, advances
//! the active player and draws.

pub mod action;
pub mod collaborators;
pub mod controller;
pub mod debounce;
pub mod menus;
pub mod screen;
pub mod settings;

pub use action::MenuAction;
pub use collaborators::{FilePicker, LinkOpener};
pub use controller::{Controller, Focus, Players};
pub use screen::{Screen, ScreenAction};
pub use settings::{JsonFileStore, MemoryStore, Settings, SettingsStore};
