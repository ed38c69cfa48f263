//! pineapple-ui: drawing helpers and widgets built on `SdiBackend`.
//!
//! All rendering goes through `SdiBackend` trait methods; nothing here knows
//! about SDL. Widgets take a [`DrawContext`] carrying the backend and the
//! active [`Theme`].

pub mod context;
pub mod layout;
pub mod menu;
pub mod progress_bar;
pub mod scroll_view;
pub mod side_panel;
pub mod statusbar;
pub mod text;
pub mod theme;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use context::DrawContext;
pub use layout::Rect;
pub use menu::{Menu, MenuItem};
pub use theme::Theme;
