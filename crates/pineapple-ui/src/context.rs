//! DrawContext: the backend and theme handed to every widget draw call.

use crate::theme::Theme;
use pineapple_types::backend::SdiBackend;

/// Bundles the rendering backend with the active theme.
pub struct DrawContext<'a> {
    pub backend: &'a mut dyn SdiBackend,
    pub theme: &'a Theme,
}

impl<'a> DrawContext<'a> {
    pub fn new(backend: &'a mut dyn SdiBackend, theme: &'a Theme) -> Self {
        Self { backend, theme }
    }
}
