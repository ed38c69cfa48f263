//! Shared test utilities for widget, player and controller tests.
//!
//! Provides a [`MockBackend`] that records all draw calls and display-mode
//! changes for assertion.

use pineapple_types::backend::{Color, DisplayBackend, SdiBackend, TextureId};
use pineapple_types::error::Result;

/// Width of one glyph in the mock's fixed-pitch text measurement.
pub const MOCK_GLYPH_W: u32 = 8;

/// A recorded draw call from the mock backend.
#[derive(Debug, Clone)]
pub enum DrawCall {
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    },
    Blit {
        tex: TextureId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    Clip {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
}

/// A mock backend that records all draw calls for test assertions.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    /// Dimensions of every texture uploaded, in upload order.
    pub loaded_textures: Vec<(u32, u32)>,
    pub destroyed_textures: Vec<TextureId>,
    pub fullscreen: bool,
    /// Every `set_fullscreen` request, in order.
    pub fullscreen_changes: Vec<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of `FillRect` calls.
    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }

    /// Count of `DrawText` calls.
    pub fn draw_text_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::DrawText { .. }))
            .count()
    }

    /// Count of `Blit` calls.
    pub fn blit_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Blit { .. }))
            .count()
    }

    /// All drawn strings in call order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Forget the draw calls recorded so far.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl DisplayBackend for MockBackend {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.fullscreen = fullscreen;
        self.fullscreen_changes.push(fullscreen);
        Ok(())
    }
}

impl SdiBackend for MockBackend {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self, _color: Color) -> Result<()> {
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, _rgba_data: &[u8]) -> Result<TextureId> {
        self.loaded_textures.push((width, height));
        Ok(TextureId(self.loaded_textures.len() as u64))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.destroyed_textures.push(tex);
        Ok(())
    }

    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Clip { x, y, w, h });
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        Ok(())
    }

    fn measure_text(&self, text: &str, _font_size: u16) -> u32 {
        text.chars().count() as u32 * MOCK_GLYPH_W
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
