//! ScrollView: a clamped vertical offset over content taller than its viewport.

use crate::context::DrawContext;
use crate::layout::Rect;
use pineapple_types::backend::Color;
use pineapple_types::error::Result;

/// Vertical scroll state for a fixed-height content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollView {
    pub content_height: u32,
    pub viewport_height: u32,
    scroll_y: u32,
}

impl ScrollView {
    pub fn new(content_height: u32, viewport_height: u32) -> Self {
        Self {
            content_height,
            viewport_height,
            scroll_y: 0,
        }
    }

    /// Current offset from the top of the content.
    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    /// Largest valid offset.
    pub fn max_scroll(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Scroll by a signed pixel delta, clamped to `[0, max_scroll]`.
    pub fn scroll_by(&mut self, delta: i32) {
        let target = self.scroll_y as i64 + delta as i64;
        self.scroll_y = target.clamp(0, self.max_scroll() as i64) as u32;
    }

    pub fn can_scroll_up(&self) -> bool {
        self.scroll_y > 0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.scroll_y < self.max_scroll()
    }

    /// Draw small up/down arrows at the right edge of `area` for whichever
    /// directions still have content.
    pub fn draw_arrows(&self, ctx: &mut DrawContext<'_>, area: Rect, color: Color) -> Result<()> {
        if self.content_height <= self.viewport_height {
            return Ok(());
        }
        let r = area.right();
        if self.can_scroll_up() {
            let top = area.y;
            ctx.backend
                .fill_triangle(r - 15, top + 15, r - 5, top + 15, r - 10, top + 5, color)?;
        }
        if self.can_scroll_down() {
            let b = area.bottom();
            ctx.backend
                .fill_triangle(r - 15, b - 15, r - 5, b - 15, r - 10, b - 5, color)?;
        }
        Ok(())
    }
}
