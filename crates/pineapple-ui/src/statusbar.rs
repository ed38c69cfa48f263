//! Status bar: the 20 px strip along the top with a clock and battery icon.
//!
//! The bar is drawn on every frame regardless of focus. The clock text is
//! supplied by the caller so the widget stays free of wall-clock access.

use crate::context::DrawContext;
use crate::layout::{FONT_SMALL, Rect, SCREEN_W, STATUS_BAR_H};
use pineapple_types::backend::Color;
use pineapple_types::error::Result;

const BATTERY_W: u32 = 20;
const BATTERY_H: u32 = 10;
const NUB_W: u32 = 2;
const NUB_H: u32 = 4;
const BATTERY_FILL_START: Color = Color::rgb(0, 150, 0);
const BATTERY_FILL_END: Color = Color::rgb(0, 255, 0);

/// Runtime state for the top status bar.
#[derive(Debug, Clone)]
pub struct StatusBar {
    /// Battery charge, 0.0 to 1.0.
    pub battery_level: f32,
    /// Cached clock string.
    clock_text: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            battery_level: 1.0,
            clock_text: "00:00".to_string(),
        }
    }

    /// Update the cached clock string (e.g. "14:05").
    pub fn set_clock(&mut self, text: impl Into<String>) {
        self.clock_text = text.into();
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    /// Geometry of the battery outline.
    pub fn battery_rect() -> Rect {
        Rect::new(
            (SCREEN_W - BATTERY_W - 10) as i32,
            ((STATUS_BAR_H - BATTERY_H) / 2) as i32,
            BATTERY_W,
            BATTERY_H,
        )
    }

    pub fn draw(&self, ctx: &mut DrawContext<'_>) -> Result<()> {
        let theme = ctx.theme;
        ctx.backend.fill_rect(0, 0, SCREEN_W, STATUS_BAR_H, theme.bg)?;
        ctx.backend
            .fill_rect(0, STATUS_BAR_H as i32 - 1, SCREEN_W, 1, Color::GRAY)?;

        let text_h = ctx.backend.measure_text_height(FONT_SMALL) as i32;
        ctx.backend.draw_text_centered(
            &self.clock_text,
            (SCREEN_W / 2) as i32,
            (STATUS_BAR_H as i32 - text_h) / 2,
            FONT_SMALL,
            theme.text,
        )?;

        let batt = Self::battery_rect();
        ctx.backend
            .stroke_rect(batt.x, batt.y, batt.w, batt.h, 1, theme.text)?;
        ctx.backend.fill_rect(
            batt.right(),
            batt.y + ((BATTERY_H - NUB_H) / 2) as i32,
            NUB_W,
            NUB_H,
            theme.text,
        )?;
        let fill_w = ((BATTERY_W - 2) as f32 * self.battery_level.clamp(0.0, 1.0)) as u32;
        if fill_w > 0 {
            ctx.backend.fill_rect_gradient_h(
                batt.x + 1,
                batt.y + 1,
                fill_w,
                BATTERY_H - 2,
                BATTERY_FILL_START,
                BATTERY_FILL_END,
            )?;
        }
        Ok(())
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, MockBackend};
    use crate::theme::Theme;

    #[test]
    fn new_has_placeholder_clock() {
        let bar = StatusBar::new();
        assert_eq!(bar.clock_text(), "00:00");
    }

    #[test]
    fn draw_shows_clock_centered() {
        let theme = Theme::default();
        let mut bar = StatusBar::new();
        bar.set_clock("14:05");
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            bar.draw(&mut ctx).unwrap();
        }
        let x = backend.calls.iter().find_map(|c| match c {
            DrawCall::DrawText { text, x, .. } if text == "14:05" => Some(*x),
            _ => None,
        });
        // 5 glyphs * 8 px = 40 px wide, centred on 160.
        assert_eq!(x, Some(140));
    }

    #[test]
    fn empty_battery_skips_gradient() {
        let theme = Theme::default();
        let mut full = MockBackend::new();
        let mut empty = MockBackend::new();
        let mut bar = StatusBar::new();
        {
            let mut ctx = DrawContext::new(&mut full, &theme);
            bar.draw(&mut ctx).unwrap();
        }
        bar.battery_level = 0.0;
        {
            let mut ctx = DrawContext::new(&mut empty, &theme);
            bar.draw(&mut ctx).unwrap();
        }
        // Full battery adds one fill per gradient column.
        assert_eq!(full.fill_rect_count() - empty.fill_rect_count(), 18);
    }

    #[test]
    fn battery_sits_inside_bar() {
        let r = StatusBar::battery_rect();
        assert!(r.bottom() <= STATUS_BAR_H as i32);
        assert!(r.right() + NUB_W as i32 <= SCREEN_W as i32);
    }
}
