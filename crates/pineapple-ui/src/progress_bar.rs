//! ProgressBar widget: gray outline with a highlight fill.

use crate::context::DrawContext;
use crate::layout::Rect;
use pineapple_types::backend::Color;
use pineapple_types::error::Result;

/// A horizontal progress indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    /// Progress value (0.0 to 1.0), or `None` when the total is unknown.
    pub value: Option<f32>,
}

impl ProgressBar {
    /// Create a progress bar (value clamped to 0.0-1.0).
    pub fn new(value: f32) -> Self {
        Self {
            value: Some(value.clamp(0.0, 1.0)),
        }
    }

    /// Progress of `position` through `duration`; unknown when `duration`
    /// is not positive.
    pub fn from_position(position: f64, duration: f64) -> Self {
        if duration > 0.0 {
            Self::new((position / duration) as f32)
        } else {
            Self { value: None }
        }
    }

    /// Width in pixels of the fill inside a bar of outer width `w`.
    pub fn fill_width(&self, w: u32) -> u32 {
        match self.value {
            Some(v) => (w.saturating_sub(2) as f32 * v) as u32,
            None => 0,
        }
    }

    /// Draw the outline, and the fill when progress is known.
    pub fn draw(&self, ctx: &mut DrawContext<'_>, area: Rect) -> Result<()> {
        ctx.backend
            .stroke_rect(area.x, area.y, area.w, area.h, 1, Color::GRAY)?;
        let fill_w = self.fill_width(area.w);
        if fill_w > 0 {
            ctx.backend.fill_rect(
                area.x + 1,
                area.y + 1,
                fill_w,
                area.h.saturating_sub(2),
                ctx.theme.highlight,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, MockBackend};
    use crate::theme::Theme;

    #[test]
    fn new_clamps_value() {
        assert_eq!(ProgressBar::new(1.5).value, Some(1.0));
        assert_eq!(ProgressBar::new(-0.5).value, Some(0.0));
    }

    #[test]
    fn unknown_duration_has_no_value() {
        assert_eq!(ProgressBar::from_position(12.0, 0.0).value, None);
        assert_eq!(ProgressBar::from_position(12.0, 0.0).fill_width(100), 0);
    }

    #[test]
    fn fill_width_proportional() {
        let p = ProgressBar::from_position(30.0, 60.0);
        assert_eq!(p.fill_width(102), 50);
    }

    #[test]
    fn draw_full_progress_fills_inside_outline() {
        let theme = Theme::default();
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            ProgressBar::new(1.0)
                .draw(&mut ctx, Rect::new(10, 10, 100, 10))
                .unwrap();
        }
        let fill = backend.calls.iter().find_map(|c| match c {
            DrawCall::FillRect { w, color, .. } if *color == theme.highlight => Some(*w),
            _ => None,
        });
        assert_eq!(fill, Some(98));
    }

    #[test]
    fn draw_unknown_only_outline() {
        let theme = Theme::default();
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            ProgressBar::from_position(5.0, 0.0)
                .draw(&mut ctx, Rect::new(0, 0, 100, 10))
                .unwrap();
        }
        // stroke_rect default is four fills, all gray.
        assert_eq!(backend.fill_rect_count(), 4);
    }
}
