//! Side panel: vertical theme gradient shown to the right of menus.

use crate::context::DrawContext;
use crate::layout::Rect;
use pineapple_types::error::Result;

/// Draw the side panel gradient for the current theme.
pub fn draw_side_panel(ctx: &mut DrawContext<'_>) -> Result<()> {
    let area = Rect::side_panel();
    let theme = ctx.theme;
    ctx.backend.fill_rect_gradient_v(
        area.x,
        area.y,
        area.w,
        area.h,
        theme.side_top,
        theme.side_bottom,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, MockBackend};
    use crate::theme;

    #[test]
    fn gradient_runs_between_theme_colors() {
        let t = theme::resolve("Ocean Blue");
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, t);
            draw_side_panel(&mut ctx).unwrap();
        }
        let colors: Vec<_> = backend
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), Rect::side_panel().h as usize);
        assert_eq!(colors.first(), Some(&t.side_top));
        assert_eq!(colors.last(), Some(&t.side_bottom));
    }
}
