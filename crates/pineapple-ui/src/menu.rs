//! Menu widget: a selectable, scrollable list of labelled rows.
//!
//! Each row optionally carries an action. Rows without one are shown but do
//! nothing when chosen ("No media found." and similar hints).

use crate::context::DrawContext;
use crate::layout::{FONT_BODY, MENU_ITEM_H, Rect};
use pineapple_types::error::Result;

/// One row of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub label: String,
    pub action: Option<A>,
}

impl<A> MenuItem<A> {
    /// A row that triggers `action` when chosen.
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
        }
    }

    /// A non-interactive row.
    pub fn info(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
        }
    }
}

/// A vertical list with a selection cursor and a scroll window.
///
/// Invariants: when non-empty, `selected < len`,
/// `scroll_offset <= len.saturating_sub(visible_count)` and
/// `scroll_offset <= selected < scroll_offset + visible_count`.
#[derive(Debug, Clone)]
pub struct Menu<A> {
    items: Vec<MenuItem<A>>,
    selected: usize,
    scroll_offset: usize,
    visible_count: usize,
}

impl<A> Menu<A> {
    /// Create a menu showing `visible_count` rows at a time.
    pub fn new(items: Vec<MenuItem<A>>, visible_count: usize) -> Self {
        Self {
            items,
            selected: 0,
            scroll_offset: 0,
            visible_count: visible_count.max(1),
        }
    }

    /// Create a menu sized to fill `area` with fixed-height rows.
    pub fn for_area(items: Vec<MenuItem<A>>, area: Rect) -> Self {
        Self::new(items, (area.h / MENU_ITEM_H) as usize)
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the selected row, `None` for an empty menu.
    pub fn selected_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    /// Index of the first visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Move the selection by `delta` rows, clamped to the list, scrolling so
    /// the selection stays visible. No-op on an empty menu.
    pub fn navigate(&mut self, delta: i32) {
        if self.items.is_empty() {
            return;
        }
        let max_index = self.items.len() as i64 - 1;
        self.selected = (self.selected as i64 + delta as i64).clamp(0, max_index) as usize;

        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.visible_count {
            self.scroll_offset = self.selected + 1 - self.visible_count;
        }
        let max_offset = self.items.len().saturating_sub(self.visible_count);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Action of the selected row; `None` when the row has no action or the
    /// menu is empty.
    pub fn selected_action(&self) -> Option<&A> {
        self.items
            .get(self.selected)
            .and_then(|item| item.action.as_ref())
    }

    /// Rows currently inside the scroll window with their absolute indices.
    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &MenuItem<A>)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_count)
    }

    /// Draw the visible rows into `area`. The selected row is drawn with the
    /// highlight as background and the theme background as text color.
    pub fn draw(&self, ctx: &mut DrawContext<'_>, area: Rect) -> Result<()> {
        let theme = ctx.theme;
        ctx.backend.fill_rect(area.x, area.y, area.w, area.h, theme.bg)?;

        let text_h = ctx.backend.measure_text_height(FONT_BODY) as i32;
        let max_text_w = area.w.saturating_sub(10);
        for (row, (index, item)) in self.visible_items().enumerate() {
            let y = area.y + (row as u32 * MENU_ITEM_H) as i32;
            let selected = index == self.selected;
            let text_color = if selected {
                ctx.backend
                    .fill_rect(area.x, y, area.w, MENU_ITEM_H, theme.highlight)?;
                theme.bg
            } else {
                theme.text
            };
            let text_y = y + (MENU_ITEM_H as i32 - text_h) / 2;
            ctx.backend.draw_text_ellipsis(
                &item.label,
                area.x + 5,
                text_y,
                FONT_BODY,
                text_color,
                max_text_w,
            )?;
        }
        Ok(())
    }
}
