//! Screen geometry: the fixed 320x240 layout and a small rectangle type.

/// Logical screen width.
pub const SCREEN_W: u32 = 320;
/// Logical screen height.
pub const SCREEN_H: u32 = 240;
/// Height of the status bar along the top edge.
pub const STATUS_BAR_H: u32 = 20;
/// Width of the gradient side panel on the right.
pub const SIDE_PANEL_W: u32 = 100;
/// Width of the menu / player area left of the side panel.
pub const MAIN_AREA_W: u32 = SCREEN_W - SIDE_PANEL_W;
/// Height of one menu row.
pub const MENU_ITEM_H: u32 = 20;

/// Body text size.
pub const FONT_BODY: u16 = 16;
/// Small text (status bar, secondary messages).
pub const FONT_SMALL: u16 = 13;
/// Heading text on modal screens.
pub const FONT_TITLE: u16 = 20;

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Whole screen.
    pub const fn screen() -> Self {
        Self::new(0, 0, SCREEN_W, SCREEN_H)
    }

    /// Everything below the status bar.
    pub const fn below_status_bar() -> Self {
        Self::new(0, STATUS_BAR_H as i32, SCREEN_W, SCREEN_H - STATUS_BAR_H)
    }

    /// Menu / player area: below the status bar, left of the side panel.
    pub const fn main_area() -> Self {
        Self::new(0, STATUS_BAR_H as i32, MAIN_AREA_W, SCREEN_H - STATUS_BAR_H)
    }

    /// Side panel area on the right.
    pub const fn side_panel() -> Self {
        Self::new(
            MAIN_AREA_W as i32,
            STATUS_BAR_H as i32,
            SIDE_PANEL_W,
            SCREEN_H - STATUS_BAR_H,
        )
    }

    /// Shrink by `by` pixels on every side.
    pub fn inset(&self, by: u32) -> Self {
        Self {
            x: self.x + by as i32,
            y: self.y + by as i32,
            w: self.w.saturating_sub(by * 2),
            h: self.h.saturating_sub(by * 2),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w as i32 / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h as i32 / 2
    }

    /// Position a `w` x `h` box centred inside this rectangle.
    pub fn centered(&self, w: u32, h: u32) -> Self {
        Self::new(
            self.center_x() - w as i32 / 2,
            self.center_y() - h as i32 / 2,
            w,
            h,
        )
    }
}
