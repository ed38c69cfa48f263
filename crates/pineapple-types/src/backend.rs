//! Backend trait definitions.
//!
//! The platform layer implements these traits. Menus, players and screens
//! draw and play through trait boundaries and never call SDL directly.
//!
//! `SdiBackend` has a small set of required rendering methods plus extended
//! primitives (gradients, outlines, triangles, clipped regions, ellipsized
//! text) with default implementations built on the required ones.

use std::path::Path;

use crate::error::Result;
use crate::input::InputEvent;

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linear interpolation, `num / den` of the way from `self` to `other`.
    pub fn lerp(self, other: Color, num: u32, den: u32) -> Color {
        if den == 0 {
            return self;
        }
        let num = num.min(den);
        let inv = den - num;
        let mix = |a: u8, b: u8| ((a as u32 * inv + b as u32 * num + den / 2) / den) as u8;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

/// Opaque handle to a loaded texture in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Suffix appended to text that had to be shortened.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` so that it fits `max_width`, appending [`ELLIPSIS`].
///
/// Characters are dropped from the end until `measure(prefix + "...")` fits.
/// Text that already fits is returned unchanged.
pub fn ellipsize(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> String {
    if measure(text) <= max_width {
        return text.to_string();
    }
    let mut end = text.len();
    loop {
        let candidate = format!("{}{ELLIPSIS}", &text[..end]);
        if end == 0 || measure(&candidate) <= max_width {
            return candidate;
        }
        end = text[..end]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }
}

/// Rendering backend trait.
///
/// # Core Methods (required)
///
/// `init`, `clear`, `blit`, `fill_rect`, `draw_text`, `swap_buffers`,
/// `load_texture`, `destroy_texture`, `set_clip_rect`, `reset_clip_rect`,
/// `measure_text` and `shutdown`.
///
/// # Extended Primitives (optional, with defaults)
///
/// Backends may override these for native rendering. The defaults
/// approximate with `fill_rect` and the other core methods.
#[allow(clippy::too_many_arguments)]
pub trait SdiBackend {
    // -----------------------------------------------------------------------
    // Core methods (required -- no default implementations)
    // -----------------------------------------------------------------------

    /// Initialize the rendering subsystem at the given logical size.
    fn init(&mut self, width: u32, height: u32) -> Result<()>;

    /// Clear the screen to a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Blit a texture at the given position and size.
    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw text with its top-left corner at the given position.
    /// `font_size` is a hint in pixels; backends may approximate.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color)
    -> Result<()>;

    /// Present the current frame to the display.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Load raw RGBA pixel data as a texture. Returns a handle for later blit.
    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId>;

    /// Destroy a previously loaded texture.
    fn destroy_texture(&mut self, tex: TextureId) -> Result<()>;

    /// Set the clipping rectangle.
    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Reset clipping to the full screen.
    fn reset_clip_rect(&mut self) -> Result<()>;

    /// Measure the width of a text string at the given font size, in pixels.
    fn measure_text(&self, text: &str, font_size: u16) -> u32;

    /// Shut down the rendering subsystem and release resources.
    fn shutdown(&mut self) -> Result<()>;

    // -----------------------------------------------------------------------
    // Extended: Shape Primitives
    // -----------------------------------------------------------------------

    /// Draw the outline of a rectangle.
    ///
    /// `stroke_width` is drawn inward from the given bounds.
    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        stroke_width: u16,
        color: Color,
    ) -> Result<()> {
        let sw = stroke_width as u32;
        self.fill_rect(x, y, w, sw, color)?;
        self.fill_rect(x, y + h as i32 - sw as i32, w, sw, color)?;
        self.fill_rect(x, y + sw as i32, sw, h.saturating_sub(sw * 2), color)?;
        self.fill_rect(
            x + w as i32 - sw as i32,
            y + sw as i32,
            sw,
            h.saturating_sub(sw * 2),
            color,
        )?;
        Ok(())
    }

    /// Draw a filled triangle defined by three vertices.
    fn fill_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: Color,
    ) -> Result<()> {
        let _ = (x1, y1, x2, y2, x3, y3, color);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Extended: Gradient Fills
    // -----------------------------------------------------------------------

    /// Draw a filled rectangle with a vertical gradient (top to bottom).
    fn fill_rect_gradient_v(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        top_color: Color,
        bottom_color: Color,
    ) -> Result<()> {
        let h_max = h.saturating_sub(1).max(1);
        for dy in 0..h {
            self.fill_rect(x, y + dy as i32, w, 1, top_color.lerp(bottom_color, dy, h_max))?;
        }
        Ok(())
    }

    /// Draw a filled rectangle with a horizontal gradient (left to right).
    fn fill_rect_gradient_h(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        left_color: Color,
        right_color: Color,
    ) -> Result<()> {
        let w_max = w.saturating_sub(1).max(1);
        for dx in 0..w {
            self.fill_rect(x + dx as i32, y, 1, h, left_color.lerp(right_color, dx, w_max))?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Extended: Text System
    // -----------------------------------------------------------------------

    /// Height of one line of text at the given font size.
    fn measure_text_height(&self, font_size: u16) -> u32 {
        (font_size as f32 * 1.2) as u32
    }

    /// Draw text truncated with "..." if it exceeds `max_width`.
    ///
    /// Returns the actual drawn width in pixels.
    fn draw_text_ellipsis(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
        max_width: u32,
    ) -> Result<u32> {
        let fitted = ellipsize(text, max_width, |s| self.measure_text(s, font_size));
        self.draw_text(&fitted, x, y, font_size, color)?;
        Ok(self.measure_text(&fitted, font_size))
    }

    /// Draw text horizontally centred on `center_x`.
    fn draw_text_centered(
        &mut self,
        text: &str,
        center_x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        let w = self.measure_text(text, font_size) as i32;
        self.draw_text(text, center_x - w / 2, y, font_size, color)
    }

    // -----------------------------------------------------------------------
    // Extended: Clip Stack
    // -----------------------------------------------------------------------

    /// Push a clip rectangle onto the clip stack.
    fn push_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.set_clip_rect(x, y, w, h)
    }

    /// Pop the most recently pushed clip rectangle.
    fn pop_clip_rect(&mut self) -> Result<()> {
        self.reset_clip_rect()
    }
}

/// Input backend trait.
///
/// Maps platform-specific input to the platform-agnostic `InputEvent` enum.
pub trait InputBackend {
    /// Poll for pending input events.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Host window display-mode control.
pub trait DisplayBackend {
    /// Whether the host window is currently fullscreen.
    fn is_fullscreen(&self) -> bool;

    /// Enter or leave fullscreen.
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()>;

    /// Flip the current display mode.
    fn toggle_fullscreen(&mut self) -> Result<()> {
        let next = !self.is_fullscreen();
        self.set_fullscreen(next)
    }
}

/// In-process audio playback backend.
///
/// Holds at most one loaded stream. Position readback is deliberately absent:
/// players track position against a [`crate::clock::Clock`].
pub trait AudioBackend {
    /// Open the file at `path` as the single active stream, replacing any
    /// previously loaded one.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start the loaded stream from the beginning.
    fn play(&mut self) -> Result<()>;

    /// Pause the playing stream.
    fn pause(&mut self) -> Result<()>;

    /// Resume a paused stream.
    fn resume(&mut self) -> Result<()>;

    /// Jump to an absolute position in seconds.
    fn seek(&mut self, position_secs: f64) -> Result<()>;

    /// Halt and release the loaded stream.
    fn unload(&mut self);

    /// Whether a stream is currently loaded.
    fn is_loaded(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eight_px(s: &str) -> u32 {
        s.chars().count() as u32 * 8
    }

    #[test]
    fn ellipsize_keeps_fitting_text() {
        assert_eq!(ellipsize("Music", 100, eight_px), "Music");
    }

    #[test]
    fn ellipsize_truncates_long_text() {
        let out = ellipsize("A very long file name.mp3", 80, eight_px);
        assert!(out.ends_with(ELLIPSIS));
        assert!(eight_px(&out) <= 80);
        assert_eq!(out, "A very ...");
    }

    #[test]
    fn ellipsize_handles_multibyte() {
        let out = ellipsize("ÄÖÜäöüß long name", 48, eight_px);
        assert!(eight_px(&out) <= 48);
        assert!(out.starts_with("ÄÖÜ"));
    }

    #[test]
    fn ellipsize_degenerates_to_ellipsis() {
        assert_eq!(ellipsize("abcdef", 4, eight_px), "...");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::rgb(0, 150, 0);
        let b = Color::rgb(0, 255, 0);
        assert_eq!(a.lerp(b, 0, 10), a);
        assert_eq!(a.lerp(b, 10, 10), b);
        assert_eq!(a.lerp(b, 5, 0), a);
    }

    #[test]
    fn lerp_midpoint() {
        let c = Color::BLACK.lerp(Color::WHITE, 1, 2);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    struct FakeDisplay(bool);

    impl DisplayBackend for FakeDisplay {
        fn is_fullscreen(&self) -> bool {
            self.0
        }
        fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
            self.0 = fullscreen;
            Ok(())
        }
    }

    #[test]
    fn toggle_fullscreen_flips() {
        let mut d = FakeDisplay(false);
        d.toggle_fullscreen().unwrap();
        assert!(d.is_fullscreen());
        d.toggle_fullscreen().unwrap();
        assert!(!d.is_fullscreen());
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ellipsized_text_fits_or_is_bare_ellipsis(text in ".{0,40}", max in 0u32..400) {
                let measure = |s: &str| s.chars().count() as u32 * 8;
                let out = ellipsize(&text, max, measure);
                prop_assert!(measure(&out) <= max || out == ELLIPSIS);
            }
        }
    }
}
