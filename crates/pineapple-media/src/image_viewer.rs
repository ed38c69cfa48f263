//! Photo viewer.
//!
//! Loading decodes the file synchronously and shrinks it to fit the view
//! while keeping its aspect ratio. The texture is uploaded lazily on the
//! next draw. A file that fails to decode shows an inline placeholder and
//! leaves the playlist untouched. Transport operations are no-ops.

use std::path::PathBuf;

use image::imageops::FilterType;
use pineapple_types::backend::{Color, TextureId, ellipsize};
use pineapple_types::error::Result;
use pineapple_ui::layout::{FONT_BODY, FONT_SMALL, Rect, SCREEN_H, SCREEN_W, STATUS_BAR_H};
use pineapple_ui::DrawContext;

use crate::player::{MediaPlayer, PlayerKind, PlayerState, replace_playlist};
use crate::scanner::{VIEWER_EXTENSIONS, has_extension};

const CAPTION_H: u32 = 20;
const PLACEHOLDER_H: u32 = 50;

/// Area the picture is centred in: below the status bar, above the caption.
pub fn picture_area() -> Rect {
    Rect::new(
        0,
        STATUS_BAR_H as i32,
        SCREEN_W,
        SCREEN_H - STATUS_BAR_H - CAPTION_H,
    )
}

/// Largest box the picture may occupy.
pub fn fit_box() -> Rect {
    picture_area().inset(10)
}

/// Aspect-preserving size of a `w` x `h` image shrunk to fit
/// `max_w` x `max_h`. Images that already fit keep their size.
pub fn fit_size(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w == 0 || h == 0 {
        return (0, 0);
    }
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let ratio = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let fw = ((w as f64 * ratio).round() as u32).clamp(1, max_w.max(1));
    let fh = ((h as f64 * ratio).round() as u32).clamp(1, max_h.max(1));
    (fw, fh)
}

/// A decoded, already resized picture.
#[derive(Debug, Clone)]
pub struct Picture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
enum Slot {
    Empty,
    Ready(Picture),
    Failed,
}

/// Viewer for a playlist of still images.
#[derive(Debug)]
pub struct ImageViewer {
    state: PlayerState,
    slot: Slot,
    texture: Option<TextureId>,
    /// Textures to release on the next draw.
    stale: Vec<TextureId>,
}

impl ImageViewer {
    pub fn new() -> Self {
        Self {
            state: PlayerState::default(),
            slot: Slot::Empty,
            texture: None,
            stale: Vec::new(),
        }
    }

    /// Decode `path` and shrink it to fit [`fit_box`].
    pub fn decode(path: &std::path::Path) -> Result<Picture> {
        let img = image::open(path)?.to_rgba8();
        let bounds = fit_box();
        let (w, h) = fit_size(img.width(), img.height(), bounds.w, bounds.h);
        let img = if (w, h) == img.dimensions() {
            img
        } else {
            image::imageops::resize(&img, w, h, FilterType::Triangle)
        };
        Ok(Picture {
            width: w,
            height: h,
            rgba: img.into_raw(),
        })
    }

    /// The picture currently shown, if it decoded.
    pub fn picture(&self) -> Option<&Picture> {
        match &self.slot {
            Slot::Ready(p) => Some(p),
            _ => None,
        }
    }

    /// Whether the current file failed to decode.
    pub fn failed(&self) -> bool {
        matches!(self.slot, Slot::Failed)
    }

    fn release(&mut self) {
        self.slot = Slot::Empty;
        if let Some(tex) = self.texture.take() {
            self.stale.push(tex);
        }
    }

    fn caption(&self) -> Option<String> {
        let index = self.state.current?;
        let name = self.state.current_title()?;
        Some(format!("{name} ({} of {})", index + 1, self.state.playlist.len()))
    }

    fn upload(&mut self, ctx: &mut DrawContext<'_>) {
        if self.texture.is_some() {
            return;
        }
        let Slot::Ready(picture) = &self.slot else {
            return;
        };
        match ctx
            .backend
            .load_texture(picture.width, picture.height, &picture.rgba)
        {
            Ok(tex) => self.texture = Some(tex),
            Err(e) => {
                log::warn!("Texture upload failed: {e}");
                self.slot = Slot::Failed;
            },
        }
    }

    fn draw_placeholder(&self, ctx: &mut DrawContext<'_>) -> Result<()> {
        let area = fit_box();
        let boxed = area.centered(area.w, PLACEHOLDER_H);
        ctx.backend
            .stroke_rect(boxed.x, boxed.y, boxed.w, boxed.h, 1, Color::GRAY)?;
        let text_h = ctx.backend.measure_text_height(FONT_BODY) as i32;
        ctx.backend.draw_text_centered(
            "Cannot load image",
            boxed.center_x(),
            boxed.center_y() - text_h / 2,
            FONT_BODY,
            Color::RED,
        )
    }
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlayer for ImageViewer {
    fn kind(&self) -> PlayerKind {
        PlayerKind::Image
    }

    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    /// Keeps only files the viewer can decode.
    fn load_playlist(&mut self, files: Vec<PathBuf>) {
        let files = files
            .into_iter()
            .filter(|p| has_extension(p, VIEWER_EXTENSIONS))
            .collect();
        replace_playlist(self, files);
    }

    fn load_current(&mut self) {
        self.release();
        let Some(path) = self.state.current_path().map(|p| p.to_path_buf()) else {
            return;
        };
        self.slot = match Self::decode(&path) {
            Ok(picture) => {
                log::info!(
                    "Loaded image {} ({}x{})",
                    path.display(),
                    picture.width,
                    picture.height
                );
                Slot::Ready(picture)
            },
            Err(e) => {
                log::warn!("Cannot load image {}: {e}", path.display());
                Slot::Failed
            },
        };
    }

    fn play_pause(&mut self) {}

    fn stop(&mut self) {
        self.release();
        self.state.is_playing = false;
        self.state.position = 0.0;
    }

    fn seek(&mut self, _delta: f64) {}

    fn update(&mut self) {}

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<()> {
        for tex in self.stale.drain(..) {
            ctx.backend.destroy_texture(tex)?;
        }
        let theme = ctx.theme;
        let full = Rect::below_status_bar();
        ctx.backend
            .fill_rect(full.x, full.y, full.w, full.h, theme.bg)?;

        if self.state.current.is_none() {
            let text_h = ctx.backend.measure_text_height(FONT_BODY) as i32;
            return ctx.backend.draw_text_centered(
                "No Images Loaded",
                full.center_x(),
                full.center_y() - text_h / 2,
                FONT_BODY,
                theme.text,
            );
        }

        self.upload(ctx);
        match (&self.slot, self.texture) {
            (Slot::Ready(picture), Some(tex)) => {
                let dest = picture_area().centered(picture.width, picture.height);
                ctx.backend
                    .blit(tex, dest.x, dest.y, dest.w, dest.h)?;
            },
            _ => self.draw_placeholder(ctx)?,
        }

        if let Some(caption) = self.caption() {
            let max_w = full.w - 20;
            let fitted = ellipsize(&caption, max_w, |s| ctx.backend.measure_text(s, FONT_SMALL));
            let text_h = ctx.backend.measure_text_height(FONT_SMALL) as i32;
            ctx.backend.draw_text_centered(
                &fitted,
                full.center_x(),
                full.bottom() - 5 - text_h,
                FONT_SMALL,
                theme.text,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use image::{Rgba, RgbaImage};
    use pineapple_ui::test_utils::{DrawCall, MockBackend};
    use pineapple_ui::Theme;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn render(viewer: &mut ImageViewer, backend: &mut MockBackend) {
        let theme = Theme::default();
        let mut ctx = DrawContext::new(backend, &theme);
        viewer.draw(&mut ctx).unwrap();
    }

    #[test]
    fn fit_size_shrinks_preserving_aspect() {
        assert_eq!(fit_size(600, 400, 300, 180), (270, 180));
        assert_eq!(fit_size(1000, 100, 300, 180), (300, 30));
    }

    #[test]
    fn fit_size_keeps_small_images() {
        assert_eq!(fit_size(64, 32, 300, 180), (64, 32));
        assert_eq!(fit_size(0, 32, 300, 180), (0, 0));
    }

    #[test]
    fn load_decodes_and_fits() {
        let tmp = tempfile::tempdir().unwrap();
        let big = write_png(tmp.path(), "big.png", 600, 400);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![big]);
        let picture = viewer.picture().unwrap();
        assert_eq!((picture.width, picture.height), (270, 180));
        assert_eq!(picture.rgba.len(), 270 * 180 * 4);
        assert!(!viewer.is_playing());
    }

    #[test]
    fn playlist_drops_unsupported_files() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_png(tmp.path(), "a.png", 8, 8);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![tmp.path().join("notes.txt"), a]);
        assert_eq!(viewer.state().playlist.len(), 1);
        assert_eq!(viewer.state().current, Some(0));
    }

    #[test]
    fn broken_file_shows_placeholder_and_keeps_index() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("broken.png");
        std::fs::write(&bad, b"not a png").unwrap();
        let good = write_png(tmp.path(), "good.png", 8, 8);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![bad, good]);
        assert!(viewer.failed());
        assert_eq!(viewer.state().current, Some(0));

        let mut backend = MockBackend::new();
        render(&mut viewer, &mut backend);
        assert!(backend.has_text("Cannot load image"));
        assert!(backend.has_text("broken.png (1 of 2)"));

        viewer.next_track();
        assert_eq!(viewer.state().current, Some(1));
        assert!(!viewer.failed());
    }

    #[test]
    fn texture_uploaded_once_and_released_on_change() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_png(tmp.path(), "a.png", 16, 8);
        let b = write_png(tmp.path(), "b.png", 8, 16);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![a, b]);

        let mut backend = MockBackend::new();
        render(&mut viewer, &mut backend);
        render(&mut viewer, &mut backend);
        assert_eq!(backend.loaded_textures, vec![(16, 8)]);
        assert_eq!(backend.blit_count(), 2);

        viewer.next_track();
        render(&mut viewer, &mut backend);
        assert_eq!(backend.loaded_textures, vec![(16, 8), (8, 16)]);
        assert_eq!(backend.destroyed_textures, vec![TextureId(1)]);
    }

    #[test]
    fn blit_is_centred_in_picture_area() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_png(tmp.path(), "a.png", 100, 50);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![a]);
        let mut backend = MockBackend::new();
        render(&mut viewer, &mut backend);
        let blit = backend.calls.iter().find_map(|c| match c {
            DrawCall::Blit { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
            _ => None,
        });
        let area = picture_area();
        assert_eq!(
            blit,
            Some((area.center_x() - 50, area.center_y() - 25, 100, 50))
        );
    }

    #[test]
    fn empty_viewer_says_so() {
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(Vec::new());
        let mut backend = MockBackend::new();
        render(&mut viewer, &mut backend);
        assert!(backend.has_text("No Images Loaded"));
    }

    #[test]
    fn transport_is_inert() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_png(tmp.path(), "a.png", 4, 4);
        let mut viewer = ImageViewer::new();
        viewer.load_playlist(vec![a]);
        viewer.play_pause();
        viewer.seek(10.0);
        viewer.update();
        assert!(!viewer.is_playing());
        assert_eq!(viewer.state().position, 0.0);
        assert_eq!(viewer.state().duration, 0.0);
    }
}
