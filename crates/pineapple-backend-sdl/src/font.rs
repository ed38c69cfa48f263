//! TrueType font discovery and a per-size font cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sdl2::ttf::{Font, Sdl2TtfContext};

use pineapple_types::error::{PineappleError, Result};

/// Environment variable naming the font file to use.
pub const FONT_ENV: &str = "PINEAPPLE_FONT";
/// Secondary override shared with other SDL front ends.
pub const FONT_ENV_FALLBACK: &str = "FONT_PATH";

/// System fonts tried in order when no override is set.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Pick the font file: an existing override first, then the first
/// candidate that exists.
pub fn find_font(overrides: &[Option<PathBuf>], candidates: &[&str]) -> Option<PathBuf> {
    overrides
        .iter()
        .flatten()
        .find(|p| p.is_file())
        .cloned()
        .or_else(|| {
            candidates
                .iter()
                .map(Path::new)
                .find(|p| p.is_file())
                .map(Path::to_path_buf)
        })
}

/// Font file from the environment overrides or the system candidates.
pub fn discover() -> Option<PathBuf> {
    let overrides = [
        std::env::var_os(FONT_ENV).map(PathBuf::from),
        std::env::var_os(FONT_ENV_FALLBACK).map(PathBuf::from),
    ];
    find_font(&overrides, FONT_CANDIDATES)
}

/// One font file opened at every size asked for so far.
pub struct FontCache {
    ttf: &'static Sdl2TtfContext,
    path: PathBuf,
    fonts: RefCell<HashMap<u16, Font<'static, 'static>>>,
}

impl FontCache {
    /// Initialise SDL_ttf and check that `path` opens.
    pub fn new(path: PathBuf) -> Result<Self> {
        let ttf = sdl2::ttf::init().map_err(|e| PineappleError::Backend(e.to_string()))?;
        // The TTF context must outlive every cached font, which live as long
        // as the backend. One context per process.
        let ttf: &'static Sdl2TtfContext = Box::leak(Box::new(ttf));
        let cache = Self {
            ttf,
            path,
            fonts: RefCell::new(HashMap::new()),
        };
        cache.with_font(16, |_| ())?;
        log::info!("Using font {}", cache.path.display());
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` with the font at `size`, opening it on first use.
    pub fn with_font<R>(&self, size: u16, f: impl FnOnce(&Font<'static, 'static>) -> R) -> Result<R> {
        let mut fonts = self.fonts.borrow_mut();
        if !fonts.contains_key(&size) {
            let font = self
                .ttf
                .load_font(&self.path, size)
                .map_err(|e| PineappleError::Backend(format!("{}: {e}", self.path.display())))?;
            fonts.insert(size, font);
        }
        match fonts.get(&size) {
            Some(font) => Ok(f(font)),
            None => Err(PineappleError::Backend(format!("font size {size} unavailable"))),
        }
    }

    /// Rendered width of `text`, 0 on failure.
    pub fn width(&self, text: &str, size: u16) -> u32 {
        if text.is_empty() {
            return 0;
        }
        self.with_font(size, |font| font.size_of(text).map(|(w, _)| w).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Recommended distance between baselines.
    pub fn line_height(&self, size: u16) -> u32 {
        self.with_font(size, |font| font.recommended_line_spacing().max(0) as u32)
            .unwrap_or(size as u32)
    }
}
