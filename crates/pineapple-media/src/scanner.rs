//! Media library scanning.
//!
//! Imported folders are scanned one level deep; files are matched by
//! extension, case-insensitively. Folders that no longer exist are skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Audio file extensions the mixer can open.
pub const MUSIC_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav", "flac"];
/// Video containers handed to the external player.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];
/// Image formats listed in the Photos menu.
pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];
/// Image formats the viewer accepts when a playlist is loaded.
pub const VIEWER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"];
/// Extension of imported game files.
pub const GAME_EXTENSION: &str = "ipg";

/// The three kinds of importable media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Music,
    Video,
    Photo,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Music => MUSIC_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
            Self::Photo => PHOTO_EXTENSIONS,
        }
    }

    /// Menu label for the library.
    pub fn label(self) -> &'static str {
        match self {
            Self::Music => "Music",
            Self::Video => "Videos",
            Self::Photo => "Photos",
        }
    }
}

/// Whether `path` has one of `extensions` (compared case-insensitively).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}

/// List the files directly inside each of `dirs` matching `extensions`.
///
/// Results keep the order of `dirs`; entries within one folder are sorted by
/// file name. Missing or unreadable folders contribute nothing.
pub fn scan_directories(dirs: &[PathBuf], extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            log::debug!("Skipping missing media folder {}", dir.display());
            continue;
        }
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read media folder {}: {e}", dir.display());
                continue;
            },
        };
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_extension(p, extensions))
            .collect();
        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files.extend(found.into_iter().map(|p| absolute(&p)));
    }
    files
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
