//! Persisted user settings.
//!
//! Stored as pretty-printed JSON. Every key has a default so partial or
//! older files still load; a malformed file falls back to defaults. After
//! loading, an unknown theme becomes the default theme and an FFmpeg
//! directory missing either tool is dropped.

use std::cell::RefCell;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pineapple_media::MediaKind;
use pineapple_media::tools::{self, ToolPaths};
use pineapple_types::error::{PineappleError, Result};
use pineapple_ui::theme::{self, DEFAULT_THEME};
use serde::{Deserialize, Serialize};

use crate::collaborators::FilePicker;

/// File name used in the home directory.
pub const SETTINGS_FILE_NAME: &str = "ipod_settings.json";
/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "PINEAPPLE_SETTINGS";
/// Title of the folder picker asking for the FFmpeg tools.
pub const FFMPEG_PICKER_TITLE: &str = "Select FFmpeg Directory";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub music_dirs: Vec<PathBuf>,
    pub video_dirs: Vec<PathBuf>,
    pub image_dirs: Vec<PathBuf>,
    /// Directory holding `ffprobe` and `ffplay`.
    pub ffmpeg_path: Option<PathBuf>,
    pub games: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            music_dirs: Vec::new(),
            video_dirs: Vec::new(),
            image_dirs: Vec::new(),
            ffmpeg_path: None,
            games: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings JSON and normalise it.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(text)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace an unregistered theme and an unusable FFmpeg directory.
    pub fn normalize(&mut self) {
        if !theme::is_registered(&self.theme) {
            log::warn!(
                "Unknown theme {:?}, using {DEFAULT_THEME}",
                self.theme
            );
            self.theme = DEFAULT_THEME.to_string();
        }
        if let Some(dir) = &self.ffmpeg_path {
            if ToolPaths::from_dir(dir).is_none() {
                log::warn!(
                    "Stored FFmpeg directory {} is invalid, ignoring it",
                    dir.display()
                );
                self.ffmpeg_path = None;
            }
        }
    }

    /// Fill in `ffmpeg_path` from tools found under `app_dir`, then on the
    /// `PATH`-style list `path_var`, when no usable directory is stored.
    /// Returns true if the settings changed.
    pub fn autodetect_tools(&mut self, app_dir: Option<&Path>, path_var: Option<&OsStr>) -> bool {
        if self.tools().is_some() {
            return false;
        }
        let found = app_dir
            .and_then(tools::autodetect)
            .or_else(|| path_var.and_then(tools::search_path));
        match found {
            Some(found) => {
                log::info!("Auto-detected FFmpeg tools in {}", found.dir.display());
                self.ffmpeg_path = Some(found.dir);
                true
            },
            None => false,
        }
    }

    /// Ask for the FFmpeg directory until a folder holding both tools is
    /// picked or the picker is cancelled. Returns true if the settings
    /// changed.
    pub fn prompt_for_tools(&mut self, picker: &mut dyn FilePicker) -> bool {
        if self.tools().is_some() {
            return false;
        }
        while let Some(dir) = picker.pick_directory(FFMPEG_PICKER_TITLE) {
            match ToolPaths::from_dir(&dir) {
                Some(found) => {
                    log::info!("FFmpeg path set to {}", found.dir.display());
                    self.ffmpeg_path = Some(found.dir);
                    return true;
                },
                None => log::warn!(
                    "{} does not contain {} and {}",
                    dir.display(),
                    tools::tool_file_name(tools::FFPROBE),
                    tools::tool_file_name(tools::FFPLAY)
                ),
            }
        }
        log::warn!("No FFmpeg directory provided; video playback disabled");
        false
    }

    /// Validated tool locations, if any.
    pub fn tools(&self) -> Option<ToolPaths> {
        self.ffmpeg_path.as_deref().and_then(ToolPaths::from_dir)
    }

    pub fn dirs(&self, kind: MediaKind) -> &[PathBuf] {
        match kind {
            MediaKind::Music => &self.music_dirs,
            MediaKind::Video => &self.video_dirs,
            MediaKind::Photo => &self.image_dirs,
        }
    }

    fn dirs_mut(&mut self, kind: MediaKind) -> &mut Vec<PathBuf> {
        match kind {
            MediaKind::Music => &mut self.music_dirs,
            MediaKind::Video => &mut self.video_dirs,
            MediaKind::Photo => &mut self.image_dirs,
        }
    }

    /// Import a library folder. Returns false if it was already imported.
    pub fn add_dir(&mut self, kind: MediaKind, dir: PathBuf) -> bool {
        let dirs = self.dirs_mut(kind);
        if dirs.contains(&dir) {
            return false;
        }
        dirs.push(dir);
        true
    }

    /// Import game files, skipping ones already present. Returns how many
    /// were added.
    pub fn add_games(&mut self, files: Vec<PathBuf>) -> usize {
        let mut added = 0;
        for file in files {
            if !self.games.contains(&file) {
                self.games.push(file);
                added += 1;
            }
        }
        added
    }

    /// Forget every imported folder and game.
    pub fn reset_imports(&mut self) {
        self.music_dirs.clear();
        self.video_dirs.clear();
        self.image_dirs.clear();
        self.games.clear();
    }
}

/// Where settings are loaded from and saved to.
pub trait SettingsStore {
    /// Load settings, falling back to defaults on any problem.
    fn load(&self) -> Settings;

    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$PINEAPPLE_SETTINGS`, else `ipod_settings.json` in the home folder.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Settings {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No settings at {}, using defaults",
                    self.path.display()
                );
                return Settings::default();
            },
            Err(e) => {
                log::warn!("Cannot read {}: {e}, using defaults", self.path.display());
                return Settings::default();
            },
        };
        match Settings::from_json(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", self.path.display());
                settings
            },
            Err(e) => {
                log::warn!("Malformed settings {}: {e}, using defaults", self.path.display());
                Settings::default()
            },
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, settings.to_json()?).map_err(|e| {
            PineappleError::Config(format!("cannot write {}: {e}", self.path.display()))
        })?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store. Clones share the saved value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<Settings>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: Settings) -> Self {
        let store = Self::new();
        *store.saved.borrow_mut() = Some(settings);
        store
    }

    /// Last saved settings.
    pub fn saved(&self) -> Option<Settings> {
        self.saved.borrow().clone()
    }

    /// Number of saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Settings {
        let mut settings = self.saved().unwrap_or_default();
        settings.normalize();
        settings
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.saved.borrow_mut() = Some(settings.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
