//! Discovery and validation of the external FFmpeg tools.
//!
//! A tool directory is usable only when it holds both `ffprobe` and
//! `ffplay`. Anything less leaves video playback disabled.

use std::env::consts::EXE_SUFFIX;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Base name of the metadata probe executable.
pub const FFPROBE: &str = "ffprobe";
/// Base name of the external video player executable.
pub const FFPLAY: &str = "ffplay";

/// Platform file name of a tool, e.g. `ffplay.exe` on Windows.
pub fn tool_file_name(base: &str) -> String {
    format!("{base}{EXE_SUFFIX}")
}

/// Validated locations of both FFmpeg tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub dir: PathBuf,
    pub ffprobe: PathBuf,
    pub ffplay: PathBuf,
}

impl ToolPaths {
    /// Accept `dir` only if both executables exist inside it.
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let ffprobe = dir.join(tool_file_name(FFPROBE));
        let ffplay = dir.join(tool_file_name(FFPLAY));
        if ffprobe.is_file() && ffplay.is_file() {
            Some(Self {
                dir: dir.to_path_buf(),
                ffprobe,
                ffplay,
            })
        } else {
            None
        }
    }
}

/// Look for the tools next to the application, then in its `bin/` folder.
pub fn autodetect(base: &Path) -> Option<ToolPaths> {
    ToolPaths::from_dir(base).or_else(|| ToolPaths::from_dir(&base.join("bin")))
}

/// First directory of a `PATH`-style list holding both tools.
pub fn search_path(path_var: &OsStr) -> Option<ToolPaths> {
    std::env::split_paths(path_var).find_map(|dir| ToolPaths::from_dir(&dir))
}

/// Resolve the configured tool directory, falling back to autodetection
/// under `app_dir`, then to the directories in `path_var`. An invalid
/// configured directory is logged and ignored.
pub fn resolve(
    configured: Option<&Path>,
    app_dir: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Option<ToolPaths> {
    if let Some(dir) = configured {
        match ToolPaths::from_dir(dir) {
            Some(paths) => return Some(paths),
            None => log::warn!(
                "FFmpeg directory {} lacks {} and {}",
                dir.display(),
                tool_file_name(FFPROBE),
                tool_file_name(FFPLAY)
            ),
        }
    }
    let found = app_dir
        .and_then(autodetect)
        .or_else(|| path_var.and_then(search_path));
    match &found {
        Some(paths) => log::info!("Found FFmpeg tools in {}", paths.dir.display()),
        None => log::warn!("FFmpeg tools not found; video playback disabled"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn install(dir: &Path, tools: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for t in tools {
            fs::write(dir.join(tool_file_name(t)), b"").unwrap();
        }
    }

    #[test]
    fn both_tools_required() {
        let tmp = tempfile::tempdir().unwrap();
        install(tmp.path(), &[FFPROBE]);
        assert!(ToolPaths::from_dir(tmp.path()).is_none());
        install(tmp.path(), &[FFPLAY]);
        let paths = ToolPaths::from_dir(tmp.path()).unwrap();
        assert!(paths.ffplay.ends_with(tool_file_name(FFPLAY)));
        assert_eq!(paths.dir, tmp.path());
    }

    #[test]
    fn autodetect_checks_bin_folder() {
        let tmp = tempfile::tempdir().unwrap();
        install(&tmp.path().join("bin"), &[FFPROBE, FFPLAY]);
        let paths = autodetect(tmp.path()).unwrap();
        assert_eq!(paths.dir, tmp.path().join("bin"));
    }

    #[test]
    fn autodetect_prefers_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        install(tmp.path(), &[FFPROBE, FFPLAY]);
        install(&tmp.path().join("bin"), &[FFPROBE, FFPLAY]);
        assert_eq!(autodetect(tmp.path()).unwrap().dir, tmp.path());
    }

    #[test]
    fn resolve_falls_back_when_configured_invalid() {
        let app = tempfile::tempdir().unwrap();
        let bogus = tempfile::tempdir().unwrap();
        install(app.path(), &[FFPROBE, FFPLAY]);
        let paths = resolve(Some(bogus.path()), Some(app.path()), None).unwrap();
        assert_eq!(paths.dir, app.path());
    }

    #[test]
    fn resolve_nothing_found() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(resolve(Some(tmp.path()), Some(tmp.path()), None).is_none());
        assert!(resolve(None, None, None).is_none());
    }

    #[test]
    fn search_path_finds_first_complete_dir() {
        let partial = tempfile::tempdir().unwrap();
        let full = tempfile::tempdir().unwrap();
        let later = tempfile::tempdir().unwrap();
        install(partial.path(), &[FFPLAY]);
        install(full.path(), &[FFPROBE, FFPLAY]);
        install(later.path(), &[FFPROBE, FFPLAY]);
        let var = std::env::join_paths([partial.path(), full.path(), later.path()]).unwrap();
        assert_eq!(search_path(&var).unwrap().dir, full.path());
    }

    #[test]
    fn resolve_uses_path_when_app_dir_empty() {
        let app = tempfile::tempdir().unwrap();
        let on_path = tempfile::tempdir().unwrap();
        install(on_path.path(), &[FFPROBE, FFPLAY]);
        let var = std::env::join_paths([on_path.path()]).unwrap();
        let paths = resolve(None, Some(app.path()), Some(&var)).unwrap();
        assert_eq!(paths.dir, on_path.path());
    }
}
