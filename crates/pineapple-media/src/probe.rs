//! Out-of-process metadata probing through `ffprobe`.
//!
//! Probing is best-effort: a missing tool, a failed run or unparseable
//! output all yield a zero duration and never an error.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

/// What a probe could learn about a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaInfo {
    /// Seconds; 0 when unknown.
    pub duration: f64,
    /// Width and height of the first video stream, if any.
    pub dimensions: Option<(u32, u32)>,
}

/// Source of duration and dimension metadata.
pub trait MetadataProbe {
    /// Container duration of an audio file in seconds, 0 when unknown.
    fn audio_duration(&self, path: &Path) -> f64;

    /// Duration and frame size of the first video stream.
    fn video_info(&self, path: &Path) -> MediaInfo;
}

/// Probe used when no `ffprobe` is configured. Knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl MetadataProbe for NoProbe {
    fn audio_duration(&self, _path: &Path) -> f64 {
        0.0
    }

    fn video_info(&self, _path: &Path) -> MediaInfo {
        MediaInfo::default()
    }
}

/// Runs an `ffprobe` executable and parses its output.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    exec: PathBuf,
}

impl Ffprobe {
    pub fn new(exec: impl Into<PathBuf>) -> Self {
        Self { exec: exec.into() }
    }

    pub fn exec(&self) -> &Path {
        &self.exec
    }

    fn run(&self, args: &[&str], path: &Path) -> Option<String> {
        let mut cmd = Command::new(&self.exec);
        cmd.args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console(&mut cmd);
        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Failed to run {}: {e}", self.exec.display());
                return None;
            },
        };
        if !output.status.success() {
            log::warn!(
                "ffprobe failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl MetadataProbe for Ffprobe {
    fn audio_duration(&self, path: &Path) -> f64 {
        let args = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ];
        let duration = self
            .run(&args, path)
            .map(|out| parse_format_duration(&out))
            .unwrap_or(0.0);
        if duration <= 0.0 {
            log::info!("Duration unknown for {}", path.display());
        }
        duration
    }

    fn video_info(&self, path: &Path) -> MediaInfo {
        let args = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,duration",
            "-of",
            "json",
        ];
        self.run(&args, path)
            .map(|out| parse_stream_info(&out))
            .unwrap_or_default()
    }
}

#[cfg(windows)]
fn hide_console(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_cmd: &mut Command) {}

/// Parse the bare number printed for `format=duration`.
pub fn parse_format_duration(output: &str) -> f64 {
    output
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0)
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// Parse `ffprobe -of json` stream output.
pub fn parse_stream_info(output: &str) -> MediaInfo {
    let parsed: ProbeOutput = match serde_json::from_str(output) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Unreadable ffprobe output: {e}");
            return MediaInfo::default();
        },
    };
    let Some(stream) = parsed.streams.into_iter().next() else {
        return MediaInfo::default();
    };
    let duration = stream
        .duration
        .as_deref()
        .map(parse_format_duration)
        .unwrap_or(0.0);
    let dimensions = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    };
    MediaInfo {
        duration,
        dimensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_parses_number() {
        assert!((parse_format_duration("183.456000\n") - 183.456).abs() < 1e-9);
    }

    #[test]
    fn format_duration_rejects_garbage() {
        assert_eq!(parse_format_duration("N/A\n"), 0.0);
        assert_eq!(parse_format_duration(""), 0.0);
        assert_eq!(parse_format_duration("-3"), 0.0);
    }

    #[test]
    fn stream_info_reads_json() {
        let json = r#"{"programs":[],"streams":[{"width":1920,"height":1080,"duration":"12.500000"}]}"#;
        let info = parse_stream_info(json);
        assert_eq!(info.dimensions, Some((1920, 1080)));
        assert!((info.duration - 12.5).abs() < 1e-9);
    }

    #[test]
    fn stream_info_without_duration() {
        let json = r#"{"streams":[{"width":640,"height":480}]}"#;
        let info = parse_stream_info(json);
        assert_eq!(info.duration, 0.0);
        assert_eq!(info.dimensions, Some((640, 480)));
    }

    #[test]
    fn stream_info_no_streams_or_bad_json() {
        assert_eq!(parse_stream_info(r#"{"streams":[]}"#), MediaInfo::default());
        assert_eq!(parse_stream_info("not json"), MediaInfo::default());
    }

    #[test]
    fn missing_executable_yields_zero() {
        let probe = Ffprobe::new("/nonexistent/ffprobe-binary");
        assert_eq!(probe.audio_duration(Path::new("/tmp/a.mp3")), 0.0);
        assert_eq!(probe.video_info(Path::new("/tmp/a.mp4")), MediaInfo::default());
    }

    #[test]
    fn no_probe_knows_nothing() {
        assert_eq!(NoProbe.audio_duration(Path::new("a.mp3")), 0.0);
        assert_eq!(NoProbe.video_info(Path::new("a.mp4")).dimensions, None);
    }
}
