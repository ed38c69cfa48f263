//! Perfect Pineapple Player desktop entry point.
//!
//! iPod-style media player: music through SDL_mixer, videos in an external
//! `ffplay` window, photos scaled to the 320x240 screen. Arrow keys or the
//! d-pad navigate, Enter/A selects, Escape/B goes back, `[`/`]` or the
//! shoulder buttons seek, F11/Select toggles fullscreen.

mod desktop;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use desktop::{BrowserLinks, RfdPicker};
use pineapple_backend_sdl::{SdlBackend, SdlMixerAudio};
use pineapple_core::{Controller, JsonFileStore, Players, SettingsStore};
use pineapple_media::probe::{Ffprobe, MetadataProbe, NoProbe};
use pineapple_media::process::{FfplayLauncher, Launcher, ThreadedWindowFocus};
use pineapple_media::{AudioPlayer, ImageViewer, NoAudio, VideoPlayer, tools};
use pineapple_types::backend::{AudioBackend, DisplayBackend, InputBackend, SdiBackend};
use pineapple_types::clock::{Clock, SystemClock};
use pineapple_types::error::PineappleError;
use pineapple_ui::layout::{SCREEN_H, SCREEN_W};

const WINDOW_TITLE: &str = "Perfect Pineapple Player";
/// Set to start in a window instead of fullscreen.
const WINDOWED_ENV: &str = "PINEAPPLE_WINDOWED";
const FRAME_TIME: Duration = Duration::from_micros(16_667);
/// Consecutive failed frames (about one second) before giving up.
const MAX_FRAME_ERRORS: u32 = 60;

fn probe(exec: Option<PathBuf>) -> Box<dyn MetadataProbe> {
    match exec {
        Some(path) => Box::new(Ffprobe::new(path)),
        None => Box::new(NoProbe),
    }
}

/// Counts consecutive failed frames. A good frame resets the count.
#[derive(Debug, Default)]
struct FrameErrors {
    consecutive: u32,
}

impl FrameErrors {
    /// Log a failed frame and keep going, unless too many failed in a row.
    fn record(&mut self, frame: std::result::Result<(), PineappleError>) -> Result<()> {
        match frame {
            Ok(()) => {
                self.consecutive = 0;
                Ok(())
            },
            Err(e) => {
                self.consecutive += 1;
                log::error!("Frame failed ({}/{MAX_FRAME_ERRORS}): {e}", self.consecutive);
                if self.consecutive >= MAX_FRAME_ERRORS {
                    Err(anyhow::Error::new(e).context("rendering keeps failing"))
                } else {
                    Ok(())
                }
            },
        }
    }
}

fn audio_backend(backend: &SdlBackend) -> Box<dyn AudioBackend> {
    match SdlMixerAudio::new(backend.sdl()) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            log::error!("Cannot open the audio device, music disabled: {e}");
            Box::new(NoAudio)
        },
    }
}

fn run() -> Result<()> {
    log::info!("Starting {WINDOW_TITLE} ({SCREEN_W}x{SCREEN_H})");

    let settings_path =
        JsonFileStore::default_path().context("cannot locate the home directory")?;
    let store = JsonFileStore::new(settings_path);
    let mut settings = store.load();

    let app_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let path_var = std::env::var_os("PATH");
    let mut picker = RfdPicker;
    let found = settings.autodetect_tools(app_dir.as_deref(), path_var.as_deref())
        || settings.prompt_for_tools(&mut picker);
    if found {
        if let Err(e) = store.save(&settings) {
            log::warn!("Cannot save FFmpeg path: {e}");
        }
    }
    let tool_paths = tools::resolve(
        settings.ffmpeg_path.as_deref(),
        app_dir.as_deref(),
        path_var.as_deref(),
    );

    let mut backend = SdlBackend::new(WINDOW_TITLE, SCREEN_W, SCREEN_H)
        .context("cannot open the SDL window")?;
    backend.init(SCREEN_W, SCREEN_H)?;
    if std::env::var_os(WINDOWED_ENV).is_none() {
        if let Err(e) = backend.set_fullscreen(true) {
            log::warn!("Cannot enter fullscreen: {e}");
        }
    }
    let audio = audio_backend(&backend);

    let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
    let launcher: Option<Box<dyn Launcher>> = tool_paths
        .as_ref()
        .map(|paths| Box::new(FfplayLauncher::new(paths.ffplay.clone())) as Box<dyn Launcher>);
    let ffprobe = tool_paths.map(|paths| paths.ffprobe);

    let players = Players::new(
        AudioPlayer::new(audio, probe(ffprobe.clone()), Rc::clone(&clock)),
        VideoPlayer::new(
            launcher,
            probe(ffprobe),
            Box::new(ThreadedWindowFocus),
            Rc::clone(&clock),
        ),
        ImageViewer::new(),
    );
    let mut controller = Controller::new(
        settings,
        Box::new(store),
        players,
        Box::new(picker),
        Box::new(BrowserLinks),
        clock,
    );

    let mut frame_errors = FrameErrors::default();
    while controller.is_running() {
        let frame_start = Instant::now();

        let events = backend.poll_events();
        controller.handle_events(&events, &mut backend);
        controller.tick(&mut backend);

        let frame = controller
            .draw(&mut backend)
            .and_then(|()| backend.swap_buffers());
        frame_errors.record(frame)?;

        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    controller.shutdown();
    drop(controller);
    backend.shutdown()?;
    log::info!("{WINDOW_TITLE} shut down cleanly");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> std::result::Result<(), PineappleError> {
        Err(PineappleError::Backend("present failed".into()))
    }

    #[test]
    fn single_failed_frame_is_survived() {
        let mut errors = FrameErrors::default();
        assert!(errors.record(failure()).is_ok());
        assert!(errors.record(Ok(())).is_ok());
        assert_eq!(errors.consecutive, 0);
    }

    #[test]
    fn good_frame_resets_the_count() {
        let mut errors = FrameErrors::default();
        for _ in 0..MAX_FRAME_ERRORS - 1 {
            assert!(errors.record(failure()).is_ok());
        }
        assert!(errors.record(Ok(())).is_ok());
        for _ in 0..MAX_FRAME_ERRORS - 1 {
            assert!(errors.record(failure()).is_ok());
        }
    }

    #[test]
    fn persistent_failure_ends_the_run() {
        let mut errors = FrameErrors::default();
        for _ in 0..MAX_FRAME_ERRORS - 1 {
            assert!(errors.record(failure()).is_ok());
        }
        let err = errors.record(failure()).unwrap_err();
        assert!(format!("{err:#}").contains("present failed"));
        assert!(format!("{err:#}").contains("rendering keeps failing"));
    }
}
