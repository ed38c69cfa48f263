//! External-process video player.
//!
//! Video is rendered by a separate `ffplay` process that can only be
//! launched at an offset, polled for liveness and terminated. Pausing
//! snapshots the estimated position and terminates the process; playing
//! again relaunches at the snapshot. Position is an estimate: wall-clock
//! time since launch plus the launch offset.

use std::rc::Rc;

use pineapple_types::backend::Color;
use pineapple_types::clock::Clock;
use pineapple_types::error::Result;
use pineapple_ui::layout::Rect;
use pineapple_ui::DrawContext;

use crate::player::{MediaPlayer, PlayerKind, PlayerState, draw_transport};
use crate::probe::MetadataProbe;
use crate::process::{ExternalProcess, LaunchRequest, Launcher, WindowFocus};

pub const MSG_DISABLED: &str = "Video Playback Disabled (FFmpeg path not set/valid)";
pub const MSG_NO_VIDEO: &str = "No video loaded.";
pub const MSG_PLAYING: &str = "Video playing in separate window...";
pub const MSG_STOPPED: &str = "Video paused/stopped (external window closed)";

/// Video player driving an external process.
pub struct VideoPlayer {
    state: PlayerState,
    /// `None` disables playback for the session.
    launcher: Option<Box<dyn Launcher>>,
    probe: Box<dyn MetadataProbe>,
    focus: Box<dyn WindowFocus>,
    clock: Rc<dyn Clock>,
    process: Option<Box<dyn ExternalProcess>>,
    /// Clock reading at which position 0 would have been shown.
    anchor: f64,
    dimensions: Option<(u32, u32)>,
}

impl VideoPlayer {
    pub fn new(
        launcher: Option<Box<dyn Launcher>>,
        probe: Box<dyn MetadataProbe>,
        focus: Box<dyn WindowFocus>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        if launcher.is_none() {
            log::warn!("Video playback disabled: no usable ffplay");
        }
        Self {
            state: PlayerState::default(),
            launcher,
            probe,
            focus,
            clock,
            process: None,
            anchor: 0.0,
            dimensions: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.launcher.is_some()
    }

    /// Frame size reported by the probe for the current video.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Whether an external process was started and has since exited on
    /// its own. Non-blocking.
    pub fn external_exited(&mut self) -> bool {
        self.process.as_mut().is_some_and(|p| p.has_exited())
    }

    /// Ask the OS to raise the external player window.
    pub fn request_focus(&self) {
        let Some(process) = self.process.as_ref() else {
            log::debug!("No video process to focus");
            return;
        };
        let title = self
            .state
            .current_path()
            .map(crate::process::window_title)
            .unwrap_or_default();
        self.focus.focus(process.id(), &title);
    }

    fn launch(&mut self, start: f64) -> bool {
        let Some(path) = self.state.current_path() else {
            return false;
        };
        let request = LaunchRequest::new(path, start);
        let Some(launcher) = self.launcher.as_mut() else {
            return false;
        };
        match launcher.launch(&request) {
            Ok(process) => {
                self.process = Some(process);
                self.state.position = request.start_offset;
                self.anchor = self.clock.now_secs() - request.start_offset;
                true
            },
            Err(e) => {
                log::warn!("{e}");
                false
            },
        }
    }

    fn stop_process(&mut self) {
        if let Some(mut process) = self.process.take() {
            process.terminate();
        }
    }

    fn estimate_position(&mut self) {
        let mut position = (self.clock.now_secs() - self.anchor).max(0.0);
        if self.state.duration > 0.0 {
            position = position.min(self.state.duration);
        }
        self.state.position = position;
    }

    fn message(&self) -> (&'static str, Option<Color>) {
        if !self.is_enabled() {
            (MSG_DISABLED, Some(Color::RED))
        } else if self.state.current.is_none() {
            (MSG_NO_VIDEO, None)
        } else if self.state.is_playing {
            (MSG_PLAYING, None)
        } else {
            (MSG_STOPPED, None)
        }
    }
}

impl MediaPlayer for VideoPlayer {
    fn kind(&self) -> PlayerKind {
        PlayerKind::Video
    }

    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn load_current(&mut self) {
        self.stop_process();
        self.state.is_playing = false;
        self.state.position = 0.0;
        self.state.duration = 0.0;
        self.dimensions = None;
        if !self.is_enabled() {
            return;
        }
        let Some(path) = self.state.current_path().map(|p| p.to_path_buf()) else {
            return;
        };
        let info = self.probe.video_info(&path);
        self.state.duration = info.duration;
        self.dimensions = info.dimensions;
        log::info!("Loaded video {} ({:.1}s)", path.display(), info.duration);
    }

    fn play_pause(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        if self.state.is_playing {
            self.estimate_position();
            self.stop_process();
            self.state.is_playing = false;
        } else {
            self.stop_process();
            let start = self.state.position;
            self.state.is_playing = self.launch(start);
        }
    }

    fn stop(&mut self) {
        self.stop_process();
        self.state.is_playing = false;
        self.state.position = 0.0;
    }

    fn seek(&mut self, delta: f64) {
        if !self.is_enabled() {
            return;
        }
        if self.state.is_playing {
            self.estimate_position();
        }
        let Some(target) = self.state.seek_target(delta) else {
            return;
        };
        let was_playing = self.state.is_playing;
        self.stop_process();
        self.state.position = target;
        self.state.is_playing = was_playing && self.launch(target);
    }

    fn update(&mut self) {
        if !self.state.is_playing {
            return;
        }
        if self.external_exited() {
            log::info!("Video process exited");
            self.process = None;
            self.state.is_playing = false;
            if self.state.duration > 0.0 {
                self.state.position = self.state.duration;
            }
        } else {
            self.estimate_position();
        }
        if self.state.duration > 0.0 && self.state.position >= self.state.duration {
            self.next_track();
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<()> {
        let (text, color) = self.message();
        let color = color.unwrap_or(ctx.theme.text);
        draw_transport(ctx, &self.state, Rect::main_area(), Some((text, color)))
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        self.stop_process();
    }
}
