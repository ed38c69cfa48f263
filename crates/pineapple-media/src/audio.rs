//! In-process audio player.
//!
//! Playback goes through an [`AudioBackend`] holding a single stream.
//! The backend has no position readback, so the position is tracked
//! against a [`Clock`]: while playing, `position = now - anchor`, and
//! every resume or seek re-anchors at the current position.

use std::path::Path;
use std::rc::Rc;

use pineapple_types::backend::AudioBackend;
use pineapple_types::clock::Clock;
use pineapple_types::error::{PineappleError, Result};
use pineapple_ui::layout::Rect;
use pineapple_ui::DrawContext;

use crate::player::{MediaPlayer, PlayerKind, PlayerState, draw_transport};
use crate::probe::MetadataProbe;

/// Backend used when no audio device could be opened. Every track is
/// unplayable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioBackend for NoAudio {
    fn load(&mut self, path: &Path) -> Result<()> {
        Err(PineappleError::Media(format!(
            "{}: no audio device",
            path.display()
        )))
    }

    fn play(&mut self) -> Result<()> {
        Err(PineappleError::Media("no audio device".into()))
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        Err(PineappleError::Media("no audio device".into()))
    }

    fn seek(&mut self, _position_secs: f64) -> Result<()> {
        Ok(())
    }

    fn unload(&mut self) {}

    fn is_loaded(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    /// Loaded but not started (or stopped).
    Idle,
    Playing,
    Paused,
}

/// Music player backed by an in-process mixer.
pub struct AudioPlayer {
    state: PlayerState,
    backend: Box<dyn AudioBackend>,
    probe: Box<dyn MetadataProbe>,
    clock: Rc<dyn Clock>,
    transport: Transport,
    /// Clock reading at which position 0 would have been played.
    anchor: f64,
}

impl AudioPlayer {
    pub fn new(
        backend: Box<dyn AudioBackend>,
        probe: Box<dyn MetadataProbe>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            state: PlayerState::default(),
            backend,
            probe,
            clock,
            transport: Transport::Idle,
            anchor: 0.0,
        }
    }

    fn reanchor(&mut self) {
        self.anchor = self.clock.now_secs() - self.state.position;
    }

    fn open_current(&mut self) -> bool {
        let Some(path) = self.state.current_path().map(|p| p.to_path_buf()) else {
            return false;
        };
        match self.backend.load(&path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cannot open {}: {e}", path.display());
                false
            },
        }
    }

    fn start(&mut self) {
        if !self.backend.is_loaded() && !self.open_current() {
            return;
        }
        if let Err(e) = self.backend.play() {
            log::warn!("Audio playback failed: {e}");
            return;
        }
        if self.state.position > 0.0 {
            if let Err(e) = self.backend.seek(self.state.position) {
                log::warn!("Audio seek failed: {e}");
            }
        }
        self.reanchor();
        self.transport = Transport::Playing;
        self.state.is_playing = true;
    }

    fn pause(&mut self) {
        self.track_position();
        if let Err(e) = self.backend.pause() {
            log::warn!("Audio pause failed: {e}");
        }
        self.transport = Transport::Paused;
        self.state.is_playing = false;
    }

    fn resume(&mut self) {
        if let Err(e) = self.backend.resume() {
            log::warn!("Audio resume failed: {e}");
            return;
        }
        self.reanchor();
        self.transport = Transport::Playing;
        self.state.is_playing = true;
    }

    fn track_position(&mut self) {
        if self.transport != Transport::Playing {
            return;
        }
        let mut position = (self.clock.now_secs() - self.anchor).max(0.0);
        if self.state.duration > 0.0 {
            position = position.min(self.state.duration);
        }
        self.state.position = position;
    }
}

impl MediaPlayer for AudioPlayer {
    fn kind(&self) -> PlayerKind {
        PlayerKind::Audio
    }

    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn load_current(&mut self) {
        self.transport = Transport::Idle;
        self.state.is_playing = false;
        self.state.position = 0.0;
        self.state.duration = 0.0;
        let Some(path) = self.state.current_path().map(|p| p.to_path_buf()) else {
            return;
        };
        if !self.open_current() {
            self.state.current = None;
            return;
        }
        self.state.duration = self.probe.audio_duration(&path);
        log::info!(
            "Loaded {} ({:.1}s)",
            path.display(),
            self.state.duration
        );
    }

    fn play_pause(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        match self.transport {
            Transport::Idle => self.start(),
            Transport::Playing => self.pause(),
            Transport::Paused => self.resume(),
        }
    }

    fn stop(&mut self) {
        self.backend.unload();
        self.transport = Transport::Idle;
        self.state.is_playing = false;
        self.state.position = 0.0;
    }

    fn seek(&mut self, delta: f64) {
        self.track_position();
        let Some(target) = self.state.seek_target(delta) else {
            return;
        };
        if self.transport != Transport::Idle {
            if let Err(e) = self.backend.seek(target) {
                log::warn!("Audio seek failed: {e}");
            }
        }
        self.state.position = target;
        self.reanchor();
    }

    fn update(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.track_position();
        if self.state.duration > 0.0 && self.state.position >= self.state.duration {
            log::debug!("Track finished, advancing");
            self.next_track();
        }
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<()> {
        draw_transport(ctx, &self.state, Rect::main_area(), None)
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.backend.unload();
    }
}
