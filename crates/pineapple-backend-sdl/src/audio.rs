//! SDL_mixer music stream behind the `AudioBackend` trait.

use std::path::Path;

use sdl2::AudioSubsystem;
use sdl2::mixer::{self, InitFlag, Music, Sdl2MixerContext};

use pineapple_types::backend::AudioBackend;
use pineapple_types::error::{PineappleError, Result};

const CHUNK_SIZE: i32 = 1024;

fn mixer_err(e: String) -> PineappleError {
    PineappleError::Media(e)
}

/// Streams one music file at a time through SDL_mixer.
pub struct SdlMixerAudio {
    music: Option<Music<'static>>,
    /// Absent when SDL_mixer reported missing codecs.
    _mixer: Option<Sdl2MixerContext>,
    _audio: AudioSubsystem,
}

impl SdlMixerAudio {
    /// Open the default audio device and load the codec libraries. Fails
    /// only when the device cannot be opened; missing codecs are logged.
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self> {
        let audio = sdl.audio().map_err(PineappleError::Backend)?;
        mixer::open_audio(
            mixer::DEFAULT_FREQUENCY,
            mixer::DEFAULT_FORMAT,
            mixer::DEFAULT_CHANNELS,
            CHUNK_SIZE,
        )
        .map_err(PineappleError::Backend)?;
        let context = match mixer::init(InitFlag::MP3 | InitFlag::OGG | InitFlag::FLAC) {
            Ok(context) => Some(context),
            Err(e) => {
                log::warn!("Some SDL_mixer codecs are unavailable: {e}");
                None
            },
        };
        log::info!("SDL_mixer audio opened");
        Ok(Self {
            music: None,
            _mixer: context,
            _audio: audio,
        })
    }
}

impl AudioBackend for SdlMixerAudio {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.unload();
        let music = Music::from_file(path)
            .map_err(|e| PineappleError::Media(format!("{}: {e}", path.display())))?;
        self.music = Some(music);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let music = self
            .music
            .as_ref()
            .ok_or_else(|| PineappleError::Media("no stream loaded".into()))?;
        music.play(1).map_err(mixer_err)
    }

    fn pause(&mut self) -> Result<()> {
        Music::pause();
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        Music::resume();
        Ok(())
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        if self.music.is_none() {
            return Ok(());
        }
        Music::set_pos(position_secs.max(0.0)).map_err(mixer_err)
    }

    fn unload(&mut self) {
        if self.music.take().is_some() {
            Music::halt();
        }
    }

    fn is_loaded(&self) -> bool {
        self.music.is_some()
    }
}

impl Drop for SdlMixerAudio {
    fn drop(&mut self) {
        self.unload();
        mixer::close_audio();
    }
}
