//! The lifecycle shared by all three players.
//!
//! A player owns a playlist and a current index. `Empty` has no index;
//! loading a track moves to `Loaded`; `play_pause` toggles between
//! `Playing` and `Paused`; `stop` returns to `Loaded` at position 0.
//! Skipping wraps around the playlist and always autoplays.

use std::path::{Path, PathBuf};

use pineapple_types::backend::{Color, ellipsize};
use pineapple_types::error::Result;
use pineapple_ui::layout::{FONT_BODY, FONT_SMALL, Rect};
use pineapple_ui::progress_bar::ProgressBar;
use pineapple_ui::text::{format_time, wrap_lines};
use pineapple_ui::DrawContext;

/// Which player variant a [`MediaPlayer`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerKind {
    Audio,
    Video,
    Image,
}

/// Playlist and transport state common to every player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub playlist: Vec<PathBuf>,
    /// `None` when nothing is selected.
    pub current: Option<usize>,
    pub is_playing: bool,
    /// Seconds into the current track.
    pub position: f64,
    /// Track length in seconds; 0 when unknown.
    pub duration: f64,
}

impl PlayerState {
    pub fn current_path(&self) -> Option<&Path> {
        self.current
            .and_then(|i| self.playlist.get(i))
            .map(PathBuf::as_path)
    }

    /// File name of the current track.
    pub fn current_title(&self) -> Option<String> {
        self.current_path()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// "Playing", "Paused" or "Stopped".
    pub fn status_label(&self) -> &'static str {
        if self.is_playing {
            "Playing"
        } else if self.current.is_some() && self.position > 0.0 {
            "Paused"
        } else {
            "Stopped"
        }
    }

    /// Clamp a relative seek to `[0, duration]`. `None` when seeking is not
    /// possible (no track, or unknown duration).
    pub fn seek_target(&self, delta: f64) -> Option<f64> {
        if self.current.is_none() || self.duration <= 0.0 {
            return None;
        }
        Some((self.position + delta).clamp(0.0, self.duration))
    }

    /// Wrapped index `step` places away from the current one.
    fn wrapped_index(&self, step: isize) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        let from = self.current.unwrap_or(0) as isize;
        Some((from + step).rem_euclid(len as isize) as usize)
    }
}

/// Load, transport and draw operations shared by the three players.
pub trait MediaPlayer {
    fn kind(&self) -> PlayerKind;

    fn state(&self) -> &PlayerState;

    fn state_mut(&mut self) -> &mut PlayerState;

    /// Open the track at the current index (decoder, probe or decode).
    /// Failures are recorded on the player, never returned.
    fn load_current(&mut self);

    /// Toggle between playing and paused. No-op without a current track.
    fn play_pause(&mut self);

    /// Halt playback, reset the position and release backend resources.
    fn stop(&mut self);

    /// Jump by `delta` seconds, clamped to the track.
    fn seek(&mut self, delta: f64);

    /// Per-frame position update and end-of-track handling.
    fn update(&mut self);

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<()>;

    /// Replace the playlist and load its first entry. Never leaves the
    /// player playing.
    fn load_playlist(&mut self, files: Vec<PathBuf>) {
        replace_playlist(self, files);
    }

    /// Stop and load the entry at `index`. Returns false if out of range.
    fn select(&mut self, index: usize) -> bool {
        if index >= self.state().playlist.len() {
            return false;
        }
        self.stop();
        self.state_mut().current = Some(index);
        self.load_current();
        true
    }

    fn next_track(&mut self) {
        skip(self, 1);
    }

    fn prev_track(&mut self) {
        skip(self, -1);
    }

    fn is_playing(&self) -> bool {
        self.state().is_playing
    }
}

/// Playlist replacement behind [`MediaPlayer::load_playlist`], available to
/// implementations that filter the list first.
pub fn replace_playlist<P: MediaPlayer + ?Sized>(player: &mut P, files: Vec<PathBuf>) {
    player.stop();
    let state = player.state_mut();
    state.current = if files.is_empty() { None } else { Some(0) };
    state.playlist = files;
    state.position = 0.0;
    state.duration = 0.0;
    if player.state().current.is_some() {
        player.load_current();
    }
}

fn skip<P: MediaPlayer + ?Sized>(player: &mut P, step: isize) {
    let Some(index) = player.state().wrapped_index(step) else {
        return;
    };
    if player.select(index) {
        player.play_pause();
    }
}

/// Draw the shared transport view: title, a message line, status text and
/// a progress bar inside `area`.
pub fn draw_transport(
    ctx: &mut DrawContext<'_>,
    state: &PlayerState,
    area: Rect,
    message: Option<(&str, Color)>,
) -> Result<()> {
    let theme = ctx.theme;
    ctx.backend
        .fill_rect(area.x, area.y, area.w, area.h, theme.bg)?;
    let content = area.inset(10);

    let title = state
        .current_title()
        .unwrap_or_else(|| "No track loaded".to_string());
    let fitted = ellipsize(&title, content.w, |s| {
        ctx.backend.measure_text(s, FONT_BODY)
    });
    ctx.backend
        .draw_text_centered(&fitted, content.center_x(), content.y + 10, FONT_BODY, theme.text)?;

    let line_h = ctx.backend.measure_text_height(FONT_SMALL) as i32;
    if let Some((text, color)) = message {
        let lines = wrap_lines(text, content.w, |s| ctx.backend.measure_text(s, FONT_SMALL));
        let mut y = content.center_y() - (lines.len() as i32 * line_h) / 2;
        for line in &lines {
            ctx.backend
                .draw_text_centered(line, content.center_x(), y, FONT_SMALL, color)?;
            y += line_h;
        }
    }

    let bar = Rect::new(content.x, content.bottom() - 10, content.w, 10);
    let total = if state.duration > 0.0 {
        format_time(state.duration)
    } else {
        "--:--".to_string()
    };
    let status = format!(
        "{} | {} / {}",
        state.status_label(),
        format_time(state.position),
        total
    );
    ctx.backend
        .draw_text_centered(&status, content.center_x(), bar.y - 5 - line_h, FONT_SMALL, theme.text)?;

    ProgressBar::from_position(state.position, state.duration).draw(ctx, bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pineapple_ui::test_utils::MockBackend;
    use pineapple_ui::Theme;

    /// Minimal player that records lifecycle calls.
    #[derive(Default)]
    struct Recorder {
        state: PlayerState,
        loads: Vec<usize>,
        stops: usize,
    }

    impl MediaPlayer for Recorder {
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
            if let Some(i) = self.state.current {
                self.loads.push(i);
            }
        }
        fn play_pause(&mut self) {
            if self.state.current.is_some() {
                self.state.is_playing = !self.state.is_playing;
            }
        }
        fn stop(&mut self) {
            self.stops += 1;
            self.state.is_playing = false;
            self.state.position = 0.0;
        }
        fn seek(&mut self, _delta: f64) {}
        fn update(&mut self) {}
        fn draw(&mut self, _ctx: &mut DrawContext<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn files(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/m/{i}.mp3"))).collect()
    }

    #[test]
    fn load_playlist_selects_first() {
        let mut p = Recorder::default();
        p.load_playlist(files(3));
        assert_eq!(p.state().current, Some(0));
        assert!(!p.is_playing());
        assert_eq!(p.loads, vec![0]);
        assert_eq!(p.stops, 1);
    }

    #[test]
    fn load_empty_playlist_clears_index() {
        let mut p = Recorder::default();
        p.load_playlist(files(2));
        p.load_playlist(Vec::new());
        assert_eq!(p.state().current, None);
        assert_eq!(p.loads, vec![0]);
    }

    #[test]
    fn skipping_wraps_and_autoplays() {
        let mut p = Recorder::default();
        p.load_playlist(files(3));
        p.prev_track();
        assert_eq!(p.state().current, Some(2));
        assert!(p.is_playing());
        p.next_track();
        assert_eq!(p.state().current, Some(0));
        assert!(p.is_playing());
    }

    #[test]
    fn skip_on_empty_is_noop() {
        let mut p = Recorder::default();
        p.next_track();
        p.prev_track();
        assert_eq!(p.state().current, None);
        assert!(!p.is_playing());
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut p = Recorder::default();
        p.load_playlist(files(2));
        assert!(!p.select(2));
        assert!(p.select(1));
        assert_eq!(p.state().current, Some(1));
    }

    #[test]
    fn seek_target_clamps() {
        let state = PlayerState {
            playlist: files(1),
            current: Some(0),
            position: 50.0,
            duration: 60.0,
            ..Default::default()
        };
        assert_eq!(state.seek_target(30.0), Some(60.0));
        assert_eq!(state.seek_target(-90.0), Some(0.0));
        assert_eq!(state.seek_target(5.0), Some(55.0));
    }

    #[test]
    fn seek_target_needs_duration() {
        let state = PlayerState {
            playlist: files(1),
            current: Some(0),
            ..Default::default()
        };
        assert_eq!(state.seek_target(10.0), None);
        assert_eq!(PlayerState::default().seek_target(10.0), None);
    }

    #[test]
    fn status_labels() {
        let mut state = PlayerState {
            playlist: files(1),
            current: Some(0),
            ..Default::default()
        };
        assert_eq!(state.status_label(), "Stopped");
        state.position = 3.0;
        assert_eq!(state.status_label(), "Paused");
        state.is_playing = true;
        assert_eq!(state.status_label(), "Playing");
    }

    #[test]
    fn transport_shows_title_and_times() {
        let theme = Theme::default();
        let state = PlayerState {
            playlist: vec![PathBuf::from("/m/song.mp3")],
            current: Some(0),
            is_playing: true,
            position: 65.0,
            duration: 180.0,
        };
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            draw_transport(&mut ctx, &state, Rect::main_area(), None).unwrap();
        }
        assert!(backend.has_text("song.mp3"));
        assert!(backend.has_text("Playing | 01:05 / 03:00"));
    }

    #[test]
    fn transport_unknown_duration() {
        let theme = Theme::default();
        let state = PlayerState {
            playlist: vec![PathBuf::from("/m/a.mp3")],
            current: Some(0),
            ..Default::default()
        };
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            draw_transport(&mut ctx, &state, Rect::main_area(), Some(("hello", theme.text)))
                .unwrap();
        }
        assert!(backend.has_text("--:--"));
        assert!(backend.has_text("hello"));
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn seek_target_stays_in_track(
                pos in 0.0f64..500.0,
                dur in 0.1f64..500.0,
                delta in -1000.0f64..1000.0,
            ) {
                let state = PlayerState {
                    playlist: vec![PathBuf::from("a")],
                    current: Some(0),
                    position: pos.min(dur),
                    duration: dur,
                    ..Default::default()
                };
                let t = state.seek_target(delta).unwrap();
                prop_assert!((0.0..=dur).contains(&t));
            }

            #[test]
            fn wrapped_index_in_range(len in 1usize..50, cur in 0usize..50, step in -3isize..4) {
                let state = PlayerState {
                    playlist: (0..len).map(|i| PathBuf::from(i.to_string())).collect(),
                    current: Some(cur % len),
                    ..Default::default()
                };
                let next = state.wrapped_index(step).unwrap();
                prop_assert!(next < len);
            }
        }
    }
}
