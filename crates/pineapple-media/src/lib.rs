//! Media layer for Perfect Pineapple Player.
//!
//! Library scanning, external tool discovery, `ffprobe` metadata, `ffplay`
//! process control, and the three players that share the [`MediaPlayer`]
//! lifecycle: [`AudioPlayer`], [`VideoPlayer`] and [`ImageViewer`].

pub mod audio;
pub mod image_viewer;
pub mod player;
pub mod probe;
pub mod process;
pub mod scanner;
pub mod tools;
pub mod video;

pub use audio::{AudioPlayer, NoAudio};
pub use image_viewer::ImageViewer;
pub use player::{MediaPlayer, PlayerKind, PlayerState};
pub use scanner::MediaKind;
pub use video::VideoPlayer;
