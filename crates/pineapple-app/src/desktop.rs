//! Native dialogs and browser links for the desktop build.

use std::path::PathBuf;

use pineapple_core::{FilePicker, LinkOpener};

/// File-type filter offered when importing games.
const GAME_FILTER_NAME: &str = "iPod Games";
const GAME_EXTENSIONS: &[&str] = &["ipg"];

/// Folder and file pickers backed by the OS dialogs.
#[derive(Debug, Default)]
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf> {
        let picked = rfd::FileDialog::new().set_title(title).pick_folder();
        if picked.is_none() {
            log::debug!("{title}: cancelled");
        }
        picked
    }

    fn pick_game_files(&mut self) -> Vec<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Games")
            .add_filter(GAME_FILTER_NAME, GAME_EXTENSIONS)
            .pick_files()
            .unwrap_or_default()
    }
}

/// Opens links in the default web browser.
#[derive(Debug, Default)]
pub struct BrowserLinks;

impl LinkOpener for BrowserLinks {
    fn open(&mut self, url: &str) {
        match webbrowser::open(url) {
            Ok(()) => log::info!("Opened {url}"),
            Err(e) => log::warn!("Cannot open {url}: {e}"),
        }
    }
}
