//! Desktop services the controller reaches through traits: native file
//! dialogs and the system web browser.

use std::path::PathBuf;

/// Native file and folder pickers.
pub trait FilePicker {
    /// Ask for one folder. `None` when cancelled.
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf>;

    /// Ask for any number of `.ipg` game files.
    fn pick_game_files(&mut self) -> Vec<PathBuf>;
}

/// Opens URLs outside the application.
pub trait LinkOpener {
    /// Best-effort; failures are logged by the implementation.
    fn open(&mut self, url: &str);
}
