//! Actions carried by menu rows.

use pineapple_media::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Scan a library, load it into its player and list it.
    OpenLibrary(MediaKind),
    OpenGames,
    OpenSettings,
    OpenThemes,
    Quit,
    /// Pick a folder to add to a library.
    Import(MediaKind),
    ImportGames,
    SetTheme(&'static str),
    /// Ask before forgetting imported folders and games.
    ResetImports,
    ConfirmReset,
    CancelReset,
    Donate,
    About,
    Github,
    Back,
    /// Start the entry at this playlist index.
    Play(MediaKind, usize),
    /// Open the placeholder screen for an imported game.
    PlayGame(usize),
}
