//! Builders for every menu in the navigation stack.

use std::path::{Path, PathBuf};

use pineapple_media::MediaKind;
use pineapple_ui::layout::Rect;
use pineapple_ui::theme::THEMES;
use pineapple_ui::{Menu, MenuItem};

use crate::action::MenuAction;

pub const NO_MEDIA: &str = "No media found.";
pub const NO_GAMES: &str = "No games imported.";
pub const IMPORT_HINT: &str = "(Import in Settings)";
pub const RESET_QUESTION: &str = "Are you sure you want to reset?";

fn build(items: Vec<MenuItem<MenuAction>>) -> Menu<MenuAction> {
    Menu::for_area(items, Rect::main_area())
}

fn back() -> MenuItem<MenuAction> {
    MenuItem::new("Back", MenuAction::Back)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Root menu.
pub fn main_menu() -> Menu<MenuAction> {
    build(vec![
        MenuItem::new("Music", MenuAction::OpenLibrary(MediaKind::Music)),
        MenuItem::new("Videos", MenuAction::OpenLibrary(MediaKind::Video)),
        MenuItem::new("Photos", MenuAction::OpenLibrary(MediaKind::Photo)),
        MenuItem::new("Games", MenuAction::OpenGames),
        MenuItem::new("Settings", MenuAction::OpenSettings),
        MenuItem::new("Quit", MenuAction::Quit),
    ])
}

pub fn settings_menu() -> Menu<MenuAction> {
    build(vec![
        MenuItem::new("Import Music", MenuAction::Import(MediaKind::Music)),
        MenuItem::new("Import Videos", MenuAction::Import(MediaKind::Video)),
        MenuItem::new("Import Photos", MenuAction::Import(MediaKind::Photo)),
        MenuItem::new("Import Games", MenuAction::ImportGames),
        MenuItem::new("Themes", MenuAction::OpenThemes),
        MenuItem::new("Reset Imported Paths", MenuAction::ResetImports),
        MenuItem::new("Donate", MenuAction::Donate),
        MenuItem::new("About", MenuAction::About),
        MenuItem::new("Github", MenuAction::Github),
        back(),
    ])
}

/// One row per registered theme, then Back.
pub fn themes_menu() -> Menu<MenuAction> {
    let mut items: Vec<_> = THEMES
        .iter()
        .map(|t| MenuItem::new(t.name, MenuAction::SetTheme(t.name)))
        .collect();
    items.push(back());
    build(items)
}

pub fn reset_confirm_menu() -> Menu<MenuAction> {
    build(vec![
        MenuItem::info(RESET_QUESTION),
        MenuItem::new("Yes", MenuAction::ConfirmReset),
        MenuItem::new("No", MenuAction::CancelReset),
    ])
}

/// File listing for a library. Row `i` plays playlist entry `i`.
pub fn media_menu(kind: MediaKind, files: &[PathBuf]) -> Menu<MenuAction> {
    if files.is_empty() {
        return build(vec![
            MenuItem::info(NO_MEDIA),
            MenuItem::info(IMPORT_HINT),
            back(),
        ]);
    }
    let mut items: Vec<_> = files
        .iter()
        .enumerate()
        .map(|(i, f)| MenuItem::new(file_label(f), MenuAction::Play(kind, i)))
        .collect();
    items.push(back());
    build(items)
}

pub fn games_menu(games: &[PathBuf]) -> Menu<MenuAction> {
    if games.is_empty() {
        return build(vec![
            MenuItem::info(NO_GAMES),
            MenuItem::info(IMPORT_HINT),
            back(),
        ]);
    }
    let mut items: Vec<_> = games
        .iter()
        .enumerate()
        .map(|(i, g)| MenuItem::new(file_label(g), MenuAction::PlayGame(i)))
        .collect();
    items.push(back());
    build(items)
}

/// Display name of a game file.
pub fn game_name(path: &Path) -> String {
    file_label(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(menu: &Menu<MenuAction>) -> Vec<&str> {
        menu.items().iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn main_menu_rows() {
        assert_eq!(
            labels(&main_menu()),
            vec!["Music", "Videos", "Photos", "Games", "Settings", "Quit"]
        );
    }

    #[test]
    fn settings_menu_ends_with_back() {
        let menu = settings_menu();
        assert_eq!(menu.len(), 10);
        assert_eq!(menu.items().last().unwrap().action, Some(MenuAction::Back));
    }

    #[test]
    fn themes_menu_lists_all_themes() {
        let menu = themes_menu();
        assert_eq!(menu.len(), THEMES.len() + 1);
        assert_eq!(menu.selected_action(), Some(&MenuAction::SetTheme("Silver")));
    }

    #[test]
    fn empty_library_has_placeholder_rows() {
        let menu = media_menu(MediaKind::Music, &[]);
        assert_eq!(labels(&menu), vec![NO_MEDIA, IMPORT_HINT, "Back"]);
        assert_eq!(menu.selected_action(), None);
    }

    #[test]
    fn library_rows_map_to_indices() {
        let files = vec![PathBuf::from("/v/a.mp4"), PathBuf::from("/v/b.mp4")];
        let mut menu = media_menu(MediaKind::Video, &files);
        assert_eq!(labels(&menu), vec!["a.mp4", "b.mp4", "Back"]);
        menu.navigate(1);
        assert_eq!(
            menu.selected_action(),
            Some(&MenuAction::Play(MediaKind::Video, 1))
        );
    }

    #[test]
    fn games_menu_placeholder_and_rows() {
        assert_eq!(labels(&games_menu(&[]))[0], NO_GAMES);
        let menu = games_menu(&[PathBuf::from("/g/tetris.ipg")]);
        assert_eq!(menu.selected_action(), Some(&MenuAction::PlayGame(0)));
        assert_eq!(game_name(Path::new("/g/tetris.ipg")), "tetris.ipg");
    }

    #[test]
    fn menus_fit_eleven_rows() {
        assert_eq!(main_menu().visible_count(), 11);
    }
}
