//! The application controller.
//!
//! Input is routed to exactly one focus per event: an open modal screen
//! takes everything, otherwise the active player, otherwise the menu on top
//! of the stack. Window-close is honoured from any focus.

use std::rc::Rc;

use pineapple_media::scanner::{self, MediaKind};
use pineapple_media::{AudioPlayer, ImageViewer, MediaPlayer, PlayerKind, VideoPlayer};
use pineapple_types::backend::{Color, DisplayBackend, SdiBackend};
use pineapple_types::clock::Clock;
use pineapple_types::error::Result;
use pineapple_types::input::{Button, InputEvent, Trigger};
use pineapple_ui::side_panel::draw_side_panel;
use pineapple_ui::statusbar::StatusBar;
use pineapple_ui::theme::{self, Theme};
use pineapple_ui::{DrawContext, Menu, Rect};

use crate::action::MenuAction;
use crate::collaborators::{FilePicker, LinkOpener};
use crate::debounce::{Debouncer, InputAction};
use crate::menus;
use crate::screen::{GITHUB_URL, Screen, ScreenAction};
use crate::settings::{Settings, SettingsStore};

/// Seconds moved by one shoulder-button seek.
pub const SEEK_STEP: f64 = 10.0;

/// What currently receives input.
#[derive(Debug, Clone)]
pub enum Focus {
    Menu,
    Player(PlayerKind),
    Screen(Screen),
}

/// The three players, one per [`PlayerKind`].
pub struct Players {
    pub audio: AudioPlayer,
    pub video: VideoPlayer,
    pub images: ImageViewer,
}

impl Players {
    pub fn new(audio: AudioPlayer, video: VideoPlayer, images: ImageViewer) -> Self {
        Self {
            audio,
            video,
            images,
        }
    }

    pub fn get(&self, kind: PlayerKind) -> &dyn MediaPlayer {
        match kind {
            PlayerKind::Audio => &self.audio,
            PlayerKind::Video => &self.video,
            PlayerKind::Image => &self.images,
        }
    }

    pub fn get_mut(&mut self, kind: PlayerKind) -> &mut dyn MediaPlayer {
        match kind {
            PlayerKind::Audio => &mut self.audio,
            PlayerKind::Video => &mut self.video,
            PlayerKind::Image => &mut self.images,
        }
    }

    /// Stop every player, terminating any external process.
    pub fn stop_all(&mut self) {
        self.audio.stop();
        self.video.stop();
        self.images.stop();
    }
}

/// Player that shows a library.
pub fn player_for(kind: MediaKind) -> PlayerKind {
    match kind {
        MediaKind::Music => PlayerKind::Audio,
        MediaKind::Video => PlayerKind::Video,
        MediaKind::Photo => PlayerKind::Image,
    }
}

pub struct Controller {
    settings: Settings,
    store: Box<dyn SettingsStore>,
    root: Menu<MenuAction>,
    /// Menus opened on top of the root, innermost last.
    stack: Vec<Menu<MenuAction>>,
    focus: Focus,
    players: Players,
    debounce: Debouncer,
    picker: Box<dyn FilePicker>,
    links: Box<dyn LinkOpener>,
    status_bar: StatusBar,
    /// Fullscreen was dropped to start a video and must come back when the
    /// player is left.
    pending_restore: bool,
    running: bool,
}

impl Controller {
    pub fn new(
        settings: Settings,
        store: Box<dyn SettingsStore>,
        players: Players,
        picker: Box<dyn FilePicker>,
        links: Box<dyn LinkOpener>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            store,
            root: menus::main_menu(),
            stack: Vec::new(),
            focus: Focus::Menu,
            players,
            debounce: Debouncer::new(clock),
            picker,
            links,
            status_bar: StatusBar::new(),
            pending_restore: false,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> &'static Theme {
        theme::resolve(&self.settings.theme)
    }

    pub fn active_menu(&self) -> &Menu<MenuAction> {
        self.stack.last().unwrap_or(&self.root)
    }

    fn active_menu_mut(&mut self) -> &mut Menu<MenuAction> {
        match self.stack.last_mut() {
            Some(menu) => menu,
            None => &mut self.root,
        }
    }

    /// Number of menus on the stack, root included.
    pub fn menu_depth(&self) -> usize {
        self.stack.len() + 1
    }

    pub fn pending_restore(&self) -> bool {
        self.pending_restore
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Dispatch one frame's input.
    pub fn handle_events<P: SdiBackend + DisplayBackend>(
        &mut self,
        events: &[InputEvent],
        platform: &mut P,
    ) {
        for event in events {
            if !self.running {
                return;
            }
            if *event == InputEvent::Quit {
                log::info!("Quit requested");
                self.running = false;
                return;
            }
            match self.focus {
                Focus::Screen(_) => self.screen_input(event),
                Focus::Player(kind) => {
                    if !self.global_input(event, platform) {
                        self.player_input(kind, event, platform);
                    }
                },
                Focus::Menu => {
                    if !self.global_input(event, platform) {
                        self.menu_input(event, platform);
                    }
                },
            }
        }
    }

    fn screen_input(&mut self, event: &InputEvent) {
        let Focus::Screen(screen) = &mut self.focus else {
            return;
        };
        match screen.handle_input(event) {
            Some(ScreenAction::Close) => self.close_screen(),
            Some(ScreenAction::Open { url, close }) => {
                self.links.open(url);
                if close {
                    self.close_screen();
                }
            },
            None => {},
        }
    }

    /// Fullscreen buttons, shared by menu and player focus. Returns whether
    /// the event was consumed.
    fn global_input<D: DisplayBackend>(&mut self, event: &InputEvent, display: &mut D) -> bool {
        let focus_video = match event {
            InputEvent::ButtonPress(Button::Select) => false,
            InputEvent::ButtonPress(Button::Start) => true,
            _ => return false,
        };
        if !self.debounce.accept(InputAction::Fullscreen) {
            return true;
        }
        if let Err(e) = display.toggle_fullscreen() {
            log::warn!("Cannot toggle fullscreen: {e}");
        }
        if focus_video
            && matches!(self.focus, Focus::Player(PlayerKind::Video))
            && self.players.video.is_playing()
        {
            self.players.video.request_focus();
        }
        true
    }

    fn player_input<D: DisplayBackend>(
        &mut self,
        kind: PlayerKind,
        event: &InputEvent,
        display: &mut D,
    ) {
        match event {
            InputEvent::ButtonPress(Button::Confirm) => {
                if self.debounce.accept(InputAction::Confirm) {
                    self.players.get_mut(kind).play_pause();
                }
            },
            InputEvent::ButtonPress(Button::Cancel) => {
                if self.debounce.accept(InputAction::Cancel) {
                    self.leave_player(kind, display);
                }
            },
            InputEvent::TriggerPress(trigger) => {
                if self.debounce.accept(InputAction::Seek) {
                    let delta = match trigger {
                        Trigger::Right => SEEK_STEP,
                        Trigger::Left => -SEEK_STEP,
                    };
                    self.players.get_mut(kind).seek(delta);
                }
            },
            _ => {},
        }
    }

    fn menu_input<P: SdiBackend + DisplayBackend>(&mut self, event: &InputEvent, platform: &mut P) {
        match event {
            InputEvent::ButtonPress(Button::Up) => {
                if self.debounce.accept(InputAction::Navigate) {
                    self.active_menu_mut().navigate(-1);
                }
            },
            InputEvent::ButtonPress(Button::Down) => {
                if self.debounce.accept(InputAction::Navigate) {
                    self.active_menu_mut().navigate(1);
                }
            },
            InputEvent::ButtonPress(Button::Confirm) => {
                if self.debounce.accept(InputAction::Confirm) {
                    self.execute(platform);
                }
            },
            InputEvent::ButtonPress(Button::Cancel) => {
                if self.debounce.accept(InputAction::Cancel) {
                    self.go_back();
                }
            },
            _ => {},
        }
    }

    // -----------------------------------------------------------------------
    // Menu actions
    // -----------------------------------------------------------------------

    fn execute<P: SdiBackend + DisplayBackend>(&mut self, platform: &mut P) {
        let Some(action) = self.active_menu().selected_action().copied() else {
            return;
        };
        log::debug!("Menu action {action:?}");
        match action {
            MenuAction::OpenLibrary(kind) => self.open_library(kind),
            MenuAction::OpenGames => self.stack.push(menus::games_menu(&self.settings.games)),
            MenuAction::OpenSettings => self.stack.push(menus::settings_menu()),
            MenuAction::OpenThemes => self.stack.push(menus::themes_menu()),
            MenuAction::Quit => {
                log::info!("Quit selected");
                self.running = false;
            },
            MenuAction::Import(kind) => self.import_dir(kind),
            MenuAction::ImportGames => self.import_games(),
            MenuAction::SetTheme(name) => {
                log::info!("Theme changed to {name}");
                self.settings.theme = name.to_string();
                self.persist();
                self.go_back();
            },
            MenuAction::ResetImports => self.stack.push(menus::reset_confirm_menu()),
            MenuAction::ConfirmReset => {
                log::info!("Resetting imported paths");
                self.settings.reset_imports();
                self.persist();
                self.go_back();
            },
            MenuAction::CancelReset | MenuAction::Back => self.go_back(),
            MenuAction::Donate => self.focus = Focus::Screen(Screen::donate(&*platform)),
            MenuAction::About => self.focus = Focus::Screen(Screen::about(&*platform)),
            MenuAction::Github => self.links.open(GITHUB_URL),
            MenuAction::Play(kind, index) => self.play(kind, index, platform),
            MenuAction::PlayGame(index) => {
                if let Some(game) = self.settings.games.get(index) {
                    let screen = Screen::game(&menus::game_name(game), &*platform);
                    self.focus = Focus::Screen(screen);
                }
            },
        }
    }

    fn open_library(&mut self, kind: MediaKind) {
        let files = scanner::scan_directories(self.settings.dirs(kind), kind.extensions());
        log::info!("{} library: {} files", kind.label(), files.len());
        self.players
            .get_mut(player_for(kind))
            .load_playlist(files.clone());
        self.stack.push(menus::media_menu(kind, &files));
    }

    fn play<D: DisplayBackend>(&mut self, kind: MediaKind, index: usize, display: &mut D) {
        let player_kind = player_for(kind);
        if !self.players.get_mut(player_kind).select(index) {
            log::warn!("No {} entry at index {index}", kind.label());
            return;
        }
        if kind == MediaKind::Video && display.is_fullscreen() {
            match display.set_fullscreen(false) {
                Ok(()) => self.pending_restore = true,
                Err(e) => log::warn!("Cannot leave fullscreen for video: {e}"),
            }
        }
        if kind != MediaKind::Photo {
            self.players.get_mut(player_kind).play_pause();
        }
        self.focus = Focus::Player(player_kind);
    }

    fn import_dir(&mut self, kind: MediaKind) {
        let title = format!("Select {} Folder", kind.label());
        let Some(dir) = self.picker.pick_directory(&title) else {
            return;
        };
        let shown = dir.display().to_string();
        if self.settings.add_dir(kind, dir) {
            log::info!("Added {} folder {shown}", kind.label());
            self.persist();
        } else {
            log::info!("{shown} is already imported");
        }
    }

    fn import_games(&mut self) {
        let files = self.picker.pick_game_files();
        if files.is_empty() {
            return;
        }
        match self.settings.add_games(files) {
            0 => log::info!("No new games to import"),
            added => {
                log::info!("Imported {added} games");
                self.persist();
            },
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.settings) {
            log::warn!("Cannot save settings: {e}");
        }
    }

    /// Pop one menu. No-op at the root.
    fn go_back(&mut self) {
        self.stack.pop();
    }

    fn close_screen(&mut self) {
        self.focus = Focus::Menu;
    }

    fn leave_player<D: DisplayBackend + ?Sized>(&mut self, kind: PlayerKind, display: &mut D) {
        self.players.get_mut(kind).stop();
        self.focus = Focus::Menu;
        if self.pending_restore {
            self.pending_restore = false;
            if !display.is_fullscreen() {
                if let Err(e) = display.set_fullscreen(true) {
                    log::warn!("Cannot restore fullscreen: {e}");
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Poll the external video process, then advance the active player.
    pub fn tick<D: DisplayBackend + ?Sized>(&mut self, display: &mut D) {
        if matches!(self.focus, Focus::Player(PlayerKind::Video))
            && self.players.video.external_exited()
        {
            log::info!("Video window closed, returning to menu");
            self.leave_player(PlayerKind::Video, display);
        }
        if let Focus::Player(kind) = self.focus {
            self.players.get_mut(kind).update();
        }
    }

    /// Draw the whole frame. The caller presents it.
    pub fn draw(&mut self, backend: &mut dyn SdiBackend) -> Result<()> {
        let theme = self.theme();
        backend.clear(Color::BLACK)?;
        let mut ctx = DrawContext::new(backend, theme);
        match &self.focus {
            Focus::Screen(screen) => screen.draw(&mut ctx)?,
            Focus::Player(kind) => self.players.get_mut(*kind).draw(&mut ctx)?,
            Focus::Menu => {
                self.stack
                    .last()
                    .unwrap_or(&self.root)
                    .draw(&mut ctx, Rect::main_area())?;
                draw_side_panel(&mut ctx)?;
            },
        }
        self.status_bar
            .set_clock(chrono::Local::now().format("%H:%M").to_string());
        self.status_bar.draw(&mut ctx)
    }

    /// Stop playback and any external process. Safe to call twice.
    pub fn shutdown(&mut self) {
        self.players.stop_all();
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
