//! Modal screens: About, Donate and the game placeholder.
//!
//! A screen lays its text out once, when it is opened, into absolutely
//! positioned lines inside a scrollable content area. While open it takes
//! all input. Up/Down scroll by one step, the shoulder buttons by five and
//! Cancel closes. About and Donate also react to typed shortcut keys.

use pineapple_types::backend::{Color, SdiBackend};
use pineapple_types::error::Result;
use pineapple_types::input::{Button, InputEvent, Trigger};
use pineapple_ui::layout::{FONT_BODY, FONT_TITLE, Rect};
use pineapple_ui::scroll_view::ScrollView;
use pineapple_ui::text::wrap_lines;
use pineapple_ui::DrawContext;

pub const GITHUB_URL: &str = "https://github.com/BannedPenta01";
pub const DONATE_URL: &str = "https://paypal.me/JanMichaelVegaTapia";

/// Labels of the donation buttons, selected with keys 1 to 5.
pub const DONATE_AMOUNTS: [&str; 5] = ["$1", "$5", "$10", "$15", "$25"];

/// Pixels moved by one scroll step.
pub const SCROLL_STEP: i32 = 20;
const FAST_SCROLL_STEPS: i32 = 5;

const TEXT_INDENT: i32 = 10;
const TOP_PADDING: i32 = 10;
const BOTTOM_PADDING: u32 = 15;
const PARAGRAPH_GAP: i32 = 2;
const BLANK_GAP: i32 = 6;
const BUTTON_PAD: u32 = 8;
const BUTTON_GAP: i32 = 4;

const ABOUT_TEXT: &[&str] = &[
    "Perfect Pineapple Player",
    "",
    "A modern iPod Classic-inspired media player.",
    "",
    "Created by BannedPenta01.",
    "",
    "Disclaimer:",
    "If you think AI is 'ruining creativity',",
    "consider this: The same people who once said 'digital art isn't real art' now say 'AI isn't real creativity.'",
    "Gatekeeping tools is the oldest trick in the book.",
    "AI is a paintbrush for the neurodivergent, the disabled, the outsider, and the dreamer.",
    "If you fear new voices, maybe it's your own creativity that's threatened.",
    "",
    "Support more art, more music, more weirdness.",
    "Let us eat the Pineapple in peace",
    "",
    "(Press G to visit Github, B/Esc to close)",
];

/// What a screen asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    /// Return to the menu that opened the screen.
    Close,
    /// Open `url` in the browser, then close the screen if `close` is set.
    Open { url: &'static str, close: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenKind {
    About,
    Donate,
    /// Placeholder shown for an imported game.
    Game(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStyle {
    Title,
    Emphasis,
    Body,
    /// A filled button of the given height.
    Button(u32),
}

/// One laid-out line, `y` relative to the top of the content area.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    y: i32,
    h: u32,
    style: LineStyle,
}

enum Block<'a> {
    Text(&'a str, LineStyle),
    Blank,
    Button(String),
}

/// An open modal screen.
#[derive(Debug, Clone)]
pub struct Screen {
    kind: ScreenKind,
    lines: Vec<Line>,
    scroll: ScrollView,
}

impl Screen {
    pub fn about(measure: &dyn SdiBackend) -> Self {
        let blocks: Vec<Block<'_>> = ABOUT_TEXT
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if text.is_empty() {
                    Block::Blank
                } else if i == 0 {
                    Block::Text(text, LineStyle::Title)
                } else if text.starts_with("Disclaimer") || text.starts_with("(Press") {
                    Block::Text(text, LineStyle::Emphasis)
                } else {
                    Block::Text(text, LineStyle::Body)
                }
            })
            .collect();
        Self::layout(ScreenKind::About, &blocks, measure)
    }

    pub fn donate(measure: &dyn SdiBackend) -> Self {
        let mut blocks = vec![
            Block::Text("Support development!", LineStyle::Body),
            Block::Blank,
            Block::Text(
                "Press the corresponding number key (1-5) to open a PayPal link in your browser.",
                LineStyle::Body,
            ),
            Block::Blank,
        ];
        blocks.extend(
            DONATE_AMOUNTS
                .iter()
                .enumerate()
                .map(|(i, amount)| Block::Button(format!("[{}] {amount}", i + 1))),
        );
        blocks.push(Block::Blank);
        blocks.push(Block::Text("(Press B/Esc to close)", LineStyle::Body));
        Self::layout(ScreenKind::Donate, &blocks, measure)
    }

    pub fn game(name: &str, measure: &dyn SdiBackend) -> Self {
        let title = format!("Game: {name}");
        let blocks = [
            Block::Text(&title, LineStyle::Body),
            Block::Blank,
            Block::Text("(Game launching/emulation not implemented)", LineStyle::Body),
            Block::Blank,
            Block::Text("Press B/Esc to go back.", LineStyle::Body),
        ];
        Self::layout(ScreenKind::Game(name.to_string()), &blocks, measure)
    }

    /// Whole screen area below the status bar.
    pub fn area() -> Rect {
        Rect::below_status_bar()
    }

    /// Padded area the text scrolls inside.
    pub fn content_area() -> Rect {
        Self::area().inset(10)
    }

    fn layout(kind: ScreenKind, blocks: &[Block<'_>], measure: &dyn SdiBackend) -> Self {
        let content = Self::content_area();
        let wrap_w = content.w.saturating_sub(2 * TEXT_INDENT as u32);
        let body_h = measure.measure_text_height(FONT_BODY);

        let mut lines = Vec::new();
        let mut y = TOP_PADDING;
        for block in blocks {
            match block {
                Block::Blank => y += (body_h * 2 / 3) as i32 + BLANK_GAP,
                Block::Text(text, style) => {
                    let size = font_size(*style);
                    let line_h = measure.measure_text_height(size);
                    for wrapped in wrap_lines(text, wrap_w, |s| measure.measure_text(s, size)) {
                        lines.push(Line {
                            text: wrapped,
                            y,
                            h: line_h,
                            style: *style,
                        });
                        y += line_h as i32;
                    }
                    y += PARAGRAPH_GAP;
                },
                Block::Button(label) => {
                    let h = body_h + BUTTON_PAD;
                    lines.push(Line {
                        text: label.clone(),
                        y,
                        h,
                        style: LineStyle::Button(h),
                    });
                    y += h as i32 + BUTTON_GAP;
                },
            }
        }
        let total = y.max(0) as u32 + BOTTOM_PADDING;
        Self {
            kind,
            lines,
            scroll: ScrollView::new(total, content.h),
        }
    }

    pub fn kind(&self) -> &ScreenKind {
        &self.kind
    }

    pub fn scroll(&self) -> &ScrollView {
        &self.scroll
    }

    /// React to one input event.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<ScreenAction> {
        match event {
            InputEvent::ButtonPress(Button::Up) => self.scroll.scroll_by(-SCROLL_STEP),
            InputEvent::ButtonPress(Button::Down) => self.scroll.scroll_by(SCROLL_STEP),
            InputEvent::TriggerPress(Trigger::Left) => {
                self.scroll.scroll_by(-SCROLL_STEP * FAST_SCROLL_STEPS)
            },
            InputEvent::TriggerPress(Trigger::Right) => {
                self.scroll.scroll_by(SCROLL_STEP * FAST_SCROLL_STEPS)
            },
            InputEvent::ButtonPress(Button::Cancel) => return Some(ScreenAction::Close),
            InputEvent::TextInput(ch) => return self.shortcut(*ch),
            _ => {},
        }
        None
    }

    fn shortcut(&self, ch: char) -> Option<ScreenAction> {
        match self.kind {
            ScreenKind::About if ch.eq_ignore_ascii_case(&'g') => Some(ScreenAction::Open {
                url: GITHUB_URL,
                close: false,
            }),
            ScreenKind::Donate => match ch.to_digit(10) {
                Some(n) if (1..=DONATE_AMOUNTS.len() as u32).contains(&n) => {
                    log::info!("donation option {} chosen", DONATE_AMOUNTS[n as usize - 1]);
                    Some(ScreenAction::Open {
                        url: DONATE_URL,
                        close: true,
                    })
                },
                _ => None,
            },
            _ => None,
        }
    }

    pub fn draw(&self, ctx: &mut DrawContext<'_>) -> Result<()> {
        let theme = ctx.theme;
        let area = Self::area();
        let content = Self::content_area();
        ctx.backend.fill_rect(area.x, area.y, area.w, area.h, theme.bg)?;

        ctx.backend
            .push_clip_rect(content.x, content.y, content.w, content.h)?;
        let top = content.y - self.scroll.scroll_y() as i32;
        for line in &self.lines {
            let y = top + line.y;
            if y + line.h as i32 <= content.y || y >= content.bottom() {
                continue;
            }
            let x = content.x + TEXT_INDENT;
            match line.style {
                LineStyle::Button(h) => {
                    let w = content.w.saturating_sub(2 * TEXT_INDENT as u32);
                    ctx.backend.fill_rect(x, y, w, h, theme.highlight)?;
                    let text_h = ctx.backend.measure_text_height(FONT_BODY) as i32;
                    ctx.backend.draw_text_centered(
                        &line.text,
                        x + w as i32 / 2,
                        y + (h as i32 - text_h) / 2,
                        FONT_BODY,
                        theme.bg,
                    )?;
                },
                style => {
                    let color = match style {
                        LineStyle::Body => theme.text,
                        _ => theme.highlight,
                    };
                    ctx.backend
                        .draw_text(&line.text, x, y, font_size(style), color)?;
                },
            }
        }
        ctx.backend.pop_clip_rect()?;

        self.scroll.draw_arrows(ctx, area, Color::GRAY)
    }
}

fn font_size(style: LineStyle) -> u16 {
    match style {
        LineStyle::Title => FONT_TITLE,
        _ => FONT_BODY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pineapple_ui::Theme;
    use pineapple_ui::test_utils::{DrawCall, MockBackend};

    fn draw(screen: &Screen) -> MockBackend {
        let theme = Theme::default();
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend, &theme);
            screen.draw(&mut ctx).unwrap();
        }
        backend
    }

    #[test]
    fn game_screen_shows_name_and_fits() {
        let backend = MockBackend::new();
        let screen = Screen::game("tetris.ipg", &backend);
        assert_eq!(screen.kind(), &ScreenKind::Game("tetris.ipg".into()));
        assert_eq!(screen.scroll().max_scroll(), 0);
        let drawn = draw(&screen);
        assert!(drawn.has_text("Game: tetris.ipg"));
        assert!(drawn.has_text("Press B/Esc to go back."));
    }

    #[test]
    fn long_lines_are_wrapped_to_the_content_width() {
        let backend = MockBackend::new();
        let screen = Screen::about(&backend);
        let limit = Screen::content_area().w - 2 * TEXT_INDENT as u32;
        for line in &screen.lines {
            if line.text.contains(' ') {
                assert!(backend.measure_text(&line.text, FONT_BODY) <= limit);
            }
        }
        assert!(screen.lines.len() > ABOUT_TEXT.len());
    }

    #[test]
    fn about_scrolls_and_clamps() {
        let backend = MockBackend::new();
        let mut screen = Screen::about(&backend);
        assert!(screen.scroll().max_scroll() > 0);

        screen.handle_input(&InputEvent::ButtonPress(Button::Up));
        assert_eq!(screen.scroll().scroll_y(), 0);
        screen.handle_input(&InputEvent::ButtonPress(Button::Down));
        assert_eq!(screen.scroll().scroll_y(), 20);
        for _ in 0..100 {
            screen.handle_input(&InputEvent::TriggerPress(Trigger::Right));
        }
        assert_eq!(screen.scroll().scroll_y(), screen.scroll().max_scroll());
    }

    #[test]
    fn about_first_line_is_title() {
        let backend = MockBackend::new();
        let drawn = draw(&Screen::about(&backend));
        let title_size = drawn.calls.iter().find_map(|c| match c {
            DrawCall::DrawText { text, font_size, .. } if text == "Perfect Pineapple Player" => {
                Some(*font_size)
            },
            _ => None,
        });
        assert_eq!(title_size, Some(FONT_TITLE));
    }

    #[test]
    fn about_draws_only_visible_lines() {
        let backend = MockBackend::new();
        let mut screen = Screen::about(&backend);
        assert!(!draw(&screen).has_text("(Press G"));
        for _ in 0..100 {
            screen.handle_input(&InputEvent::ButtonPress(Button::Down));
        }
        let drawn = draw(&screen);
        assert!(drawn.has_text("(Press G"));
        assert!(!drawn.has_text("Perfect Pineapple Player"));
    }

    #[test]
    fn cancel_closes_every_screen() {
        let backend = MockBackend::new();
        for mut screen in [
            Screen::about(&backend),
            Screen::donate(&backend),
            Screen::game("x", &backend),
        ] {
            assert_eq!(
                screen.handle_input(&InputEvent::ButtonPress(Button::Cancel)),
                Some(ScreenAction::Close)
            );
        }
    }

    #[test]
    fn about_g_opens_github_without_closing() {
        let backend = MockBackend::new();
        let mut screen = Screen::about(&backend);
        let expected = Some(ScreenAction::Open {
            url: GITHUB_URL,
            close: false,
        });
        assert_eq!(screen.handle_input(&InputEvent::TextInput('g')), expected);
        assert_eq!(screen.handle_input(&InputEvent::TextInput('G')), expected);
        assert_eq!(screen.handle_input(&InputEvent::TextInput('1')), None);
    }

    #[test]
    fn donate_digits_open_link_and_close() {
        let backend = MockBackend::new();
        let mut screen = Screen::donate(&backend);
        for ch in ['1', '3', '5'] {
            assert_eq!(
                screen.handle_input(&InputEvent::TextInput(ch)),
                Some(ScreenAction::Open {
                    url: DONATE_URL,
                    close: true
                })
            );
        }
        assert_eq!(screen.handle_input(&InputEvent::TextInput('0')), None);
        assert_eq!(screen.handle_input(&InputEvent::TextInput('6')), None);
        assert_eq!(screen.handle_input(&InputEvent::TextInput('g')), None);
    }

    #[test]
    fn donate_buttons_use_inverted_colors() {
        let backend = MockBackend::new();
        let theme = Theme::default();
        let drawn = draw(&Screen::donate(&backend));
        let label_color = drawn.calls.iter().find_map(|c| match c {
            DrawCall::DrawText { text, color, .. } if text == "[1] $1" => Some(*color),
            _ => None,
        });
        assert_eq!(label_color, Some(theme.bg));
        let buttons = drawn
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { color, .. } if *color == theme.highlight))
            .count();
        assert!(buttons >= 1);
    }

    #[test]
    fn draw_clips_to_content_area() {
        let backend = MockBackend::new();
        let drawn = draw(&Screen::game("x", &backend));
        let c = Screen::content_area();
        assert!(drawn.calls.iter().any(|call| matches!(
            call,
            DrawCall::Clip { x, y, w, h } if *x == c.x && *y == c.y && *w == c.w && *h == c.h
        )));
    }
}
