//! Theme registry: the named color palettes the player can switch between.

use pineapple_types::backend::Color;

/// Name of the theme used when none (or an unknown one) is configured.
pub const DEFAULT_THEME: &str = "Silver";

/// A named palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Registry key and display name.
    pub name: &'static str,
    /// Menu, player and screen background.
    pub bg: Color,
    /// Primary text color.
    pub text: Color,
    /// Selected row, progress fill and emphasis.
    pub highlight: Color,
    /// Side panel gradient, top color.
    pub side_top: Color,
    /// Side panel gradient, bottom color.
    pub side_bottom: Color,
}

const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);

/// Every registered theme, in menu order.
pub const THEMES: [Theme; 8] = [
    Theme {
        name: "Silver",
        bg: Color::rgb(220, 220, 220),
        text: Color::BLACK,
        highlight: Color::rgb(0, 0, 255),
        side_top: Color::rgb(180, 180, 180),
        side_bottom: Color::rgb(240, 240, 240),
    },
    Theme {
        name: "Dark",
        bg: Color::rgb(30, 30, 30),
        text: LIGHT_GRAY,
        highlight: Color::rgb(0, 100, 200),
        side_top: Color::rgb(20, 20, 20),
        side_bottom: Color::rgb(50, 50, 50),
    },
    Theme {
        name: "Red Wine",
        bg: Color::rgb(100, 0, 30),
        text: Color::WHITE,
        highlight: Color::rgb(255, 100, 100),
        side_top: Color::rgb(80, 0, 20),
        side_bottom: Color::rgb(150, 20, 50),
    },
    Theme {
        name: "Grape Blue",
        bg: Color::rgb(50, 0, 100),
        text: Color::WHITE,
        highlight: Color::rgb(150, 100, 255),
        side_top: Color::rgb(30, 0, 80),
        side_bottom: Color::rgb(90, 50, 150),
    },
    Theme {
        name: "Money Green",
        bg: Color::rgb(0, 80, 20),
        text: Color::WHITE,
        highlight: Color::rgb(100, 255, 100),
        side_top: Color::rgb(0, 60, 10),
        side_bottom: Color::rgb(50, 120, 60),
    },
    Theme {
        name: "Dark Female Pink",
        bg: Color::rgb(130, 0, 130),
        text: Color::WHITE,
        highlight: Color::rgb(255, 100, 255),
        side_top: Color::rgb(100, 0, 100),
        side_bottom: Color::rgb(180, 50, 180),
    },
    Theme {
        name: "Ocean Blue",
        bg: Color::rgb(0, 50, 100),
        text: Color::WHITE,
        highlight: Color::rgb(100, 150, 255),
        side_top: Color::rgb(0, 30, 80),
        side_bottom: Color::rgb(50, 90, 150),
    },
    Theme {
        name: "Pineapple Orange",
        bg: Color::rgb(255, 165, 0),
        text: Color::BLACK,
        highlight: Color::rgb(255, 69, 0),
        side_top: Color::rgb(240, 140, 0),
        side_bottom: Color::rgb(255, 200, 80),
    },
];

/// Look up a registered theme by exact name.
pub fn find(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.name == name)
}

/// Whether `name` is a registered theme.
pub fn is_registered(name: &str) -> bool {
    find(name).is_some()
}

/// Look up a theme, falling back to [`DEFAULT_THEME`].
pub fn resolve(name: &str) -> &'static Theme {
    find(name).unwrap_or(&THEMES[0])
}

impl Default for Theme {
    fn default() -> Self {
        *resolve(DEFAULT_THEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_first_entry() {
        assert_eq!(THEMES[0].name, DEFAULT_THEME);
        assert_eq!(Theme::default().name, "Silver");
    }

    #[test]
    fn find_known_theme() {
        let t = find("Ocean Blue").unwrap();
        assert_eq!(t.bg, Color::rgb(0, 50, 100));
    }

    #[test]
    fn unknown_theme_resolves_to_default() {
        assert_eq!(resolve("Neon Purple").name, DEFAULT_THEME);
        assert!(!is_registered("Neon Purple"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(find("silver").is_none());
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in THEMES.iter().enumerate() {
            for b in &THEMES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
