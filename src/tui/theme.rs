//! Color themes for the dashboard.
//!
//! Three built-ins: `default` (slate and blue), `dracula`, and `nord`.

use ratatui::style::Color;

/// A complete color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as used in the config file
    pub name: &'static str,
    /// Title, focused borders, selected card
    pub primary: Color,
    /// Icons and the AI action
    pub accent: Color,
    /// Port badges
    pub port: Color,
    /// Main text color
    pub text: Color,
    /// Paths and commands
    pub text_dim: Color,
    /// Placeholders and hints
    pub text_muted: Color,
    /// Selected card background
    pub selected_bg: Color,
    /// Unfocused borders
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    /// Names accepted by [`Theme::by_name`].
    pub const BUILTIN: [&'static str; 3] = ["default", "dracula", "nord"];

    /// Slate background with blue highlights.
    pub fn slate() -> Self {
        Self {
            name: "default",
            primary: Color::Rgb(59, 130, 246),     // blue-500
            accent: Color::Rgb(168, 85, 247),      // purple-500
            port: Color::Rgb(52, 211, 153),        // emerald-400
            text: Color::Rgb(241, 245, 249),       // slate-100
            text_dim: Color::Rgb(148, 163, 184),   // slate-400
            text_muted: Color::Rgb(100, 116, 139), // slate-500
            selected_bg: Color::Rgb(30, 41, 59),   // slate-800
            border: Color::Rgb(51, 65, 85),        // slate-700
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula",
            primary: Color::Rgb(189, 147, 249),
            accent: Color::Rgb(255, 121, 198),
            port: Color::Rgb(80, 250, 123),
            text: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(139, 233, 253),
            text_muted: Color::Rgb(98, 114, 164),
            selected_bg: Color::Rgb(68, 71, 90),
            border: Color::Rgb(68, 71, 90),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord",
            primary: Color::Rgb(136, 192, 208),  // nord8
            accent: Color::Rgb(180, 142, 173),   // nord15
            port: Color::Rgb(163, 190, 140),     // nord14
            text: Color::Rgb(236, 239, 244),     // nord6
            text_dim: Color::Rgb(216, 222, 233), // nord4
            text_muted: Color::Rgb(76, 86, 106), // nord3
            selected_bg: Color::Rgb(59, 66, 82), // nord1
            border: Color::Rgb(67, 76, 94),      // nord2
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
        }
    }

    /// Look up a built-in theme, ignoring case.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" | "slate" => Some(Self::slate()),
            "dracula" => Some(Self::dracula()),
            "nord" => Some(Self::nord()),
            other => {
                tracing::warn!(theme = other, "Unknown theme, using default");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("Dracula").unwrap().name, "dracula");
        assert_eq!(Theme::by_name("default"), Some(Theme::default()));
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_builtins_resolve() {
        for name in Theme::BUILTIN {
            assert_eq!(Theme::by_name(name).unwrap().name, name);
        }
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(Theme::slate().primary, Theme::dracula().primary);
        assert_ne!(Theme::dracula().primary, Theme::nord().primary);
    }
}
