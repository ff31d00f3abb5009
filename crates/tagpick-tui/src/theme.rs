use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};
use tagpick_core::config::TagAppearance;

/// Recognized theme names, mirroring the host platform's palette set.
/// Parsing is total: anything unrecognized becomes the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ThemeName {
    WebLight,
    WebDark,
    TeamsLight,
    TeamsDark,
    /// Terminal default colors instead of a fixed palette.
    Platform,
    #[default]
    CompanyBlueLight,
    CompanyBlueDark,
}

impl ThemeName {
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim() {
            "Web Light" => Self::WebLight,
            "Web Dark" => Self::WebDark,
            "Teams Light" => Self::TeamsLight,
            "Teams Dark" => Self::TeamsDark,
            "Use Platform Theme" => Self::Platform,
            "Company Blue Light" => Self::CompanyBlueLight,
            "Company Blue Dark" => Self::CompanyBlueDark,
            _ => Self::default(),
        }
    }

    pub(crate) fn palette(self) -> Palette {
        match self {
            Self::WebLight => Palette {
                accent: Color::Magenta,
                highlight: Color::Magenta,
                pending: Color::Yellow,
            },
            Self::WebDark => Palette {
                accent: Color::LightMagenta,
                highlight: Color::LightMagenta,
                pending: Color::LightYellow,
            },
            Self::TeamsLight => Palette {
                accent: Color::Rgb(98, 100, 167),
                highlight: Color::Rgb(98, 100, 167),
                pending: Color::Yellow,
            },
            Self::TeamsDark => Palette {
                accent: Color::Rgb(148, 150, 214),
                highlight: Color::Rgb(148, 150, 214),
                pending: Color::LightYellow,
            },
            Self::Platform => Palette {
                accent: Color::Reset,
                highlight: Color::Reset,
                pending: Color::Reset,
            },
            Self::CompanyBlueLight => Palette {
                accent: Color::Blue,
                highlight: Color::Cyan,
                pending: Color::Yellow,
            },
            Self::CompanyBlueDark => Palette {
                accent: Color::LightBlue,
                highlight: Color::LightCyan,
                pending: Color::LightYellow,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) accent: Color,
    pub(crate) highlight: Color,
    pub(crate) pending: Color,
}

pub(crate) fn chrome<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn key_block() -> Block<'static> {
    chrome("Keys")
}

pub(crate) fn list_highlight(color: Color) -> Style {
    // The platform palette has no highlight color of its own; invert the
    // row so the cursor stays visible on any terminal background.
    if color == Color::Reset {
        return Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    Style::default()
        .fg(Color::Black)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn accent_prompt(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub(crate) fn pending_marker(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::ITALIC)
}

/// Fill treatment for a saved chip in the selected row. Pending chips keep
/// their own marker style instead.
pub(crate) fn chip_fill(appearance: TagAppearance, accent: Color) -> Style {
    match appearance {
        TagAppearance::Outline => Style::default(),
        TagAppearance::Filled => Style::default().fg(Color::Black).bg(Color::Gray),
        TagAppearance::Brand => accent_prompt(accent),
    }
}

pub(crate) fn error_prompt() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub(crate) fn secondary_text() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};
    use tagpick_core::config::TagAppearance;

    use super::{ThemeName, chip_fill, list_highlight};

    #[test]
    fn parse_accepts_known_names() {
        assert_eq!(ThemeName::parse("Web Light"), ThemeName::WebLight);
        assert_eq!(ThemeName::parse("Web Dark"), ThemeName::WebDark);
        assert_eq!(ThemeName::parse("Teams Light"), ThemeName::TeamsLight);
        assert_eq!(ThemeName::parse("Teams Dark"), ThemeName::TeamsDark);
        assert_eq!(ThemeName::parse("Use Platform Theme"), ThemeName::Platform);
        assert_eq!(
            ThemeName::parse("Company Blue Dark"),
            ThemeName::CompanyBlueDark
        );
    }

    #[test]
    fn parse_falls_back_for_unknown_or_empty_names() {
        assert_eq!(ThemeName::parse(""), ThemeName::CompanyBlueLight);
        assert_eq!(ThemeName::parse("Solarized"), ThemeName::CompanyBlueLight);
        assert_eq!(ThemeName::parse("  Web Light  "), ThemeName::WebLight);
    }

    #[test]
    fn platform_palette_uses_terminal_default_colors() {
        let palette = ThemeName::Platform.palette();
        assert_eq!(palette.accent, Color::Reset);

        let highlight = list_highlight(palette.highlight);
        assert!(highlight.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(highlight.bg, None);
    }

    #[test]
    fn chip_fill_follows_appearance() {
        assert_eq!(chip_fill(TagAppearance::Outline, Color::Blue).bg, None);
        assert_eq!(
            chip_fill(TagAppearance::Filled, Color::Blue).bg,
            Some(Color::Gray)
        );
        assert_eq!(
            chip_fill(TagAppearance::Brand, Color::Blue).fg,
            Some(Color::Blue)
        );
    }
}
