use std::str::FromStr;

use ratatui::style::Color;

use ticktop::config::ColorsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Color,
    pub header: Color,
    pub border: Color,
    pub label: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub status: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            title: Color::Blue,
            header: Color::Yellow,
            border: Color::DarkGray,
            label: Color::Gray,
            pill_key_fg: Color::Black,
            pill_key_bg: Color::Cyan,
            status: Color::Green,
        }
    }
}

impl Palette {
    /// Unknown color names keep the default for that slot.
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let defaults = Self::default();
        Self {
            title: parse_color(&colors.title).unwrap_or(defaults.title),
            header: parse_color(&colors.header).unwrap_or(defaults.header),
            ..defaults
        }
    }
}

fn parse_color(name: &str) -> Option<Color> {
    Color::from_str(name.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_names_and_hex() {
        let colors = ColorsConfig {
            title: "cyan".to_string(),
            header: "#ff8800".to_string(),
        };
        let palette = Palette::from_config(&colors);
        assert_eq!(palette.title, Color::Cyan);
        assert_eq!(palette.header, Color::Rgb(0xff, 0x88, 0x00));
    }

    #[test]
    fn unknown_name_falls_back() {
        let colors = ColorsConfig {
            title: "not-a-color".to_string(),
            header: "yellow".to_string(),
        };
        let palette = Palette::from_config(&colors);
        assert_eq!(palette.title, Color::Blue);
        assert_eq!(palette.header, Color::Yellow);
    }
}
