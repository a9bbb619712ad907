//! Terminal colours for the configured theme

use crossterm::style::{style, Color, Stylize};
use dockpick_config::{Config, Theme};

/// Colour palette; with colour disabled every method returns the text unchanged
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    theme: Theme,
    enabled: bool,
}

impl Palette {
    pub fn new(theme: Theme, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.theme, config.color)
    }

    /// Palette that never emits escape codes
    pub fn plain() -> Self {
        Self::new(Theme::default(), false)
    }

    pub fn header(&self, text: &str) -> String {
        let color = match self.theme {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::DarkBlue,
        };
        self.paint(text, color, true)
    }

    pub fn success(&self, text: &str) -> String {
        let color = match self.theme {
            Theme::Dark => Color::Green,
            Theme::Light => Color::DarkGreen,
        };
        self.paint(text, color, false)
    }

    pub fn warning(&self, text: &str) -> String {
        let color = match self.theme {
            Theme::Dark => Color::Yellow,
            Theme::Light => Color::DarkYellow,
        };
        self.paint(text, color, false)
    }

    pub fn error(&self, text: &str) -> String {
        let color = match self.theme {
            Theme::Dark => Color::Red,
            Theme::Light => Color::DarkRed,
        };
        self.paint(text, color, true)
    }

    pub fn muted(&self, text: &str) -> String {
        let color = match self.theme {
            Theme::Dark => Color::DarkGrey,
            Theme::Light => Color::Grey,
        };
        self.paint(text, color, false)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let styled = style(text).with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}
