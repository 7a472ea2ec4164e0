use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::session::view::Scheme;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub neutral_bg: String,
    pub neutral_fg: String,
    pub correct_bg: String,
    pub correct_fg: String,
    pub incorrect_bg: String,
    pub incorrect_fg: String,
    pub accent: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        let user_theme_path = Config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path)
            && let Ok(theme) = toml::from_str::<Theme>(&content)
        {
            return Some(theme);
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("classic").unwrap_or_else(|| Self {
            name: "classic".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            neutral_bg: "#ffffff".to_string(),
            neutral_fg: "#000000".to_string(),
            correct_bg: "#2eac66".to_string(),
            correct_fg: "#ffffff".to_string(),
            incorrect_bg: "#000000".to_string(),
            incorrect_fg: "#ffffff".to_string(),
            accent: "#2eac66".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    /// Background and foreground for a view-model scheme.
    pub fn pair(&self, scheme: Scheme) -> (Color, Color) {
        let (bg, fg) = match scheme {
            Scheme::Neutral => (&self.neutral_bg, &self.neutral_fg),
            Scheme::Correct => (&self.correct_bg, &self.correct_fg),
            Scheme::Incorrect => (&self.incorrect_bg, &self.incorrect_fg),
        };
        (Self::parse_color(bg), Self::parse_color(fg))
    }

    pub fn accent(&self) -> Color {
        Self::parse_color(&self.accent)
    }
}
