use anyhow::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    // Backgrounds
    pub bg_primary: String, pub bg_secondary: String, pub bg_popup: String,
    // Borders
    pub border_normal: String, pub border_focused: String,
    // Text
    pub text_primary: String, pub text_muted: String, pub text_accent: String,
    // Day chips
    pub chip_bg: String, pub chip_fg: String,
    pub today_marker: String,
    // Current-hour task card
    pub card_bg: String, pub card_fg: String,
}

impl ThemeConfig {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)            -> Color { hex_to_color(&self.bg_primary) }
    pub fn bg2(&self)           -> Color { hex_to_color(&self.bg_secondary) }
    pub fn popup_bg(&self)      -> Color { hex_to_color(&self.bg_popup) }
    pub fn border(&self)        -> Color { hex_to_color(&self.border_normal) }
    pub fn border_active(&self) -> Color { hex_to_color(&self.border_focused) }
    pub fn fg(&self)            -> Color { hex_to_color(&self.text_primary) }
    pub fn fg_dim(&self)        -> Color { hex_to_color(&self.text_muted) }
    pub fn accent(&self)        -> Color { hex_to_color(&self.text_accent) }
    pub fn today(&self)         -> Color { hex_to_color(&self.today_marker) }

    pub fn chip_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.chip_bg), hex_to_color(&self.chip_fg))
    }
    pub fn card_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.card_bg), hex_to_color(&self.card_fg))
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Saved theme, else the named built-in, else the default.
    pub fn load(preferred: Option<&str>) -> Result<Self> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            return Ok(toml::from_str(&std::fs::read_to_string(&path)?)?);
        }
        Ok(preferred.and_then(Self::by_name).unwrap_or_default())
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all_themes() -> Vec<ThemeConfig> {
        vec![ThemeConfig::default(), ThemeConfig::nord(), ThemeConfig::dracula(), ThemeConfig::paper()]
    }

    pub fn by_name(name: &str) -> Option<ThemeConfig> {
        Self::all_themes().into_iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    // ── Built-in themes ───────────────────────────────────────────────────────

    pub fn nord() -> Self { Self {
        name: "nord".into(),
        bg_primary: "#2e3440".into(), bg_secondary: "#3b4252".into(), bg_popup: "#434c5e".into(),
        border_normal: "#4c566a".into(), border_focused: "#88c0d0".into(),
        text_primary: "#eceff4".into(), text_muted: "#7b88a1".into(), text_accent: "#88c0d0".into(),
        chip_bg: "#eceff4".into(), chip_fg: "#2e3440".into(),
        today_marker: "#a3be8c".into(),
        card_bg: "#81a1c1".into(), card_fg: "#2e3440".into(),
    }}

    pub fn dracula() -> Self { Self {
        name: "dracula".into(),
        bg_primary: "#282a36".into(), bg_secondary: "#21222c".into(), bg_popup: "#44475a".into(),
        border_normal: "#6272a4".into(), border_focused: "#bd93f9".into(),
        text_primary: "#f8f8f2".into(), text_muted: "#6272a4".into(), text_accent: "#bd93f9".into(),
        chip_bg: "#f8f8f2".into(), chip_fg: "#282a36".into(),
        today_marker: "#50fa7b".into(),
        card_bg: "#ff79c6".into(), card_fg: "#282a36".into(),
    }}

    /// Light palette: black chips and card on white.
    pub fn paper() -> Self { Self {
        name: "paper".into(),
        bg_primary: "#ffffff".into(), bg_secondary: "#f2f2f2".into(), bg_popup: "#e6e6e6".into(),
        border_normal: "#c8c8c8".into(), border_focused: "#1a1a1a".into(),
        text_primary: "#1a1a1a".into(), text_muted: "#8a8a8a".into(), text_accent: "#1a1a1a".into(),
        chip_bg: "#1a1a1a".into(), chip_fg: "#ffffff".into(),
        today_marker: "#00a86b".into(),
        card_bg: "#1a1a1a".into(), card_fg: "#ffffff".into(),
    }}
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "catppuccin-mocha".into(),
        bg_primary: "#1e1e2e".into(), bg_secondary: "#181825".into(), bg_popup: "#313244".into(),
        border_normal: "#45475a".into(), border_focused: "#89b4fa".into(),
        text_primary: "#cdd6f4".into(), text_muted: "#6c7086".into(), text_accent: "#89b4fa".into(),
        chip_bg: "#cdd6f4".into(), chip_fg: "#1e1e2e".into(),
        today_marker: "#a6e3a1".into(),
        card_bg: "#cba6f7".into(), card_fg: "#1e1e2e".into(),
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_color("#1e1e2e"), Color::Rgb(0x1e, 0x1e, 0x2e));
        assert_eq!(hex_to_color("ffffff"), Color::Rgb(255, 255, 255));
        assert_eq!(hex_to_color("#fff"), Color::Reset);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ThemeConfig::by_name("Nord").map(|t| t.name), Some("nord".to_owned()));
        assert!(ThemeConfig::by_name("solarized").is_none());
    }

    #[test]
    fn theme_survives_toml() {
        let t    = ThemeConfig::dracula();
        let back: ThemeConfig = toml::from_str(&toml::to_string_pretty(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }
}
