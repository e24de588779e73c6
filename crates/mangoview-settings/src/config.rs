//! Configuration and settings management for MangoView
//!
//! Configuration is organized into logical sections:
//! - Selection settings (hit radius, double-click window, page-turn margins)
//! - Overlay settings (panel geometry, hysteresis band, anti-jitter epsilons)
//! - Page settings (metadata directory, first page)
//! - Logging settings
//!
//! Every section has defaults matching the viewer's built-in behaviour, so a
//! config file only needs the values it changes. JSON and TOML are supported.

use mangoview_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Gesture recognition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Click tolerance radius in image pixels
    pub hit_radius: f64,
    /// Maximum gap between the clicks of a double-click
    pub double_click_ms: u64,
    /// Fraction of the image width on each side that turns the page on double-click
    pub page_turn_margin: f64,
    /// Scale applied to symbol boxes when drawing highlighters
    pub highlight_scale: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            hit_radius: constants::HIT_RADIUS,
            double_click_ms: constants::DOUBLE_CLICK_MS,
            page_turn_margin: constants::PAGE_TURN_MARGIN,
            highlight_scale: constants::HIGHLIGHT_SCALE,
        }
    }
}

/// Floating panel placement settings
///
/// Fractions are relative to the viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub panel_width: f64,
    pub panel_height: f64,
    /// Inset kept from every viewport edge
    pub edge_inset: f64,
    /// Target x beyond which the panel moves to the right side
    pub switch_right_at: f64,
    /// Target x below which the panel moves back to the left side
    pub switch_left_at: f64,
    /// Gap between target and panel, relative to panel width
    pub target_gap: f64,
    pub size_epsilon: f64,
    pub position_epsilon: f64,
    /// Ticks granted by every external trigger
    pub settle_ticks: u32,
    pub tick_interval_ms: u64,
    /// Panel height divided by this gives the font size
    pub font_divisor: f64,
    /// Minimum font size change worth writing
    pub font_step: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            panel_width: 0.45,
            panel_height: 0.30,
            edge_inset: 0.02,
            switch_right_at: 0.52,
            switch_left_at: 0.48,
            target_gap: 0.05,
            size_epsilon: 1e-4,
            position_epsilon: 1e-5,
            settle_ticks: constants::SETTLE_TICKS,
            tick_interval_ms: constants::SETTLE_TICK_MS,
            font_divisor: 14.0,
            font_step: 1.0,
        }
    }
}

/// Page metadata source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    /// Directory holding `page{N}.json` metadata files
    pub directory: PathBuf,
    /// Page shown at startup
    pub first_page: usize,
    /// File name prefix of page metadata
    pub file_prefix: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            first_page: 0,
            file_prefix: "page".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub selection: SelectionSettings,
    pub overlay: OverlaySettings,
    pub pages: PageSettings,
    pub logging: LoggingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<config dir>/mangoview/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("mangoview").join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let s = &self.selection;
        if !(s.hit_radius.is_finite() && s.hit_radius > 0.0) {
            return Err(SettingsError::out_of_range("selection.hit_radius", s.hit_radius));
        }
        if s.double_click_ms == 0 {
            return Err(SettingsError::out_of_range(
                "selection.double_click_ms",
                s.double_click_ms,
            ));
        }
        if !(0.0..0.5).contains(&s.page_turn_margin) {
            return Err(SettingsError::out_of_range(
                "selection.page_turn_margin",
                s.page_turn_margin,
            ));
        }
        if !(s.highlight_scale.is_finite() && s.highlight_scale > 0.0) {
            return Err(SettingsError::out_of_range(
                "selection.highlight_scale",
                s.highlight_scale,
            ));
        }

        let o = &self.overlay;
        for (key, value) in [
            ("overlay.panel_width", o.panel_width),
            ("overlay.panel_height", o.panel_height),
            ("overlay.switch_right_at", o.switch_right_at),
            ("overlay.switch_left_at", o.switch_left_at),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(SettingsError::out_of_range(key, value));
            }
        }
        if !(0.0..0.5).contains(&o.edge_inset) || o.panel_width + 2.0 * o.edge_inset > 1.0 {
            return Err(SettingsError::out_of_range("overlay.edge_inset", o.edge_inset));
        }
        if o.panel_height + 2.0 * o.edge_inset > 1.0 {
            return Err(SettingsError::out_of_range("overlay.panel_height", o.panel_height));
        }
        if o.switch_left_at >= o.switch_right_at {
            return Err(SettingsError::InvalidSetting {
                key: "overlay.switch_left_at".to_string(),
                reason: "must be below switch_right_at".to_string(),
            });
        }
        for (key, value) in [
            ("overlay.target_gap", o.target_gap),
            ("overlay.size_epsilon", o.size_epsilon),
            ("overlay.position_epsilon", o.position_epsilon),
            ("overlay.font_step", o.font_step),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::out_of_range(key, value));
            }
        }
        if o.settle_ticks == 0 {
            return Err(SettingsError::out_of_range("overlay.settle_ticks", o.settle_ticks));
        }
        if o.tick_interval_ms == 0 {
            return Err(SettingsError::out_of_range(
                "overlay.tick_interval_ms",
                o.tick_interval_ms,
            ));
        }
        if !(o.font_divisor.is_finite() && o.font_divisor > 0.0) {
            return Err(SettingsError::out_of_range("overlay.font_divisor", o.font_divisor));
        }

        if self.pages.file_prefix.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "pages.file_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
