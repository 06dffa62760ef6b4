//! Window-manager tuning knobs: chrome allowances, animation timing, and placement defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading a [`WindowManagerConfig`].
pub enum ConfigError {
    /// The TOML document could not be parsed into a config.
    #[error("invalid window manager config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is outside its accepted range.
    #[error("window manager config field `{field}` is out of range: {reason}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Human-readable constraint description.
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry and timing constants consumed by the reducer and the browser host.
pub struct WindowManagerConfig {
    /// Height of the top menu bar; zoomed windows start just below it.
    pub menu_bar_height: i32,
    /// Vertical space kept free for the dock when zooming.
    pub dock_reserve: i32,
    /// Duration of the minimize ("genie") animation in milliseconds.
    pub minimize_animation_ms: u32,
    /// z-index of the bottom-most window; keeps windows above desktop chrome.
    pub z_index_base: u32,
    /// Default width of a freshly opened window.
    pub default_window_width: i32,
    /// Default height of a freshly opened window.
    pub default_window_height: i32,
    /// Lower bound for the zoomed width.
    pub zoom_min_width: i32,
    /// Lower bound for the zoomed height.
    pub zoom_min_height: i32,
    /// Fraction of viewport width a window may occupy after a viewport resize.
    pub clamp_width_ratio: f64,
    /// Fraction of viewport height a window may occupy after a viewport resize.
    pub clamp_height_ratio: f64,
    /// Fraction of viewport width a default-placed window may occupy.
    pub placement_width_ratio: f64,
    /// Fraction of viewport height a default-placed window may occupy.
    pub placement_height_ratio: f64,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            menu_bar_height: 24,
            dock_reserve: 100,
            minimize_animation_ms: 500,
            z_index_base: 100,
            default_window_width: 640,
            default_window_height: 420,
            zoom_min_width: 320,
            zoom_min_height: 200,
            clamp_width_ratio: 0.95,
            clamp_height_ratio: 0.9,
            placement_width_ratio: 0.9,
            placement_height_ratio: 0.75,
        }
    }
}

impl WindowManagerConfig {
    /// Parses a config from TOML; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::OutOfRange`] when a
    /// value cannot produce sane geometry.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that would otherwise yield negative or unbounded geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.menu_bar_height < 0 {
            return Err(ConfigError::OutOfRange {
                field: "menu_bar_height",
                reason: "must be >= 0",
            });
        }
        if self.dock_reserve < 0 {
            return Err(ConfigError::OutOfRange {
                field: "dock_reserve",
                reason: "must be >= 0",
            });
        }
        if self.default_window_width <= 0 || self.default_window_height <= 0 {
            return Err(ConfigError::OutOfRange {
                field: "default_window_width",
                reason: "default window size must be positive",
            });
        }
        let ratios = [
            ("clamp_width_ratio", self.clamp_width_ratio),
            ("clamp_height_ratio", self.clamp_height_ratio),
            ("placement_width_ratio", self.placement_width_ratio),
            ("placement_height_ratio", self.placement_height_ratio),
        ];
        for (field, ratio) in ratios {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: "ratio must be in (0, 1]",
                });
            }
        }
        Ok(())
    }
}
