// Settings module
// Grid geometry, gesture tuning and backend selection loaded from config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunables for the day grid and both drag controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Scale used at or above `compact_width_threshold`.
    pub desktop_px_per_hour: f32,
    /// Scale used on narrow viewports.
    pub compact_px_per_hour: f32,
    pub compact_width_threshold: f32,
    pub snap_minutes: u32,
    /// Minimum vertical gap between consecutive blocks after a resolve pass.
    pub gap: f32,
    pub long_press_ms: u64,
    /// Movement allowed while a long press is pending before it counts as a scroll.
    pub touch_tolerance: f32,
    pub edge_margin_top: f32,
    pub edge_margin_bottom: f32,
    /// Pixels scrolled per frame while the finger sits in an edge margin.
    pub autoscroll_step: f32,
    pub now_tick_secs: u64,
    /// Length of the optimistic move/removal animation.
    pub transition_ms: u64,
    /// Paint-only floor so very short blocks stay clickable.
    pub min_block_height: f32,
    /// Leftward travel that reveals a block's delete action.
    pub swipe_reveal_distance: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            desktop_px_per_hour: 160.0,
            compact_px_per_hour: 100.0,
            compact_width_threshold: 768.0,
            snap_minutes: 15,
            gap: 8.0,
            long_press_ms: 600,
            touch_tolerance: 8.0,
            edge_margin_top: 160.0,
            edge_margin_bottom: 120.0,
            autoscroll_step: 12.0,
            now_tick_secs: 60,
            transition_ms: 300,
            min_block_height: 30.0,
            swipe_reveal_distance: 48.0,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.desktop_px_per_hour <= 0.0 || self.compact_px_per_hour <= 0.0 {
            return Err("Pixels per hour must be positive".to_string());
        }
        if self.snap_minutes == 0 || 60 % self.snap_minutes != 0 {
            return Err("Snap interval must divide an hour evenly".to_string());
        }
        if self.gap < 0.0 {
            return Err("Gap cannot be negative".to_string());
        }
        if self.now_tick_secs == 0 {
            return Err("Now indicator interval must be at least one second".to_string());
        }
        Ok(())
    }
}

/// How the drag controller is chosen at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Auto,
    Pointer,
    Touch,
}

/// Where the schedule lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Http {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
    },
    Sqlite {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input_mode: InputMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub grid: GridSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Auto,
            backend: None,
            grid: GridSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_settings_are_valid() {
        assert!(GridSettings::default().validate().is_ok());
    }

    #[test]
    fn test_snap_must_divide_hour() {
        let settings = GridSettings {
            snap_minutes: 7,
            ..GridSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            input_mode = "touch"

            [backend]
            kind = "http"
            base_url = "https://planner.example.com"

            [grid]
            desktop_px_per_hour = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.input_mode, InputMode::Touch);
        assert_eq!(
            config.backend,
            Some(BackendConfig::Http {
                base_url: "https://planner.example.com".to_string(),
                token: None
            })
        );
        assert_eq!(config.grid.desktop_px_per_hour, 120.0);
        assert_eq!(config.grid.snap_minutes, 15);
        assert_eq!(config.grid.long_press_ms, 600);
    }
}
