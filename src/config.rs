// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Editor configuration with optional TOML file support.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::constant::{CONFIG_DIR, CONFIG_FILE, MAX_SCALE, MIN_SCALE};
use crate::domain::document::DocResult;

/// Editor configuration, injected at construction instead of being read from
/// ambient window state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Minimum zoom scale (0.5 = 50%).
    pub min_scale: f64,
    /// Maximum zoom scale (8.0 = 800%).
    pub max_scale: f64,
    /// Scale delta applied per mouse wheel notch.
    pub wheel_zoom_step: f64,
    /// Scale delta applied per zoom-in / zoom-out action.
    pub button_zoom_step: f64,
    /// Initial stroke thickness in logical pixels.
    pub default_thickness: u32,
    /// Initial pixelate block size in device pixels.
    pub default_block_size: u32,
    /// Initial stroke colour as `#rrggbb`.
    pub default_color: String,
    /// Quick-pick colours as `#rrggbb`.
    pub palette: Vec<String>,
    /// Device pixel ratio of the target display.
    pub device_pixel_ratio: f64,
    /// Optional box (logical pixels) the decoded image is fitted into.
    pub fit_width: Option<u32>,
    pub fit_height: Option<u32>,
    /// Maximum number of history snapshots; `None` keeps all of them.
    pub history_limit: Option<usize>,
    /// JPEG quality of the exported image (1..=100).
    pub jpeg_quality: u8,
    /// Optional TrueType/OpenType font used for text stamps.
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_zoom_step: 0.1,
            button_zoom_step: 0.25,
            default_thickness: 6,
            default_block_size: 16,
            default_color: "#e11d48".to_string(),
            palette: ["#e11d48", "#ffffff", "#facc15", "#22c55e", "#3b82f6"]
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            device_pixel_ratio: 1.0,
            fit_width: None,
            fit_height: None,
            history_limit: None,
            jpeg_quality: 95,
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Default location of the config file (`<config_dir>/exhibit/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml(text: &str) -> DocResult<Self> {
        let config: Self = toml::from_str(text).context("Invalid config file")?;
        Ok(config.sanitized())
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> DocResult<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// The fit box, when both edges are configured.
    pub fn fit_box(&self) -> Option<(u32, u32)> {
        match (self.fit_width, self.fit_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Repair values that would break invariants elsewhere.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.min_scale.is_nan() {
            self.min_scale = MIN_SCALE;
        }
        if self.max_scale.is_nan() {
            self.max_scale = MAX_SCALE;
        }
        self.min_scale = self.min_scale.clamp(MIN_SCALE, MAX_SCALE);
        self.max_scale = self.max_scale.clamp(self.min_scale, MAX_SCALE);
        if !(self.device_pixel_ratio > 0.0) || !self.device_pixel_ratio.is_finite() {
            self.device_pixel_ratio = 1.0;
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.history_limit == Some(0) {
            self.history_limit = Some(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml("default_thickness = 10\njpeg_quality = 80\n").unwrap();
        assert_eq!(config.default_thickness, 10);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.max_scale, 8.0);
        assert_eq!(config.palette.len(), 5);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::from_toml("min_scale = \"tiny\"").is_err());
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let config = AppConfig {
            device_pixel_ratio: 0.0,
            jpeg_quality: 0,
            history_limit: Some(0),
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!(config.device_pixel_ratio, 1.0);
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.history_limit, Some(1));
    }

    #[test]
    fn zoom_bounds_are_clamped_into_range() {
        let config = AppConfig::from_toml("min_scale = 0.1\nmax_scale = 20.0\n").unwrap();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 8.0));

        let config = AppConfig::from_toml("min_scale = 3.0\nmax_scale = 2.0\n").unwrap();
        assert_eq!((config.min_scale, config.max_scale), (3.0, 3.0));

        let config = AppConfig {
            min_scale: f64::NAN,
            max_scale: f64::INFINITY,
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 8.0));
    }

    #[test]
    fn fit_box_needs_both_edges() {
        let mut config = AppConfig::default();
        assert_eq!(config.fit_box(), None);
        config.fit_width = Some(800);
        assert_eq!(config.fit_box(), None);
        config.fit_height = Some(600);
        assert_eq!(config.fit_box(), Some((800, 600)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/exhibit/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
