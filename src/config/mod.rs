//! Configuration file support for telescriber.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/telescriber/config.toml`.
//! Settings include screen resolutions, camera control deltas, gesture
//! magnitudes, tool calibration references, and annotation appearance.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{
    AnnotationConfig, CalibrationConfig, CameraConfig, GestureConfig, ResolutionConfig,
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML
/// file. All fields have sensible defaults and will use those if not
/// specified in the config file.
///
/// # Example TOML
/// ```toml
/// [resolution]
/// logical_width = 1920
/// logical_height = 1080
///
/// [camera]
/// translation_step = 20.0
/// scale_step = 0.05
/// rotation_step_degrees = 5.0
///
/// [gesture]
/// group_zoom_in_factor = 1.2
/// group_zoom_out_factor = 0.8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Logical and touch-sensor resolutions
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Virtual camera control deltas
    #[serde(default)]
    pub camera: CameraConfig,

    /// Gesture interpretation magnitudes
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Physical-tool calibration references
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Annotation appearance
    #[serde(default)]
    pub annotation: AnnotationConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Ensures that user-provided config values cannot make the camera
    /// transform singular or the gesture magnitudes nonsensical. Invalid
    /// values are clamped to the nearest valid value and a warning is logged.
    fn validate_and_clamp(&mut self) {
        // Resolutions must stay positive; fall back to defaults otherwise.
        if self.resolution.logical_width <= 0.0 || self.resolution.logical_height <= 0.0 {
            log::warn!(
                "Invalid logical resolution {:.0}x{:.0}, falling back to defaults",
                self.resolution.logical_width,
                self.resolution.logical_height
            );
            let defaults = ResolutionConfig::default();
            self.resolution.logical_width = defaults.logical_width;
            self.resolution.logical_height = defaults.logical_height;
        }
        if self.resolution.sensor_width <= 0.0 || self.resolution.sensor_height <= 0.0 {
            log::warn!(
                "Invalid sensor resolution {:.0}x{:.0}, matching logical resolution",
                self.resolution.sensor_width,
                self.resolution.sensor_height
            );
            self.resolution.sensor_width = self.resolution.logical_width;
            self.resolution.sensor_height = self.resolution.logical_height;
        }

        // Camera deltas
        if !(1.0..=200.0).contains(&self.camera.translation_step) {
            log::warn!(
                "Invalid translation_step {:.1}, clamping to 1.0-200.0 range",
                self.camera.translation_step
            );
            self.camera.translation_step = self.camera.translation_step.clamp(1.0, 200.0);
        }
        if !(0.01..=0.5).contains(&self.camera.scale_step) {
            log::warn!(
                "Invalid scale_step {:.3}, clamping to 0.01-0.5 range",
                self.camera.scale_step
            );
            self.camera.scale_step = self.camera.scale_step.clamp(0.01, 0.5);
        }
        if !(0.5..=45.0).contains(&self.camera.rotation_step_degrees) {
            log::warn!(
                "Invalid rotation_step_degrees {:.1}, clamping to 0.5-45.0 range",
                self.camera.rotation_step_degrees
            );
            self.camera.rotation_step_degrees =
                self.camera.rotation_step_degrees.clamp(0.5, 45.0);
        }
        if !(0.01..=1.0).contains(&self.camera.min_scale) {
            log::warn!(
                "Invalid min_scale {:.3}, clamping to 0.01-1.0 range",
                self.camera.min_scale
            );
            self.camera.min_scale = self.camera.min_scale.clamp(0.01, 1.0);
        }

        // Gesture magnitudes
        if !(0.5..=30.0).contains(&self.gesture.group_rotate_step_degrees) {
            log::warn!(
                "Invalid group_rotate_step_degrees {:.1}, clamping to 0.5-30.0 range",
                self.gesture.group_rotate_step_degrees
            );
            self.gesture.group_rotate_step_degrees =
                self.gesture.group_rotate_step_degrees.clamp(0.5, 30.0);
        }
        if !(1.01..=2.0).contains(&self.gesture.group_zoom_in_factor) {
            log::warn!(
                "Invalid group_zoom_in_factor {:.2}, clamping to 1.01-2.0 range",
                self.gesture.group_zoom_in_factor
            );
            self.gesture.group_zoom_in_factor =
                self.gesture.group_zoom_in_factor.clamp(1.01, 2.0);
        }
        if !(0.5..=0.99).contains(&self.gesture.group_zoom_out_factor) {
            log::warn!(
                "Invalid group_zoom_out_factor {:.2}, clamping to 0.5-0.99 range",
                self.gesture.group_zoom_out_factor
            );
            self.gesture.group_zoom_out_factor =
                self.gesture.group_zoom_out_factor.clamp(0.5, 0.99);
        }
        if !(10.0..=200.0).contains(&self.gesture.pan_divisor) {
            log::warn!(
                "Invalid pan_divisor {:.1}, clamping to 10.0-200.0 range",
                self.gesture.pan_divisor
            );
            self.gesture.pan_divisor = self.gesture.pan_divisor.clamp(10.0, 200.0);
        }
        if !(1.0..=100.0).contains(&self.gesture.min_contact_separation) {
            log::warn!(
                "Invalid min_contact_separation {:.1}, clamping to 1.0-100.0 range",
                self.gesture.min_contact_separation
            );
            self.gesture.min_contact_separation =
                self.gesture.min_contact_separation.clamp(1.0, 100.0);
        }
        if !(1.0..=50.0).contains(&self.gesture.point_stamp_radius) {
            log::warn!(
                "Invalid point_stamp_radius {:.1}, clamping to 1.0-50.0 range",
                self.gesture.point_stamp_radius
            );
            self.gesture.point_stamp_radius = self.gesture.point_stamp_radius.clamp(1.0, 50.0);
        }

        // Calibration references
        if !(1.0..=500.0).contains(&self.calibration.reference_pixels_per_cm) {
            log::warn!(
                "Invalid reference_pixels_per_cm {:.1}, clamping to 1.0-500.0 range",
                self.calibration.reference_pixels_per_cm
            );
            self.calibration.reference_pixels_per_cm =
                self.calibration.reference_pixels_per_cm.clamp(1.0, 500.0);
        }
        if !(100.0..=10000.0).contains(&self.calibration.reference_hypotenuse) {
            log::warn!(
                "Invalid reference_hypotenuse {:.1}, clamping to 100.0-10000.0 range",
                self.calibration.reference_hypotenuse
            );
            self.calibration.reference_hypotenuse =
                self.calibration.reference_hypotenuse.clamp(100.0, 10000.0);
        }

        // Annotation appearance
        if !(1.0..=20.0).contains(&self.annotation.stroke_width) {
            log::warn!(
                "Invalid stroke_width {:.1}, clamping to 1.0-20.0 range",
                self.annotation.stroke_width
            );
            self.annotation.stroke_width = self.annotation.stroke_width.clamp(1.0, 20.0);
        }
        for i in 0..3 {
            if !(0.0..=1.0).contains(&self.annotation.unselected_color[i]) {
                log::warn!(
                    "Invalid unselected_color[{}] = {:.3}, clamping to 0.0-1.0",
                    i,
                    self.annotation.unselected_color[i]
                );
                self.annotation.unselected_color[i] =
                    self.annotation.unselected_color[i].clamp(0.0, 1.0);
            }
            if !(0.0..=1.0).contains(&self.annotation.selected_color[i]) {
                log::warn!(
                    "Invalid selected_color[{}] = {:.3}, clamping to 0.0-1.0",
                    i,
                    self.annotation.selected_color[i]
                );
                self.annotation.selected_color[i] =
                    self.annotation.selected_color[i].clamp(0.0, 1.0);
            }
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/telescriber/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("telescriber");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// If the file doesn't exist, returns a Config with default values. All
    /// loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or defaults when absent.
    ///
    /// Split out of [`Config::load`] so the replay binary and tests can point
    /// at a file without touching the user's config directory.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}
