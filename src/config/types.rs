//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Screen and touch-sensor resolution settings.
///
/// The logical resolution is the coordinate system the overlay renders in and
/// the camera pivots around. The sensor resolution is what the touch hardware
/// reports; raw gesture coordinates are rescaled from sensor to logical space
/// before any other processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Logical horizontal resolution in pixels
    #[serde(default = "default_logical_width")]
    pub logical_width: f64,

    /// Logical vertical resolution in pixels
    #[serde(default = "default_logical_height")]
    pub logical_height: f64,

    /// Horizontal resolution reported by the touch sensor
    #[serde(default = "default_logical_width")]
    pub sensor_width: f64,

    /// Vertical resolution reported by the touch sensor
    #[serde(default = "default_logical_height")]
    pub sensor_height: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            logical_width: default_logical_width(),
            logical_height: default_logical_height(),
            sensor_width: default_logical_width(),
            sensor_height: default_logical_height(),
        }
    }
}

/// Virtual camera control settings.
///
/// Each discrete camera control applies one of these fixed-magnitude deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Pan distance per control press in logical pixels (valid range: 1.0 - 200.0)
    #[serde(default = "default_translation_step")]
    pub translation_step: f64,

    /// Zoom delta per control press (valid range: 0.01 - 0.5)
    #[serde(default = "default_scale_step")]
    pub scale_step: f64,

    /// Rotation per control press in degrees (valid range: 0.5 - 45.0)
    #[serde(default = "default_rotation_step")]
    pub rotation_step_degrees: f64,

    /// Smallest allowed camera scale; zooming out stops here so the view
    /// transform always stays invertible (valid range: 0.01 - 1.0)
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            translation_step: default_translation_step(),
            scale_step: default_scale_step(),
            rotation_step_degrees: default_rotation_step(),
            min_scale: default_min_scale(),
        }
    }
}

/// Gesture interpretation settings.
///
/// Controls the magnitudes applied by group-transform gestures and the shape
/// of stamped point annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Group rotation per rotate gesture in degrees (valid range: 0.5 - 30.0)
    #[serde(default = "default_group_rotate_step")]
    pub group_rotate_step_degrees: f64,

    /// Group scale factor per split-apart gesture (valid range: 1.01 - 2.0)
    #[serde(default = "default_group_zoom_in")]
    pub group_zoom_in_factor: f64,

    /// Group scale factor per split-close gesture (valid range: 0.5 - 0.99)
    #[serde(default = "default_group_zoom_out")]
    pub group_zoom_out_factor: f64,

    /// Divisor of the logical resolution giving the pan distance per
    /// parallel-move gesture (valid range: 10.0 - 200.0)
    #[serde(default = "default_pan_divisor")]
    pub pan_divisor: f64,

    /// Minimum per-axis separation between two contacts before they are
    /// treated as a placed physical tool, in sensor pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_min_contact_separation")]
    pub min_contact_separation: f64,

    /// Offset distance of the stamped point-annotation ring (valid range: 1.0 - 50.0)
    #[serde(default = "default_point_stamp_radius")]
    pub point_stamp_radius: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            group_rotate_step_degrees: default_group_rotate_step(),
            group_zoom_in_factor: default_group_zoom_in(),
            group_zoom_out_factor: default_group_zoom_out(),
            pan_divisor: default_pan_divisor(),
            min_contact_separation: default_min_contact_separation(),
            point_stamp_radius: default_point_stamp_radius(),
        }
    }
}

/// Physical-tool calibration settings.
///
/// Converts a pixel distance between two tracked contacts into a physical
/// measurement using a reference screen whose pixel pitch is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Pixels per centimeter on the reference screen (valid range: 1.0 - 500.0)
    #[serde(default = "default_reference_pixels_per_cm")]
    pub reference_pixels_per_cm: f64,

    /// Diagonal of the reference screen in pixels (valid range: 100.0 - 10000.0)
    #[serde(default = "default_reference_hypotenuse")]
    pub reference_hypotenuse: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_pixels_per_cm: default_reference_pixels_per_cm(),
            reference_hypotenuse: default_reference_hypotenuse(),
        }
    }
}

/// Annotation appearance settings read by the render adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Stroke color of unselected annotations as RGB in 0.0-1.0
    #[serde(default = "default_unselected_color")]
    pub unselected_color: [f32; 3],

    /// Stroke color of selected annotations as RGB in 0.0-1.0
    #[serde(default = "default_selected_color")]
    pub selected_color: [f32; 3],

    /// Stroke width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            unselected_color: default_unselected_color(),
            selected_color: default_selected_color(),
            stroke_width: default_stroke_width(),
        }
    }
}

// Default value functions for serde

fn default_logical_width() -> f64 {
    1920.0
}

fn default_logical_height() -> f64 {
    1080.0
}

fn default_translation_step() -> f64 {
    20.0
}

fn default_scale_step() -> f64 {
    0.05
}

fn default_rotation_step() -> f64 {
    5.0
}

fn default_min_scale() -> f64 {
    0.05
}

fn default_group_rotate_step() -> f64 {
    2.0
}

fn default_group_zoom_in() -> f64 {
    1.2
}

fn default_group_zoom_out() -> f64 {
    0.8
}

fn default_pan_divisor() -> f64 {
    50.0
}

fn default_min_contact_separation() -> f64 {
    10.0
}

fn default_point_stamp_radius() -> f64 {
    5.0
}

fn default_reference_pixels_per_cm() -> f64 {
    37.8
}

fn default_reference_hypotenuse() -> f64 {
    2202.91
}

fn default_unselected_color() -> [f32; 3] {
    [0.97, 1.0, 0.0]
}

fn default_selected_color() -> [f32; 3] {
    [0.97, 0.0, 0.0]
}

fn default_stroke_width() -> f64 {
    5.0
}
