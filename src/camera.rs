//! Virtual camera transform between world space and screen space.
//!
//! The camera maintains the transformations applied to world-space elements
//! (the video frame and annotations) before they are drawn, and uses the same
//! transform to interpret screen-space input as world-space queries.
//!
//! By default the incoming video frame fills the view, with this coordinate
//! system:
//!
//! ```text
//! (0,0) ----------------- (w,0)
//! |                           |
//! |                           |
//! (0,h) ----------------- (w,h)
//! ```
//!
//! Annotations are stored in a world-space system matching this. Rendering
//! converts world space to screen space through a homography that the camera
//! controls update; the on-screen GUI is unaffected (always screen space).
//!
//! The camera can be driven from the keyboard's keypad (Num Lock on):
//!
//! ```text
//! +--------+--------+--------+
//! |  zoom  |  move  |  zoom  |
//! |  out 7 |  up  8 |  in  9 |
//! +--------+--------+--------+
//! |  move  |  reset |  move  |
//! |  left 4|      5 | right 6|
//! +--------+--------+--------+
//! | rotate |  move  | rotate |
//! |  ccw 1 | down 2 |  cw  3 |
//! +--------+--------+--------+
//! ```

use crate::config::{CameraConfig, ResolutionConfig};
use glam::{DMat3, DVec2, DVec3};

/// The nine discrete camera controls.
///
/// Each control applies one fixed-magnitude parameter delta taken from
/// [`CameraConfig`]; magnitudes are configuration, not per-call-site values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraControl {
    /// Pan the view left
    PanLeft,
    /// Pan the view right
    PanRight,
    /// Pan the view up
    PanUp,
    /// Pan the view down
    PanDown,
    /// Zoom in by one scale step
    ZoomIn,
    /// Zoom out by one scale step (bounded by the scale floor)
    ZoomOut,
    /// Rotate clockwise by one rotation step
    RotateClockwise,
    /// Rotate counterclockwise by one rotation step
    RotateCounterclockwise,
    /// Restore scale, rotation, and translation to defaults
    Reset,
}

impl CameraControl {
    /// Maps a keypad character to its camera control, if any.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '7' => Some(Self::ZoomOut),
            '8' => Some(Self::PanUp),
            '9' => Some(Self::ZoomIn),
            '4' => Some(Self::PanLeft),
            '5' => Some(Self::Reset),
            '6' => Some(Self::PanRight),
            '1' => Some(Self::RotateCounterclockwise),
            '2' => Some(Self::PanDown),
            '3' => Some(Self::RotateClockwise),
            _ => None,
        }
    }
}

/// Camera state: scale, rotation, and translation plus the derived
/// homography and its inverse.
///
/// The homography and inverse are recomputed after every parameter change
/// and never mutated directly. Scale is clamped to a positive floor before
/// each recomputation, so the inverse always exists.
#[derive(Debug, Clone)]
pub struct CameraTransform {
    /// Zoom factor (1.0 = native)
    scale: f64,
    /// Counterclockwise rotation in degrees
    rotation_degrees: f64,
    /// Accumulated pan offset from the default view
    translation: DVec2,

    /// World → screen transform
    homography: DMat3,
    /// Screen → world transform
    inverse: DMat3,

    config: CameraConfig,
    logical_width: f64,
    logical_height: f64,
}

impl CameraTransform {
    /// Creates a camera at the default view for the given logical resolution.
    pub fn new(config: CameraConfig, resolution: &ResolutionConfig) -> Self {
        let mut camera = Self {
            scale: 1.0,
            rotation_degrees: 0.0,
            translation: DVec2::ZERO,
            homography: DMat3::IDENTITY,
            inverse: DMat3::IDENTITY,
            config,
            logical_width: resolution.logical_width,
            logical_height: resolution.logical_height,
        };
        camera.update_homography();
        camera
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current rotation in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Current pan offset.
    pub fn translation(&self) -> (f64, f64) {
        (self.translation.x, self.translation.y)
    }

    /// World → screen matrix.
    pub fn homography(&self) -> DMat3 {
        self.homography
    }

    /// Screen → world matrix.
    pub fn inverse_homography(&self) -> DMat3 {
        self.inverse
    }

    /// Recomputes the homography and its inverse from the current parameters.
    ///
    /// The homography is `translation × rotation_scale`, where the
    /// rotation/scale part pivots about the fixed screen center. Scale is
    /// clamped to the configured floor first so the matrix stays invertible.
    fn update_homography(&mut self) {
        if self.scale < self.config.min_scale {
            log::warn!(
                "Camera scale {:.3} below floor, clamping to {:.3}",
                self.scale,
                self.config.min_scale
            );
            self.scale = self.config.min_scale;
        }

        let center_x = self.logical_width / 2.0;
        let center_y = self.logical_height / 2.0;

        let theta = self.rotation_degrees.to_radians();
        let alpha = self.scale * theta.cos();
        let beta = self.scale * theta.sin();

        // Rotation/scale about the screen center.
        let rotation_scale = mat3_from_rows(
            [alpha, beta, (1.0 - alpha) * center_x - beta * center_y],
            [-beta, alpha, beta * center_x + (1.0 - alpha) * center_y],
            [0.0, 0.0, 1.0],
        );

        let translation = mat3_from_rows(
            [1.0, 0.0, self.translation.x],
            [0.0, 1.0, self.translation.y],
            [0.0, 0.0, 1.0],
        );

        self.homography = translation * rotation_scale;
        self.inverse = self.homography.inverse();
    }

    /// Restores the default view.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.rotation_degrees = 0.0;
        self.translation = DVec2::ZERO;
        self.update_homography();
    }

    /// Converts a screen-space point to world space.
    ///
    /// The vertical axis is flipped into the renderer's orientation before
    /// applying the inverse homography and flipped back afterwards. This is
    /// a fixed convention of the boundary with the renderer; changing it
    /// breaks visual alignment between input and drawn annotations.
    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let src = DVec3::new(x, self.logical_height - y, 1.0);
        let dst = self.inverse * src;
        (dst.x, self.logical_height - dst.y)
    }

    /// Converts a world-space point to screen space.
    ///
    /// Applies the homography directly; world space already matches screen
    /// orientation on this side of the boundary.
    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let dst = self.homography * DVec3::new(x, y, 1.0);
        (dst.x, dst.y)
    }

    /// Applies one discrete camera control and recomputes the homography.
    pub fn apply(&mut self, control: CameraControl) {
        match control {
            CameraControl::PanLeft => self.translation.x -= self.config.translation_step,
            CameraControl::PanRight => self.translation.x += self.config.translation_step,
            CameraControl::PanUp => self.translation.y += self.config.translation_step,
            CameraControl::PanDown => self.translation.y -= self.config.translation_step,
            CameraControl::ZoomIn => self.scale += self.config.scale_step,
            CameraControl::ZoomOut => self.scale -= self.config.scale_step,
            CameraControl::RotateClockwise => {
                self.rotation_degrees += self.config.rotation_step_degrees
            }
            CameraControl::RotateCounterclockwise => {
                self.rotation_degrees -= self.config.rotation_step_degrees
            }
            CameraControl::Reset => {
                self.reset();
                return;
            }
        }
        self.update_homography();
    }

    /// Handles a keyboard key, consuming it when it maps to a camera control.
    ///
    /// # Returns
    /// `true` if the key was a camera control key, `false` otherwise.
    pub fn handle_key(&mut self, key: char) -> bool {
        match CameraControl::from_key(key) {
            Some(control) => {
                log::debug!("Camera control {:?} from key '{}'", control, key);
                self.apply(control);
                true
            }
            None => false,
        }
    }
}

fn mat3_from_rows(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(r0[0], r1[0], r2[0]),
        DVec3::new(r0[1], r1[1], r2[1]),
        DVec3::new(r0[2], r1[2], r2[2]),
    )
}
