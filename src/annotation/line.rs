//! Line annotation data model.

use crate::geometry;
use serde::{Deserialize, Serialize};

/// Stable identifier of an annotation.
///
/// Assigned by the gesture dispatcher's monotonic counter. Virtual
/// annotations tracked by the external GUI share the same id space.
pub type AnnotationId = u32;

/// Sentinel magnitude for freshly reset extremes: min components start at
/// `+EXTREME_BOUND`, max components at `-EXTREME_BOUND`, so the first real
/// point always replaces them. The midpoint of the sentinels is the origin,
/// keeping the derived center finite for an empty annotation.
pub const EXTREME_BOUND: f64 = 10_000.0;

/// A polyline annotation in world space.
///
/// Points are stored as a flat x/y list in insertion order (the stroke
/// path). The extreme values bound the stroke and the center is always the
/// midpoint of the current extremes; both are maintained on every edit so
/// they are never stale across a transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineAnnotation {
    /// Stable id assigned by the caller
    pub id: AnnotationId,
    /// Flat x/y pairs in world space, insertion order significant
    points: Vec<f64>,
    /// [min_x, min_y, max_x, max_y] of the stroke
    extremes: [f64; 4],
    /// Midpoint of the extremes
    center: [f64; 2],
    /// Whether this annotation is currently selected
    selected: bool,
}

impl LineAnnotation {
    /// Creates an empty annotation bound to `id`.
    ///
    /// An annotation with no points is transient (in-progress stroke
    /// capture) and must not be drawn.
    pub fn new(id: AnnotationId) -> Self {
        let mut annotation = Self {
            id,
            points: Vec::new(),
            extremes: [0.0; 4],
            center: [0.0; 2],
            selected: false,
        };
        annotation.reset_extremes();
        annotation
    }

    /// Flat x/y point list.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of coordinate pairs.
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    /// Whether the annotation holds no points yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current `[min_x, min_y, max_x, max_y]` extreme values.
    pub fn extremes(&self) -> [f64; 4] {
        self.extremes
    }

    /// Derived center, the midpoint of the extremes.
    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    /// Current selection flag.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Sets the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Appends a point, growing the extremes and refreshing the center.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(x);
        self.points.push(y);

        if x < self.extremes[0] {
            self.extremes[0] = x;
        }
        if y < self.extremes[1] {
            self.extremes[1] = y;
        }
        if x > self.extremes[2] {
            self.extremes[2] = x;
        }
        if y > self.extremes[3] {
            self.extremes[3] = y;
        }

        self.recalculate_center();
    }

    /// Drops all points and restores the extreme sentinels.
    pub fn clear_points(&mut self) {
        self.points.clear();
        self.reset_extremes();
    }

    /// Shifts every point and all four extreme values.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for pair in self.points.chunks_exact_mut(2) {
            pair[0] += dx;
            pair[1] += dy;
        }
        self.extremes[0] += dx;
        self.extremes[1] += dy;
        self.extremes[2] += dx;
        self.extremes[3] += dy;
        self.recalculate_center();
    }

    /// Scales every point and the extreme values about the given pivot.
    pub fn zoom_about(&mut self, pivot_x: f64, pivot_y: f64, factor: f64) {
        for pair in self.points.chunks_exact_mut(2) {
            pair[0] = (pair[0] - pivot_x) * factor + pivot_x;
            pair[1] = (pair[1] - pivot_y) * factor + pivot_y;
        }
        self.extremes[0] = (self.extremes[0] - pivot_x) * factor + pivot_x;
        self.extremes[1] = (self.extremes[1] - pivot_y) * factor + pivot_y;
        self.extremes[2] = (self.extremes[2] - pivot_x) * factor + pivot_x;
        self.extremes[3] = (self.extremes[3] - pivot_y) * factor + pivot_y;
        self.recalculate_center();
    }

    /// Rotates every point and both extreme corners about the given pivot.
    ///
    /// The extreme corners are rotated as points, not recomputed as an
    /// axis-aligned box; their midpoint still tracks the rotated center.
    pub fn rotate_about(&mut self, pivot_x: f64, pivot_y: f64, angle_rad: f64) {
        for pair in self.points.chunks_exact_mut(2) {
            let (x, y) =
                geometry::rotate_point(pair[0], pair[1], 0.0, 0.0, angle_rad, pivot_x, pivot_y);
            pair[0] = x;
            pair[1] = y;
        }

        let (min_x, min_y) = geometry::rotate_point(
            self.extremes[0],
            self.extremes[1],
            0.0,
            0.0,
            angle_rad,
            pivot_x,
            pivot_y,
        );
        let (max_x, max_y) = geometry::rotate_point(
            self.extremes[2],
            self.extremes[3],
            0.0,
            0.0,
            angle_rad,
            pivot_x,
            pivot_y,
        );
        self.extremes = [min_x, min_y, max_x, max_y];
        self.recalculate_center();
    }

    fn reset_extremes(&mut self) {
        self.extremes = [EXTREME_BOUND, EXTREME_BOUND, -EXTREME_BOUND, -EXTREME_BOUND];
        self.recalculate_center();
    }

    fn recalculate_center(&mut self) {
        self.center = [
            (self.extremes[0] + self.extremes[2]) / 2.0,
            (self.extremes[1] + self.extremes[3]) / 2.0,
        ];
    }
}
