//! Annotation container and group editing operations.

use super::line::{AnnotationId, LineAnnotation};
use crate::flags::ModeFlags;
use crate::notify::NotificationSink;
use std::collections::BTreeMap;

/// Container for all line annotations in the current session.
///
/// Annotations are keyed by stable id; iteration is in id order so rendering
/// and tests are deterministic. The store also tracks the ordered list of
/// selected ids and the id of the stroke currently being captured, and owns
/// the notification sink that reports lifecycle events outward.
///
/// A single stroke id moves through: Idle → Capturing (first point) →
/// Capturing (more points) → Committed or Discarded. Both end states are
/// terminal for that stroke; reusing the id starts over from Idle.
pub struct AnnotationStore {
    /// All annotations, id-ordered
    lines: BTreeMap<AnnotationId, LineAnnotation>,
    /// Ids currently selected, in selection order
    selected: Vec<AnnotationId>,
    /// Id of the stroke currently being captured, if any
    current_stroke: Option<AnnotationId>,
    /// Lifecycle event receiver
    sink: Box<dyn NotificationSink>,
}

impl AnnotationStore {
    /// Creates an empty store reporting to `sink`.
    pub fn new(sink: Box<dyn NotificationSink>) -> Self {
        Self {
            lines: BTreeMap::new(),
            selected: Vec::new(),
            current_stroke: None,
            sink,
        }
    }

    /// Number of stored annotations.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the store holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Looks up an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&LineAnnotation> {
        self.lines.get(&id)
    }

    /// Ids of all stored annotations, ascending.
    pub fn ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.lines.keys().copied()
    }

    /// Currently selected ids in selection order.
    pub fn selected_ids(&self) -> &[AnnotationId] {
        &self.selected
    }

    pub(crate) fn lines_mut(&mut self) -> &mut BTreeMap<AnnotationId, LineAnnotation> {
        &mut self.lines
    }

    pub(crate) fn selected_mut(&mut self) -> &mut Vec<AnnotationId> {
        &mut self.selected
    }

    /// Visits every drawable annotation in id order.
    ///
    /// Empty annotations (a stroke that has not received its first point)
    /// are skipped. This is the render adapter's read contract; the shared
    /// wrapper calls it with the store lock held for the whole iteration.
    pub fn for_each_visible<F>(&self, mut callback: F)
    where
        F: FnMut(AnnotationId, &[f64], bool),
    {
        for (id, line) in &self.lines {
            if line.is_empty() {
                continue;
            }
            callback(*id, line.points(), line.is_selected());
        }
    }

    // ------------------------------------------------------------------
    // Stroke capture
    // ------------------------------------------------------------------

    /// Starts or extends the stroke bound to `id`.
    ///
    /// A differing id starts a fresh annotation; the point is appended and
    /// the entry upserted into the map so the render actor can draw the
    /// stroke while it is still being captured.
    pub fn begin_or_continue_stroke(&mut self, id: AnnotationId, x: f64, y: f64) {
        if self.current_stroke != Some(id) {
            log::debug!("Starting stroke capture for annotation {id}");
            self.lines.insert(id, LineAnnotation::new(id));
            self.current_stroke = Some(id);
        }

        self.lines
            .entry(id)
            .or_insert_with(|| LineAnnotation::new(id))
            .add_point(x, y);
    }

    /// Finalizes the stroke under `id` and reports its creation.
    ///
    /// Unknown or empty strokes are a silent no-op.
    pub fn commit_stroke(&mut self, id: AnnotationId) {
        if let Some(line) = self.lines.get(&id) {
            if !line.is_empty() {
                let points = line.points().to_vec();
                self.sink.notify_create(id, &points);
                log::debug!("Committed stroke {id} with {} points", points.len() / 2);
            }
        }
        if self.current_stroke == Some(id) {
            self.current_stroke = None;
        }
    }

    /// Discards the stroke under `id` if it holds exactly one point pair.
    ///
    /// A single-pair stroke is tap noise, not a line; it is removed without
    /// any notification.
    pub fn discard_stroke_if_degenerate(&mut self, id: AnnotationId) {
        let degenerate = self
            .lines
            .get(&id)
            .is_some_and(|line| line.point_count() == 1);
        if degenerate {
            log::debug!("Discarding degenerate stroke {id}");
            self.lines.remove(&id);
            if self.current_stroke == Some(id) {
                self.current_stroke = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection lifecycle
    // ------------------------------------------------------------------

    /// Erases every selected annotation and reports the deletions.
    ///
    /// After the selected lines are removed, the selected-id list is
    /// extended with the virtual-annotation ids tracked by the external GUI
    /// and one delete notification is emitted per id in the union, flushing
    /// any externally tracked deletion in the same pass. The selection is
    /// cleared afterwards.
    pub fn erase_selected(&mut self, flags: &ModeFlags) {
        for id in &self.selected {
            self.lines.remove(id);
        }

        self.selected.extend(flags.virtual_selection.iter().copied());

        for id in &self.selected {
            self.sink.notify_delete(*id);
        }

        log::debug!("Erased {} annotation(s)", self.selected.len());
        self.selected.clear();
    }

    /// Clears the selection flag on every selected annotation.
    ///
    /// Ids no longer present in the store are skipped. Also resets the
    /// external `line_selected` flag.
    pub fn deselect_all(&mut self, flags: &mut ModeFlags) {
        for id in &self.selected {
            if let Some(line) = self.lines.get_mut(id) {
                line.set_selected(false);
            }
        }
        self.selected.clear();
        flags.line_selected = false;
    }

    /// Selects every annotation, then erases them all.
    pub fn clear_all(&mut self, flags: &ModeFlags) {
        self.selected = self.lines.keys().copied().collect();
        self.erase_selected(flags);
    }

    // ------------------------------------------------------------------
    // Group transforms
    // ------------------------------------------------------------------

    /// Shifts every selected annotation by the given delta.
    pub fn group_translate(&mut self, dx: f64, dy: f64) {
        for id in self.selected.clone() {
            if let Some(line) = self.lines.get_mut(&id) {
                line.translate(dx, dy);
            }
        }
    }

    /// Scales every selected annotation about the shared selection centroid.
    ///
    /// The pivot is the centroid of the selected annotations' centers, not
    /// each annotation's own center, so a multi-selection scales as one
    /// rigid group. Empty selection is a no-op.
    pub fn group_zoom(&mut self, factor: f64) {
        let Some((pivot_x, pivot_y)) = self.selection_centroid() else {
            return;
        };
        for id in self.selected.clone() {
            if let Some(line) = self.lines.get_mut(&id) {
                line.zoom_about(pivot_x, pivot_y, factor);
            }
        }
    }

    /// Rotates every selected annotation about the shared selection centroid.
    ///
    /// Empty selection is a no-op.
    pub fn group_rotate(&mut self, degrees: f64) {
        let Some((pivot_x, pivot_y)) = self.selection_centroid() else {
            return;
        };
        let angle_rad = degrees.to_radians();
        for id in self.selected.clone() {
            if let Some(line) = self.lines.get_mut(&id) {
                line.rotate_about(pivot_x, pivot_y, angle_rad);
            }
        }
    }

    /// Centroid of the selected annotations' centers.
    fn selection_centroid(&self) -> Option<(f64, f64)> {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;

        for id in &self.selected {
            if let Some(line) = self.lines.get(id) {
                let center = line.center();
                sum_x += center[0];
                sum_y += center[1];
                count += 1;
            }
        }

        if count == 0 {
            None
        } else {
            Some((sum_x / count as f64, sum_y / count as f64))
        }
    }

    // ------------------------------------------------------------------
    // Outbound reporting
    // ------------------------------------------------------------------

    /// Emits one update notification per selected annotation.
    ///
    /// Called when a group-transform gesture sequence ends so downstream
    /// consumers see the final geometry once, not per gesture step.
    pub fn notify_selected_updates(&mut self) {
        for id in self.selected.clone() {
            if let Some(line) = self.lines.get(&id) {
                let points = line.points().to_vec();
                self.sink.notify_update(id, &points);
            }
        }
    }

    /// Renders one annotation's coordinates in the legacy wire format.
    ///
    /// Coordinates are truncated to integers and joined with `/`; sub-pixel
    /// precision is not carried on this path.
    pub fn wire_string(&self, id: AnnotationId) -> Option<String> {
        let line = self.lines.get(&id)?;
        Some(
            line.points()
                .iter()
                .map(|value| (*value as i64).to_string())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }
}
