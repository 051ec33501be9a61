//! Region-of-interest selection over annotation centers.

use super::store::AnnotationStore;
use crate::geometry;

impl AnnotationStore {
    /// Selects every annotation whose center lies inside the given polygon.
    ///
    /// `polygon` is a flat x/y vertex list in world space, closed by
    /// repeating the first vertex. Any previous selection is cleared first;
    /// each annotation's center is then tested by walking consecutive
    /// polygon edges and accumulating crossing parity (see
    /// [`geometry::point_in_ring`] for the exact edge form the parity test
    /// uses). Annotations with odd parity are flagged selected and their
    /// ids appended in id order.
    ///
    /// A center exactly on a polygon edge resolves through the on-axis
    /// epsilon of the crossing test; there is no further special-casing.
    ///
    /// # Returns
    /// `true` when at least one annotation was selected (the caller uses
    /// this to request a redraw and set the `line_selected` mode flag).
    pub fn select_in_polygon(&mut self, polygon: &[f64]) -> bool {
        // Drop the previous selection; ids already gone from the map are
        // skipped.
        let previous = std::mem::take(self.selected_mut());
        for id in previous {
            if let Some(line) = self.lines_mut().get_mut(&id) {
                line.set_selected(false);
            }
        }

        let mut selected_ids = Vec::new();
        for (id, line) in self.lines_mut().iter_mut() {
            if line.is_empty() {
                continue;
            }
            let center = line.center();
            if geometry::point_in_ring(center[0], center[1], polygon) {
                line.set_selected(true);
                selected_ids.push(*id);
            }
        }

        let any = !selected_ids.is_empty();
        if any {
            log::debug!("Polygon selection matched {} annotation(s)", selected_ids.len());
        }
        *self.selected_mut() = selected_ids;
        any
    }
}
