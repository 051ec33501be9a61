//! Annotation data model, storage, and selection.
//!
//! This module defines the core annotation types of the overlay:
//! - [`LineAnnotation`]: one polyline stroke with derived extremes/center
//! - [`AnnotationStore`]: the id-ordered container with stroke capture,
//!   group transforms, and erase/deselect/clear operations
//! - Polygon selection over annotation centers (`select_in_polygon`)
//! - [`SharedAnnotationStore`]/[`RedrawSignal`]: the concurrency wrappers
//!   shared between the input and render actors

pub mod line;
pub mod select;
pub mod shared;
pub mod store;

// Re-export commonly used types at module level
pub use line::{AnnotationId, LineAnnotation};
pub use shared::{RedrawSignal, SharedAnnotationStore};
pub use store::AnnotationStore;
