//! Outbound notification contract for annotation lifecycle events.
//!
//! The store reports create/update/delete synchronously through this trait;
//! what happens with the events (JSON emission, network transport) is the
//! embedding layer's concern. Calls are fire-and-forget: the core does not
//! recover from sink failures, so implementations should swallow their own
//! errors.

use crate::annotation::AnnotationId;

/// Receiver of annotation lifecycle events.
pub trait NotificationSink: Send {
    /// A new annotation was committed with the given stroke points.
    fn notify_create(&mut self, id: AnnotationId, points: &[f64]);

    /// An existing annotation's points changed (group transform finalized).
    fn notify_update(&mut self, id: AnnotationId, points: &[f64]);

    /// An annotation was erased.
    fn notify_delete(&mut self, id: AnnotationId);
}

/// Sink that drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify_create(&mut self, _id: AnnotationId, _points: &[f64]) {}
    fn notify_update(&mut self, _id: AnnotationId, _points: &[f64]) {}
    fn notify_delete(&mut self, _id: AnnotationId) {}
}

/// One recorded lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Create { id: AnnotationId, points: Vec<f64> },
    Update { id: AnnotationId, points: Vec<f64> },
    Delete { id: AnnotationId },
}

/// Sink that records events into a shared list.
///
/// Intended for tests and diagnostics: the store owns the sink, so the
/// recorded list is handed out through a cloneable handle.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Arc<std::sync::Mutex<Vec<NotificationEvent>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded event list.
    pub fn events(&self) -> std::sync::Arc<std::sync::Mutex<Vec<NotificationEvent>>> {
        self.events.clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify_create(&mut self, id: AnnotationId, points: &[f64]) {
        self.events.lock().unwrap().push(NotificationEvent::Create {
            id,
            points: points.to_vec(),
        });
    }

    fn notify_update(&mut self, id: AnnotationId, points: &[f64]) {
        self.events.lock().unwrap().push(NotificationEvent::Update {
            id,
            points: points.to_vec(),
        });
    }

    fn notify_delete(&mut self, id: AnnotationId) {
        self.events
            .lock()
            .unwrap()
            .push(NotificationEvent::Delete { id });
    }
}
