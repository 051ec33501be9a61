//! Shared-state wrappers for the input and render actors.

use super::store::AnnotationStore;
use crate::annotation::AnnotationId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mutex-guarded handle to the annotation store.
///
/// The store is the only state shared between the input actor (gesture and
/// keyboard callbacks) and the render actor (per-frame redraw). Every
/// multi-step read-modify-write — group transforms, erase, polygon
/// selection, draw iteration — must run inside a single [`Self::with`]
/// scope; the lock is never released mid-iteration, so the render actor can
/// never observe a transform half-applied.
#[derive(Clone)]
pub struct SharedAnnotationStore {
    inner: Arc<Mutex<AnnotationStore>>,
}

impl SharedAnnotationStore {
    /// Wraps a store for sharing between actors.
    pub fn new(store: AnnotationStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `operation` with the store lock held.
    ///
    /// A poisoned lock is recovered by continuing with the inner data: the
    /// store's state transitions are all small and self-consistent, and
    /// dropping every annotation over a panicked sibling thread would be
    /// worse than serving the last written state.
    pub fn with<R>(&self, operation: impl FnOnce(&mut AnnotationStore) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        operation(&mut guard)
    }

    /// Render read contract: visits every drawable annotation in id order
    /// with the lock held for the whole iteration.
    pub fn for_each_visible<F>(&self, callback: F)
    where
        F: FnMut(AnnotationId, &[f64], bool),
    {
        self.with(|store| store.for_each_visible(callback));
    }
}

/// Fire-and-forget redraw request shared between actors.
///
/// Gesture handlers set it and return immediately; the render actor drains
/// it once per tick. Never blocks.
#[derive(Clone, Default)]
pub struct RedrawSignal {
    pending: Arc<AtomicBool>,
}

impl RedrawSignal {
    /// Creates a signal with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a redraw.
    pub fn request(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Consumes a pending request, if any.
    ///
    /// # Returns
    /// `true` if a redraw had been requested since the last take.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}
