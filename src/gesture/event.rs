//! Gesture event types shared across input backends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recognized touch gesture types.
///
/// Backends (touch frameworks, the mouse fallback, trace replay) map their
/// native gesture codes onto these values for unified dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    /// First contact of a gesture sequence
    TouchStart,
    /// Single contact pressed down
    Down,
    /// Single contact dragging (draw motion)
    Move,
    /// Contact released without significant motion
    Click,
    /// Single contact swiping right
    MoveRight,
    /// Single contact swiping left
    MoveLeft,
    /// Single contact swiping down
    MoveDown,
    /// Single contact swiping up
    MoveUp,
    /// Last contact of a gesture sequence lifted (the commit point)
    TouchEnd,
    /// Two contacts rotating clockwise
    RotateClockwise,
    /// Two contacts rotating counterclockwise
    RotateAnticlockwise,
    /// Two contacts spreading apart
    SplitApart,
    /// Two contacts pinching together
    SplitClose,
    /// Two near-parallel contacts moving up
    NearParallelMoveUp,
    /// Two near-parallel contacts moving down
    NearParallelMoveDown,
    /// Two near-parallel contacts moving right
    NearParallelMoveRight,
    /// Two near-parallel contacts moving left
    NearParallelMoveLeft,
    /// Several contacts pressed down simultaneously
    MultiDown,
    /// Several contacts moving together
    MultiMove,
}

impl GestureKind {
    /// Minimum number of parameters a well-formed event of this kind carries.
    pub fn min_params(self) -> usize {
        match self {
            Self::TouchStart
            | Self::TouchEnd
            | Self::RotateClockwise
            | Self::RotateAnticlockwise
            | Self::NearParallelMoveUp
            | Self::NearParallelMoveDown
            | Self::NearParallelMoveRight
            | Self::NearParallelMoveLeft => 0,
            Self::SplitApart | Self::SplitClose => 1,
            Self::Down
            | Self::Move
            | Self::Click
            | Self::MoveRight
            | Self::MoveLeft
            | Self::MoveDown
            | Self::MoveUp => 2,
            Self::MultiDown | Self::MultiMove => 6,
        }
    }

    /// Whether this kind is a group-transform gesture (rotate/zoom/pan).
    ///
    /// Touch-end consults the last transform gesture to decide whether an
    /// update notification pass is due.
    pub fn is_transform(self) -> bool {
        matches!(
            self,
            Self::RotateClockwise
                | Self::RotateAnticlockwise
                | Self::SplitApart
                | Self::SplitClose
                | Self::NearParallelMoveUp
                | Self::NearParallelMoveDown
                | Self::NearParallelMoveRight
                | Self::NearParallelMoveLeft
        )
    }
}

/// One raw gesture event as delivered by a backend.
///
/// Parameters are raw sensor coordinates (and auxiliary values for
/// multi-contact gestures); the dispatcher rescales and resolves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureEvent {
    /// Gesture type
    pub kind: GestureKind,
    /// Raw parameter list; meaning depends on `kind`
    #[serde(default)]
    pub params: Vec<f64>,
    /// Backend timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl GestureEvent {
    /// Builds an event with no timestamp.
    pub fn new(kind: GestureKind, params: Vec<f64>) -> Self {
        Self {
            kind,
            params,
            timestamp_ms: 0,
        }
    }

    /// Checks the parameter arity for this event's kind.
    pub fn validate(&self) -> Result<(), DispatchError> {
        let expected = self.kind.min_params();
        if self.params.len() < expected {
            return Err(DispatchError::MalformedGesture {
                kind: self.kind,
                expected,
                got: self.params.len(),
            });
        }
        Ok(())
    }
}

/// Errors surfaced by gesture dispatch.
///
/// A malformed event is rejected and logged by the caller; it never stops
/// the dispatch loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("gesture {kind:?} carries {got} parameter(s), expected at least {expected}")]
    MalformedGesture {
        kind: GestureKind,
        expected: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_validation_accepts_well_formed_events() {
        assert!(GestureEvent::new(GestureKind::Down, vec![10.0, 20.0])
            .validate()
            .is_ok());
        assert!(GestureEvent::new(GestureKind::TouchEnd, vec![])
            .validate()
            .is_ok());
        assert!(
            GestureEvent::new(GestureKind::MultiDown, vec![0.0; 6])
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn arity_validation_rejects_short_parameter_lists() {
        let err = GestureEvent::new(GestureKind::Move, vec![1.0])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MalformedGesture {
                kind: GestureKind::Move,
                expected: 2,
                got: 1,
            }
        ));
    }

    #[test]
    fn transform_kinds_cover_rotate_zoom_pan() {
        assert!(GestureKind::RotateClockwise.is_transform());
        assert!(GestureKind::SplitClose.is_transform());
        assert!(GestureKind::NearParallelMoveLeft.is_transform());
        assert!(!GestureKind::Move.is_transform());
        assert!(!GestureKind::TouchEnd.is_transform());
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = GestureEvent {
            kind: GestureKind::MultiMove,
            params: vec![0.0, 0.0, 100.0, 120.0, 160.0, 200.0],
            timestamp_ms: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GestureEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, event.kind);
        assert_eq!(back.params, event.params);
        assert_eq!(back.timestamp_ms, 42);
    }
}
