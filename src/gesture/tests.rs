use super::dispatcher::{DispatchCtx, GestureDispatcher, GroupControl, Gui};
use super::event::{DispatchError, GestureEvent, GestureKind};
use crate::annotation::{AnnotationId, AnnotationStore, RedrawSignal, SharedAnnotationStore};
use crate::camera::CameraTransform;
use crate::config::Config;
use crate::flags::ModeFlags;
use crate::notify::{NotificationEvent, RecordingSink};
use std::sync::{Arc, Mutex};

/// GUI double that records every call crossing the boundary.
#[derive(Debug, Default)]
struct RecordingGui {
    consume_clicks: bool,
    annotation_hit: Option<AnnotationId>,
    controls: Vec<GroupControl>,
    created: Vec<(AnnotationId, f64, f64)>,
    virtual_updates: usize,
    real_tools: Vec<(AnnotationId, f64)>,
}

impl Gui for RecordingGui {
    fn click_consumed(&mut self, _x: f64, _y: f64) -> bool {
        self.consume_clicks
    }
    fn annotation_at(&mut self, _x: f64, _y: f64) -> Option<AnnotationId> {
        self.annotation_hit
    }
    fn create_virtual_annotation(&mut self, id: AnnotationId, x: f64, y: f64) {
        self.created.push((id, x, y));
    }
    fn transform_control(&mut self, control: GroupControl) {
        self.controls.push(control);
    }
    fn push_virtual_updates(&mut self) {
        self.virtual_updates += 1;
    }
    fn place_real_tool(&mut self, id: AnnotationId, length_px: f64, _anchor: (f64, f64)) {
        self.real_tools.push((id, length_px));
    }
}

struct Fixture {
    dispatcher: GestureDispatcher,
    store: SharedAnnotationStore,
    camera: CameraTransform,
    flags: ModeFlags,
    gui: RecordingGui,
    redraw: RedrawSignal,
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let sink = RecordingSink::new();
        let events = sink.events();
        Self {
            dispatcher: GestureDispatcher::new(
                config.gesture.clone(),
                config.resolution.clone(),
                config.calibration.clone(),
            ),
            store: SharedAnnotationStore::new(AnnotationStore::new(Box::new(sink))),
            camera: CameraTransform::new(config.camera.clone(), &config.resolution),
            flags: ModeFlags::new(),
            gui: RecordingGui::default(),
            redraw: RedrawSignal::new(),
            events,
        }
    }

    fn dispatch(&mut self, kind: GestureKind, params: Vec<f64>) -> Result<(), DispatchError> {
        let event = GestureEvent::new(kind, params);
        let mut ctx = DispatchCtx {
            store: &self.store,
            camera: &mut self.camera,
            flags: &mut self.flags,
            gui: &mut self.gui,
            redraw: &self.redraw,
        };
        self.dispatcher.dispatch(&event, &mut ctx)
    }

    fn must(&mut self, kind: GestureKind, params: Vec<f64>) {
        self.dispatch(kind, params).expect("gesture accepted");
    }

    fn recorded(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[test]
fn draw_sequence_commits_one_stroke() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;

    fx.must(GestureKind::TouchStart, vec![]);
    fx.must(GestureKind::Down, vec![100.0, 100.0]);
    fx.must(GestureKind::Move, vec![110.0, 100.0]);
    fx.must(GestureKind::Move, vec![120.0, 110.0]);
    fx.must(GestureKind::TouchEnd, vec![]);

    fx.store.with(|store| {
        assert_eq!(store.len(), 1);
        let line = store.get(0).expect("stroke committed under id 0");
        assert_eq!(line.point_count(), 3);
        assert_eq!(line.points()[0..2], [100.0, 100.0]);
    });

    assert_eq!(
        fx.recorded(),
        vec![NotificationEvent::Create {
            id: 0,
            points: vec![100.0, 100.0, 110.0, 100.0, 120.0, 110.0],
        }]
    );
    assert_eq!(fx.dispatcher.annotation_counter(), 1);
    assert!(!fx.flags.line_drawn);
    assert!(fx.redraw.take());
}

#[test]
fn tap_without_motion_is_discarded() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;

    fx.must(GestureKind::TouchStart, vec![]);
    fx.must(GestureKind::Down, vec![100.0, 100.0]);
    fx.must(GestureKind::TouchEnd, vec![]);

    fx.store.with(|store| assert!(store.is_empty()));
    assert!(fx.recorded().is_empty());
    assert_eq!(fx.dispatcher.annotation_counter(), 0);
}

#[test]
fn mid_draw_stroke_is_visible_to_render_actor() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;

    fx.must(GestureKind::Down, vec![10.0, 10.0]);
    fx.must(GestureKind::Move, vec![20.0, 10.0]);

    let mut seen = 0;
    fx.store.for_each_visible(|id, points, _| {
        assert_eq!(id, 0);
        assert_eq!(points.len(), 4);
        seen += 1;
    });
    assert_eq!(seen, 1);
}

#[test]
fn roi_capture_selects_enclosed_annotations() {
    let mut fx = Fixture::new();

    // Two committed annotations with centers (10,10) and (100,100).
    fx.flags.lines_drawable = true;
    fx.must(GestureKind::Down, vec![10.0, 10.0]);
    fx.must(GestureKind::Move, vec![10.0, 10.0]);
    fx.must(GestureKind::TouchEnd, vec![]);
    fx.must(GestureKind::Down, vec![100.0, 100.0]);
    fx.must(GestureKind::Move, vec![100.0, 100.0]);
    fx.must(GestureKind::TouchEnd, vec![]);
    fx.flags.lines_drawable = false;

    // Lasso around the first one.
    fx.must(GestureKind::TouchStart, vec![]);
    fx.must(GestureKind::Click, vec![0.0, 0.0]);
    fx.must(GestureKind::MoveRight, vec![0.0, 0.0]);
    fx.must(GestureKind::MoveRight, vec![40.0, 0.0]);
    fx.must(GestureKind::MoveDown, vec![40.0, 40.0]);
    fx.must(GestureKind::MoveLeft, vec![0.0, 40.0]);
    fx.must(GestureKind::TouchEnd, vec![]);

    assert!(fx.flags.line_selected);
    assert!(!fx.flags.roi_drawn);
    fx.store.with(|store| {
        assert_eq!(store.selected_ids(), &[0]);
        assert!(store.get(0).unwrap().is_selected());
        assert!(!store.get(1).unwrap().is_selected());
    });
}

#[test]
fn transform_gestures_move_selected_lines_and_push_updates() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;
    fx.must(GestureKind::Down, vec![10.0, 10.0]);
    fx.must(GestureKind::Move, vec![20.0, 20.0]);
    fx.must(GestureKind::TouchEnd, vec![]);
    fx.flags.lines_drawable = false;

    fx.store.with(|store| {
        let polygon = [0.0, 0.0, 40.0, 0.0, 40.0, 40.0, 0.0, 40.0, 0.0, 0.0];
        assert!(store.select_in_polygon(&polygon));
    });
    fx.flags.line_selected = true;
    fx.events.lock().unwrap().clear();

    // Zoom in about the selection centroid (15,15).
    fx.must(GestureKind::SplitApart, vec![0.0]);
    fx.store.with(|store| {
        let points = store.get(0).unwrap().points().to_vec();
        assert!((points[0] - 9.0).abs() < 1e-9);
        assert!((points[1] - 9.0).abs() < 1e-9);
        assert!((points[2] - 21.0).abs() < 1e-9);
        assert!((points[3] - 21.0).abs() < 1e-9);
    });

    // Lifting the fingers pushes exactly one update per selected line.
    fx.must(GestureKind::TouchEnd, vec![]);
    let events = fx.recorded();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], NotificationEvent::Update { id: 0, .. }));
}

#[test]
fn transform_routing_prefers_virtual_selection() {
    let mut fx = Fixture::new();
    fx.flags.virtual_annotation_selected = true;
    fx.flags.line_selected = true;

    fx.must(GestureKind::RotateClockwise, vec![]);
    fx.must(GestureKind::SplitClose, vec![0.0]);
    fx.must(GestureKind::NearParallelMoveLeft, vec![]);

    assert_eq!(
        fx.gui.controls,
        vec![
            GroupControl::RotateClockwise,
            GroupControl::ZoomOut,
            GroupControl::TranslateLeft,
        ]
    );

    // The virtual path also owns the update pass at touch end.
    fx.must(GestureKind::TouchEnd, vec![]);
    assert_eq!(fx.gui.virtual_updates, 1);
    assert!(fx.recorded().is_empty());
}

#[test]
fn point_mode_stamps_a_closed_ring() {
    let mut fx = Fixture::new();
    fx.flags.points_drawable = true;

    fx.must(GestureKind::Down, vec![200.0, 200.0]);
    fx.must(GestureKind::Click, vec![200.0, 200.0]);

    fx.store.with(|store| {
        let line = store.get(0).expect("stamped annotation");
        // 0..=360 degrees in 18-degree steps: 21 vertices, first == last.
        assert_eq!(line.point_count(), 21);
        let points = line.points();
        assert!((points[0] - points[40]).abs() < 1e-9);
        assert!((points[1] - points[41]).abs() < 1e-9);
        // Every vertex sits on the offset ring around the tap.
        let radius = (2.0f64).sqrt() * 5.0;
        for pair in points.chunks_exact(2) {
            let distance = (pair[0] - 200.0).hypot(pair[1] - 200.0);
            assert!((distance - radius).abs() < 1e-9);
        }
    });

    let events = fx.recorded();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], NotificationEvent::Create { id: 0, .. }));
    assert_eq!(fx.dispatcher.annotation_counter(), 1);
}

#[test]
fn pending_virtual_creation_claims_the_click() {
    let mut fx = Fixture::new();
    fx.flags.virtual_annotation_creating = true;

    fx.must(GestureKind::Click, vec![300.0, 400.0]);

    assert_eq!(fx.gui.created, vec![(0, 300.0, 400.0)]);
    assert!(!fx.flags.virtual_annotation_creating);
    assert_eq!(fx.dispatcher.annotation_counter(), 1);
}

#[test]
fn click_on_widget_suppresses_annotation_handling() {
    let mut fx = Fixture::new();
    fx.flags.points_drawable = true;
    fx.gui.consume_clicks = true;

    fx.must(GestureKind::Down, vec![50.0, 50.0]);
    fx.must(GestureKind::Click, vec![50.0, 50.0]);

    fx.store.with(|store| assert!(store.is_empty()));
    assert_eq!(fx.dispatcher.annotation_counter(), 0);
}

#[test]
fn click_miss_in_edit_mode_opens_roi_and_clears_virtual_selection() {
    let mut fx = Fixture::new();
    fx.flags.virtual_annotation_selected = true;

    fx.must(GestureKind::Click, vec![10.0, 10.0]);
    assert!(!fx.flags.virtual_annotation_selected);
    assert!(fx.flags.roi_drawn);

    // A hit keeps the virtual annotation selected instead.
    fx.gui.annotation_hit = Some(42);
    fx.must(GestureKind::Click, vec![10.0, 10.0]);
    assert!(fx.flags.virtual_annotation_selected);
}

#[test]
fn real_tool_sampling_reports_trimmed_mean() {
    let mut fx = Fixture::new();

    // Contacts 30/40 apart: distance 50.
    fx.must(
        GestureKind::MultiDown,
        vec![0.0, 0.0, 0.0, 0.0, 30.0, 40.0],
    );
    assert!(fx.flags.real_tool_placed);
    // Contacts 54/72 apart: distance 90 (the outlier band winner).
    fx.must(
        GestureKind::MultiMove,
        vec![0.0, 0.0, 0.0, 0.0, 54.0, 72.0],
    );
    // Near-identical contacts are ignored below the separation threshold.
    fx.must(GestureKind::MultiMove, vec![0.0, 0.0, 0.0, 0.0, 5.0, 5.0]);

    fx.must(GestureKind::TouchEnd, vec![]);

    assert_eq!(fx.gui.real_tools, vec![(0, 90.0)]);
    assert!(!fx.flags.real_tool_placed);
    assert_eq!(fx.dispatcher.annotation_counter(), 1);
}

#[test]
fn real_tool_suppresses_drawing_and_transforms() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;
    fx.flags.line_selected = true;
    fx.flags.real_tool_placed = true;

    fx.must(GestureKind::Move, vec![10.0, 10.0]);
    fx.must(GestureKind::RotateClockwise, vec![]);

    fx.store.with(|store| assert!(store.is_empty()));
    assert!(fx.gui.controls.is_empty());
}

#[test]
fn malformed_event_is_rejected_without_side_effects() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;

    let err = fx.dispatch(GestureKind::Down, vec![100.0]).unwrap_err();
    assert!(matches!(err, DispatchError::MalformedGesture { .. }));

    fx.store.with(|store| assert!(store.is_empty()));
    assert_eq!(fx.dispatcher.annotation_counter(), 0);
    assert_eq!(fx.dispatcher.last_kind(), None);

    // The loop keeps going: the next well-formed event lands normally.
    fx.must(GestureKind::Down, vec![100.0, 100.0]);
    fx.store.with(|store| assert_eq!(store.len(), 1));
}

#[test]
fn sensor_coordinates_are_rescaled_to_logical_space() {
    let mut config = Config::default();
    config.resolution.sensor_width = 3840.0;
    config.resolution.sensor_height = 2160.0;
    let mut fx = Fixture::with_config(config);
    fx.flags.lines_drawable = true;

    fx.must(GestureKind::Down, vec![200.0, 200.0]);

    fx.store.with(|store| {
        assert_eq!(store.get(0).unwrap().points(), &[100.0, 100.0]);
    });
}

#[test]
fn erase_selected_scenario_emits_single_delete() {
    let mut fx = Fixture::new();
    fx.flags.lines_drawable = true;
    fx.must(GestureKind::Down, vec![10.0, 10.0]);
    fx.must(GestureKind::Move, vec![20.0, 10.0]);
    fx.must(GestureKind::Move, vec![20.0, 20.0]);
    fx.must(GestureKind::TouchEnd, vec![]);
    fx.flags.lines_drawable = false;
    fx.events.lock().unwrap().clear();

    fx.store.with(|store| {
        let polygon = [0.0, 0.0, 40.0, 0.0, 40.0, 40.0, 0.0, 40.0, 0.0, 0.0];
        assert!(store.select_in_polygon(&polygon));
    });
    let flags = fx.flags.clone();
    fx.store.with(|store| store.erase_selected(&flags));

    fx.store.with(|store| assert!(store.is_empty()));
    assert_eq!(fx.recorded(), vec![NotificationEvent::Delete { id: 0 }]);
}
