//! Table-driven gesture dispatch.
//!
//! Routes low-level touch gestures into high-level editing operations. Each
//! gesture kind resolves to a handler through an enum-keyed table built once
//! at construction; handlers read and write the shared mode flags and
//! forward resolved world-space coordinates to the annotation store, the
//! camera, or the external GUI collaborator.

use super::calibration::RealToolCalibration;
use super::event::{DispatchError, GestureEvent, GestureKind};
use crate::annotation::{AnnotationId, RedrawSignal, SharedAnnotationStore};
use crate::camera::CameraTransform;
use crate::config::{CalibrationConfig, GestureConfig, ResolutionConfig};
use crate::flags::ModeFlags;
use crate::geometry;
use std::collections::HashMap;

/// Group-transform controls forwarded to whichever subsystem owns the
/// current selection (line annotations or the GUI's virtual annotations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupControl {
    RotateClockwise,
    RotateCounterclockwise,
    ZoomIn,
    ZoomOut,
    TranslateLeft,
    TranslateRight,
    TranslateUp,
    TranslateDown,
}

/// External GUI surface invoked during gesture handling.
///
/// Widget hit-testing and virtual-annotation bookkeeping live outside this
/// core; the dispatcher only calls across the boundary.
pub trait Gui {
    /// Reports whether the press at the given world point hit a GUI widget.
    /// A consumed press suppresses annotation handling for the tap.
    fn click_consumed(&mut self, x: f64, y: f64) -> bool;

    /// Hit-test for a virtual annotation under the given world point.
    fn annotation_at(&mut self, x: f64, y: f64) -> Option<AnnotationId>;

    /// Places a new virtual annotation at the given world point.
    fn create_virtual_annotation(&mut self, id: AnnotationId, x: f64, y: f64);

    /// Applies a group transform to the selected virtual annotations.
    fn transform_control(&mut self, control: GroupControl);

    /// Pushes update notifications for the selected virtual annotations.
    fn push_virtual_updates(&mut self);

    /// Delivers a finished real-tool calibration sample.
    ///
    /// `length_px` is the trimmed-mean contact distance in sensor pixels;
    /// `anchor` is the raw position of the second contact.
    fn place_real_tool(&mut self, id: AnnotationId, length_px: f64, anchor: (f64, f64));
}

/// GUI stand-in that consumes nothing and tracks nothing.
///
/// Backs tests and the trace replay binary.
#[derive(Debug, Default)]
pub struct NullGui;

impl Gui for NullGui {
    fn click_consumed(&mut self, _x: f64, _y: f64) -> bool {
        false
    }
    fn annotation_at(&mut self, _x: f64, _y: f64) -> Option<AnnotationId> {
        None
    }
    fn create_virtual_annotation(&mut self, _id: AnnotationId, _x: f64, _y: f64) {}
    fn transform_control(&mut self, _control: GroupControl) {}
    fn push_virtual_updates(&mut self) {}
    fn place_real_tool(&mut self, _id: AnnotationId, _length_px: f64, _anchor: (f64, f64)) {}
}

/// Collaborators a dispatch call operates on.
///
/// Handlers receive every dependency through this context instead of
/// ambient state, so tests can assemble isolated fixtures.
pub struct DispatchCtx<'a> {
    /// Shared annotation store (locked per operation)
    pub store: &'a SharedAnnotationStore,
    /// Virtual camera (input-actor owned)
    pub camera: &'a mut CameraTransform,
    /// Mode flags owned by the embedding layer
    pub flags: &'a mut ModeFlags,
    /// External GUI collaborator
    pub gui: &'a mut dyn Gui,
    /// Fire-and-forget redraw request
    pub redraw: &'a RedrawSignal,
}

type Handler = fn(&mut GestureDispatcher, &mut DispatchCtx, &GestureEvent);

/// Maps gesture events to editing operations.
///
/// Owns the monotonic annotation id counter, the in-progress
/// region-of-interest polygon, and the real-tool calibration accumulator.
/// Mode flags are consulted, not owned.
pub struct GestureDispatcher {
    handlers: HashMap<GestureKind, Handler>,
    annotation_counter: AnnotationId,
    last_kind: Option<GestureKind>,
    button_clicked: bool,
    roi: Vec<f64>,
    calibration: RealToolCalibration,
    config: GestureConfig,
    resolution: ResolutionConfig,
}

impl GestureDispatcher {
    /// Builds a dispatcher with its full handler table.
    pub fn new(
        config: GestureConfig,
        resolution: ResolutionConfig,
        calibration: CalibrationConfig,
    ) -> Self {
        let mut handlers: HashMap<GestureKind, Handler> = HashMap::new();
        handlers.insert(GestureKind::TouchStart, Self::on_touch_start as Handler);
        handlers.insert(GestureKind::Down, Self::on_down);
        handlers.insert(GestureKind::Move, Self::on_move);
        handlers.insert(GestureKind::Click, Self::on_click);
        handlers.insert(GestureKind::MoveRight, Self::on_directional_move);
        handlers.insert(GestureKind::MoveLeft, Self::on_directional_move);
        handlers.insert(GestureKind::MoveDown, Self::on_directional_move);
        handlers.insert(GestureKind::MoveUp, Self::on_directional_move);
        handlers.insert(GestureKind::TouchEnd, Self::on_touch_end);
        handlers.insert(GestureKind::RotateClockwise, Self::on_transform);
        handlers.insert(GestureKind::RotateAnticlockwise, Self::on_transform);
        handlers.insert(GestureKind::SplitApart, Self::on_transform);
        handlers.insert(GestureKind::SplitClose, Self::on_transform);
        handlers.insert(GestureKind::NearParallelMoveUp, Self::on_transform);
        handlers.insert(GestureKind::NearParallelMoveDown, Self::on_transform);
        handlers.insert(GestureKind::NearParallelMoveRight, Self::on_transform);
        handlers.insert(GestureKind::NearParallelMoveLeft, Self::on_transform);
        handlers.insert(GestureKind::MultiDown, Self::on_multi_contact);
        handlers.insert(GestureKind::MultiMove, Self::on_multi_contact);

        Self {
            handlers,
            annotation_counter: 0,
            last_kind: None,
            button_clicked: false,
            roi: Vec::new(),
            calibration: RealToolCalibration::new(calibration),
            config,
            resolution,
        }
    }

    /// Next id the dispatcher will assign.
    pub fn annotation_counter(&self) -> AnnotationId {
        self.annotation_counter
    }

    /// Kind of the last handled gesture, if any.
    pub fn last_kind(&self) -> Option<GestureKind> {
        self.last_kind
    }

    /// Dispatches one gesture event.
    ///
    /// The event's parameter arity is validated first; a malformed event is
    /// rejected without touching any state. Callers log the error and keep
    /// processing subsequent events.
    pub fn dispatch(
        &mut self,
        event: &GestureEvent,
        ctx: &mut DispatchCtx,
    ) -> Result<(), DispatchError> {
        event.validate()?;

        let handler = self.handlers.get(&event.kind).copied();
        if let Some(handler) = handler {
            handler(self, ctx, event);
        }

        // Draw motion does not participate in the touch-end update rule, so
        // it leaves the last handled kind untouched.
        if event.kind != GestureKind::Move {
            self.last_kind = Some(event.kind);
        }

        Ok(())
    }

    /// Rescales raw sensor coordinates to logical space, then maps them to
    /// world space through the camera.
    fn resolve_world(&self, ctx: &DispatchCtx, x: f64, y: f64) -> (f64, f64) {
        let sx = x * self.resolution.logical_width / self.resolution.sensor_width;
        let sy = y * self.resolution.logical_height / self.resolution.sensor_height;
        ctx.camera.screen_to_world(sx, sy)
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn on_touch_start(&mut self, ctx: &mut DispatchCtx, _event: &GestureEvent) {
        // Outside draw mode, a new touch sequence invalidates any stale
        // selection polygon.
        if !ctx.flags.lines_drawable {
            self.roi.clear();
        }
    }

    fn on_down(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        let (wx, wy) = self.resolve_world(ctx, event.params[0], event.params[1]);

        self.button_clicked = ctx.gui.click_consumed(wx, wy);

        if ctx.flags.lines_drawable {
            let id = self.annotation_counter;
            ctx.store
                .with(|store| store.begin_or_continue_stroke(id, wx, wy));
            ctx.redraw.request();
        }
    }

    fn on_move(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        if ctx.flags.real_tool_placed {
            return;
        }

        let (wx, wy) = self.resolve_world(ctx, event.params[0], event.params[1]);

        if ctx.flags.lines_drawable {
            ctx.flags.line_drawn = true;
            let id = self.annotation_counter;
            ctx.store
                .with(|store| store.begin_or_continue_stroke(id, wx, wy));
            ctx.redraw.request();
        }
    }

    fn on_directional_move(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        if ctx.flags.real_tool_placed {
            return;
        }

        let (wx, wy) = self.resolve_world(ctx, event.params[0], event.params[1]);

        if !ctx.flags.lines_drawable {
            ctx.flags.roi_drawn = true;
            self.roi.push(wx);
            self.roi.push(wy);
        }
    }

    fn on_click(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        let (wx, wy) = self.resolve_world(ctx, event.params[0], event.params[1]);

        if self.button_clicked {
            return;
        }

        if ctx.flags.virtual_annotation_creating {
            let id = self.annotation_counter;
            ctx.gui.create_virtual_annotation(id, wx, wy);
            ctx.flags.virtual_annotation_creating = false;
            self.annotation_counter += 1;
            return;
        }

        if !ctx.flags.lines_drawable && !ctx.flags.points_drawable {
            // Editing mode: a tap either picks a virtual annotation or opens
            // a region-of-interest capture.
            match ctx.gui.annotation_at(wx, wy) {
                Some(id) => {
                    log::debug!("Virtual annotation {id} picked");
                    ctx.flags.virtual_annotation_selected = true;
                }
                None => {
                    ctx.flags.virtual_annotation_selected = false;
                    ctx.flags.roi_drawn = true;
                }
            }
        } else if ctx.flags.points_drawable {
            let id = self.annotation_counter;
            ctx.store.with(|store| {
                store.discard_stroke_if_degenerate(id);
            });
            self.stamp_point_annotation(ctx, wx, wy);
            self.annotation_counter += 1;
            ctx.redraw.request();
        }
    }

    fn on_touch_end(&mut self, ctx: &mut DispatchCtx, _event: &GestureEvent) {
        if !ctx.flags.real_tool_placed {
            // A finished transform run pushes the final geometry downstream
            // exactly once.
            if self.last_kind.is_some_and(GestureKind::is_transform) {
                if ctx.flags.virtual_annotation_selected {
                    ctx.gui.push_virtual_updates();
                } else if ctx.flags.line_selected {
                    ctx.store.with(|store| store.notify_selected_updates());
                }
            }

            if ctx.flags.lines_drawable {
                if ctx.flags.line_drawn {
                    let id = self.annotation_counter;
                    ctx.store.with(|store| store.commit_stroke(id));
                    ctx.flags.line_drawn = false;
                    self.annotation_counter += 1;
                }
                let id = self.annotation_counter;
                ctx.store
                    .with(|store| store.discard_stroke_if_degenerate(id));
            } else if ctx.flags.roi_drawn {
                self.finish_roi_selection(ctx);
            }
        } else {
            if let Some(mean) = self.calibration.take_trimmed_mean() {
                let cm = self.calibration.to_centimeters(mean, &self.resolution);
                log::debug!("Real tool measured at {mean:.1} px ({cm:.2} cm)");
                let id = self.annotation_counter;
                ctx.gui.place_real_tool(id, mean, self.calibration.anchor());
                self.annotation_counter += 1;
            }
            ctx.flags.real_tool_placed = false;
        }
    }

    fn on_transform(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        if ctx.flags.real_tool_placed {
            return;
        }

        let control = match event.kind {
            GestureKind::RotateClockwise => GroupControl::RotateClockwise,
            GestureKind::RotateAnticlockwise => GroupControl::RotateCounterclockwise,
            GestureKind::SplitApart => GroupControl::ZoomIn,
            GestureKind::SplitClose => GroupControl::ZoomOut,
            GestureKind::NearParallelMoveUp => GroupControl::TranslateUp,
            GestureKind::NearParallelMoveDown => GroupControl::TranslateDown,
            GestureKind::NearParallelMoveRight => GroupControl::TranslateRight,
            GestureKind::NearParallelMoveLeft => GroupControl::TranslateLeft,
            _ => return,
        };

        // Virtual-annotation selection and line selection route exclusively;
        // never both.
        if ctx.flags.virtual_annotation_selected {
            ctx.gui.transform_control(control);
        } else if ctx.flags.line_selected {
            self.apply_group_control(ctx, control);
            ctx.redraw.request();
        }
    }

    fn on_multi_contact(&mut self, ctx: &mut DispatchCtx, event: &GestureEvent) {
        let first = (event.params[2], event.params[3]);
        let second = (event.params[4], event.params[5]);

        let dx = (first.0 - second.0).abs();
        let dy = (first.1 - second.1).abs();

        if dx > self.config.min_contact_separation && dy > self.config.min_contact_separation {
            let distance = dx.hypot(dy);
            self.calibration.record_sample(distance);
            self.calibration.set_anchor(second.0, second.1);
            ctx.flags.real_tool_placed = true;
        }
    }

    // ------------------------------------------------------------------
    // Handler helpers
    // ------------------------------------------------------------------

    /// Applies one group transform to the selected line annotations.
    fn apply_group_control(&mut self, ctx: &mut DispatchCtx, control: GroupControl) {
        let pan_x = self.resolution.logical_width / self.config.pan_divisor;
        let pan_y = self.resolution.logical_height / self.config.pan_divisor;

        ctx.store.with(|store| match control {
            GroupControl::RotateClockwise => {
                store.group_rotate(-self.config.group_rotate_step_degrees)
            }
            GroupControl::RotateCounterclockwise => {
                store.group_rotate(self.config.group_rotate_step_degrees)
            }
            GroupControl::ZoomIn => store.group_zoom(self.config.group_zoom_in_factor),
            GroupControl::ZoomOut => store.group_zoom(self.config.group_zoom_out_factor),
            GroupControl::TranslateRight => store.group_translate(pan_x, 0.0),
            GroupControl::TranslateLeft => store.group_translate(-pan_x, 0.0),
            GroupControl::TranslateUp => store.group_translate(0.0, -pan_y),
            GroupControl::TranslateDown => store.group_translate(0.0, pan_y),
        });
    }

    /// Stamps a round point annotation: a closed 20-gon traced by rotating
    /// the offset tap position a full turn in 18-degree steps.
    fn stamp_point_annotation(&mut self, ctx: &mut DispatchCtx, x: f64, y: f64) {
        let id = self.annotation_counter;
        let radius = self.config.point_stamp_radius;

        ctx.store.with(|store| {
            let mut degrees = 0u32;
            while degrees <= 360 {
                let angle = f64::from(degrees).to_radians();
                let (px, py) = geometry::rotate_point(x, y, radius, radius, angle, x, y);
                store.begin_or_continue_stroke(id, px, py);
                degrees += 18;
            }
            store.commit_stroke(id);
        });
    }

    /// Closes the captured polygon and runs the selection pass.
    fn finish_roi_selection(&mut self, ctx: &mut DispatchCtx) {
        if self.roi.len() >= 2 {
            self.roi.push(self.roi[0]);
            self.roi.push(self.roi[1]);
        }

        let roi = std::mem::take(&mut self.roi);
        let any = ctx.store.with(|store| store.select_in_polygon(&roi));

        ctx.flags.line_selected = any;
        ctx.flags.roi_drawn = false;
        if any {
            ctx.redraw.request();
        }
    }
}
