use frames::{ClientMessage, Entity, EntityId, Update};
use tracing::debug;

use crate::camera::{Camera, Point};
use crate::consts::LOCAL_Z_PLACEHOLDER;
use crate::input::{GestureError, GestureState, UiState, pointer_angle, swept_rotation};
use crate::outbound::{DragRelease, clamp_to_world, classify_drag, mutation};
use crate::reconcile::EntityReconciler;
use crate::transition::TransitionToken;
use crate::window::SpatialWindow;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine calls for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A magnet appeared. Render it at the given state without animation.
    EntityCreated(Entity),
    /// A magnet changed. `animated` asks the renderer to slide to the new state.
    EntityUpdated { entity: Entity, animated: bool },
    /// A magnet is gone.
    EntityRemoved(EntityId),
    /// The subscription window was replaced.
    WindowChanged(SpatialWindow),
    /// The view changed; (re)arm the debounce that ends in `recompute_window`.
    WindowDirty,
    /// Arm a transition timer; call `expire_transition` with this token when it fires.
    TransitionArmed(TransitionToken),
    /// A slide finished.
    TransitionSettled(EntityId),
    /// The rotation handle moved to another magnet, or was hidden.
    SelectionChanged(Option<EntityId>),
    /// Send this message over the connection, best-effort.
    Send(ClientMessage),
}

/// Core engine state: view, window, reconciler, and gesture machine.
///
/// Free of I/O and timers, so the host decides how actions are executed.
pub struct EngineCore {
    reconciler: EntityReconciler,
    camera: Camera,
    window: SpatialWindow,
    gesture: GestureState,
    ui: UiState,
    /// Zoom the current window was computed at.
    window_scale: Option<f64>,
    /// Zoom of the last subscription the server is known to have received.
    delivered_scale: Option<f64>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_reconciler(EntityReconciler::new())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with reproducible edge sampling.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_reconciler(EntityReconciler::with_seed(seed))
    }

    fn with_reconciler(reconciler: EntityReconciler) -> Self {
        Self {
            reconciler,
            camera: Camera::default(),
            window: SpatialWindow::default(),
            gesture: GestureState::Idle,
            ui: UiState::default(),
            window_scale: None,
            delivered_scale: None,
        }
    }

    // --- Data inputs ---

    /// Apply one decoded server update against the current window.
    pub fn apply_update(&mut self, update: Update) -> Vec<Action> {
        let mut actions = self.reconciler.apply(update, &self.window);
        self.after_reconcile(&mut actions);
        actions
    }

    /// Handle a fired transition timer.
    pub fn expire_transition(&mut self, token: TransitionToken) -> Vec<Action> {
        let mut actions = self.reconciler.expire(token);
        self.after_reconcile(&mut actions);
        actions
    }

    fn after_reconcile(&mut self, actions: &mut Vec<Action>) {
        if let Some(id) = self.ui.selected {
            if actions.contains(&Action::EntityRemoved(id)) || self.reconciler.is_leaving(id) {
                self.ui.selected = None;
                actions.push(Action::SelectionChanged(None));
            }
        }
        if let Some(id) = self.gesture.entity() {
            if self.reconciler.get(id).is_none() || self.reconciler.is_leaving(id) {
                debug!(id, gesture = self.gesture.name(), "gesture target removed remotely");
                self.gesture = GestureState::Idle;
                actions.extend(self.reconciler.release(&self.window));
            }
        }
    }

    // --- View ---

    /// Set viewport size and zoom without touching the window.
    ///
    /// For seeding the view before the first [`set_center`](Self::set_center),
    /// which recomputes the window anyway. An invalid scale keeps the current one.
    pub fn set_view(&mut self, width: f64, height: f64, scale: f64) {
        self.camera.viewport_w = width.max(0.0);
        self.camera.viewport_h = height.max(0.0);
        if scale.is_finite() && scale > 0.0 {
            self.camera.scale = scale;
        } else {
            debug!(scale, "ignoring invalid scale");
        }
    }

    /// Resize the viewport (CSS pixels).
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.camera.viewport_w = width.max(0.0);
        self.camera.viewport_h = height.max(0.0);
        vec![Action::WindowDirty]
    }

    /// Change the zoom. Non-finite or non-positive scales are ignored.
    pub fn set_scale(&mut self, scale: f64) -> Vec<Action> {
        if !scale.is_finite() || scale <= 0.0 {
            debug!(scale, "ignoring invalid scale");
            return Vec::new();
        }
        self.camera.scale = scale;
        vec![Action::WindowDirty]
    }

    /// Jump the view to a deep-link anchor. Recomputes the window immediately.
    pub fn set_center(&mut self, x: f64, y: f64) -> Vec<Action> {
        self.camera.center_x = x;
        self.camera.center_y = y;
        self.recompute_window()
    }

    /// Replace the window from the current view and subscribe to it.
    ///
    /// The subscription is flagged as a rescale while the window's zoom differs
    /// from the last delivered subscription's.
    pub fn recompute_window(&mut self) -> Vec<Action> {
        self.window = self.camera.window();
        self.window_scale = Some(self.camera.scale);
        vec![Action::WindowChanged(self.window), Action::Send(self.subscription())]
    }

    /// The current subscription, for re-issuing after a reconnect.
    #[must_use]
    pub fn subscription(&self) -> ClientMessage {
        ClientMessage::Subscribe(self.window.to_subscription(self.pending_rescale()))
    }

    /// Record that the current subscription reached the server.
    pub fn subscription_delivered(&mut self) {
        self.delivered_scale = self.window_scale;
    }

    /// Whether the server has yet to see the current window's zoom.
    #[must_use]
    pub fn pending_rescale(&self) -> bool {
        self.delivered_scale.is_some() && self.delivered_scale != self.window_scale
    }

    // --- Panning ---

    /// Start dragging the background. Refused while another gesture is active.
    pub fn begin_pan(&mut self, screen: Point) -> Result<Vec<Action>, GestureError> {
        if !self.gesture.is_idle() {
            return Err(self.gesture.busy("pan"));
        }
        self.gesture = GestureState::PanningViewport { last_screen: screen };
        Ok(Vec::new())
    }

    pub fn pan_to(&mut self, screen: Point) -> Result<Vec<Action>, GestureError> {
        let GestureState::PanningViewport { last_screen } = self.gesture else {
            return Err(GestureError::NotActive("pan"));
        };
        self.camera.pan_by_screen(screen.x - last_screen.x, screen.y - last_screen.y);
        self.gesture = GestureState::PanningViewport { last_screen: screen };
        Ok(vec![Action::WindowDirty])
    }

    pub fn end_pan(&mut self) -> Result<Vec<Action>, GestureError> {
        if !matches!(self.gesture, GestureState::PanningViewport { .. }) {
            return Err(GestureError::NotActive("pan"));
        }
        self.gesture = GestureState::Idle;
        Ok(Vec::new())
    }

    // --- Dragging ---

    /// Grab a magnet. Cancels any remote slide in flight for it and raises it
    /// above everything else for the duration of the drag.
    pub fn begin_drag(&mut self, id: EntityId, screen: Point) -> Result<Vec<Action>, GestureError> {
        if !self.gesture.is_idle() {
            return Err(self.gesture.busy("drag"));
        }
        let Some(entity) = self.reconciler.get(id).cloned() else {
            return Err(GestureError::UnknownEntity(id));
        };
        if !self.reconciler.hold(id) {
            return Err(GestureError::UnknownEntity(id));
        }

        let origin = Point::new(f64::from(entity.x), f64::from(entity.y));
        let pointer = self.camera.screen_to_world(screen);
        self.gesture = GestureState::DraggingEntity {
            id,
            origin,
            grab_offset: Point::new(pointer.x - origin.x, pointer.y - origin.y),
            current: None,
        };
        Ok(vec![Action::EntityUpdated { entity: Entity { z_index: LOCAL_Z_PLACEHOLDER, ..entity }, animated: false }])
    }

    pub fn drag_to(&mut self, screen: Point) -> Result<Vec<Action>, GestureError> {
        let GestureState::DraggingEntity { id, origin, grab_offset, .. } = self.gesture else {
            return Err(GestureError::NotActive("drag"));
        };
        let pointer = self.camera.screen_to_world(screen);
        let position = clamp_to_world(Point::new(pointer.x - grab_offset.x, pointer.y - grab_offset.y));
        self.gesture = GestureState::DraggingEntity { id, origin, grab_offset, current: Some(position) };

        let mut actions = self.clear_selection();
        if let Some(entity) = self.reconciler.get(id) {
            actions.push(Action::EntityUpdated {
                entity: Entity {
                    x: round_px(position.x),
                    y: round_px(position.y),
                    z_index: LOCAL_Z_PLACEHOLDER,
                    ..entity.clone()
                },
                animated: false,
            });
        }
        Ok(actions)
    }

    /// Drop the magnet. A tap toggles the rotation handle; a real drag is
    /// committed locally and sent to the server.
    pub fn end_drag(&mut self) -> Result<Vec<Action>, GestureError> {
        let GestureState::DraggingEntity { id, origin, current, .. } = self.gesture else {
            return Err(GestureError::NotActive("drag"));
        };
        self.gesture = GestureState::Idle;

        match classify_drag(origin, current) {
            DragRelease::Tap => {
                let mut evicted = self.reconciler.release(&self.window);
                if !evicted.is_empty() {
                    debug!(id, "tapped magnet was moved out of the window");
                    self.after_reconcile(&mut evicted);
                    return Ok(evicted);
                }
                let mut actions = Vec::new();
                if let Some(entity) = self.reconciler.get(id) {
                    actions.push(Action::EntityUpdated { entity: entity.clone(), animated: false });
                }
                let selected = if self.ui.selected.is_none() { Some(id) } else { None };
                self.ui.selected = selected;
                actions.push(Action::SelectionChanged(selected));
                Ok(actions)
            }
            DragRelease::Moved { x, y } => {
                let mut actions = self.clear_selection();
                let rotation = self.reconciler.get(id).map_or(0, |e| e.rotation);
                if let Some(entity) = self.reconciler.apply_local(id, x, y, rotation, LOCAL_Z_PLACEHOLDER) {
                    actions.push(Action::EntityUpdated { entity, animated: false });
                }
                actions.push(Action::Send(mutation(id, x, y, rotation)));
                actions.extend(self.reconciler.release(&self.window));
                Ok(actions)
            }
        }
    }

    // --- Rotating ---

    /// Grab the rotation handle of the selected magnet.
    pub fn begin_rotate(&mut self, id: EntityId, screen: Point) -> Result<Vec<Action>, GestureError> {
        if !self.gesture.is_idle() {
            return Err(self.gesture.busy("rotate"));
        }
        let Some(entity) = self.reconciler.get(id).cloned() else {
            return Err(GestureError::UnknownEntity(id));
        };
        if self.ui.selected != Some(id) {
            return Err(GestureError::NotSelected(id));
        }
        if !self.reconciler.hold(id) {
            return Err(GestureError::UnknownEntity(id));
        }

        let center = self.camera.world_to_screen(Point::new(f64::from(entity.x), f64::from(entity.y)));
        self.gesture = GestureState::RotatingEntity {
            id,
            center,
            orig_rotation: entity.rotation,
            initial_angle: pointer_angle(center, screen),
            rotation: entity.rotation,
        };
        Ok(Vec::new())
    }

    pub fn rotate_to(&mut self, screen: Point) -> Result<Vec<Action>, GestureError> {
        let GestureState::RotatingEntity { id, center, orig_rotation, initial_angle, .. } = self.gesture else {
            return Err(GestureError::NotActive("rotate"));
        };
        let rotation = swept_rotation(orig_rotation, initial_angle, pointer_angle(center, screen));
        self.gesture = GestureState::RotatingEntity { id, center, orig_rotation, initial_angle, rotation };

        let mut actions = Vec::new();
        if let Some(entity) = self.reconciler.get(id) {
            actions.push(Action::EntityUpdated { entity: Entity { rotation, ..entity.clone() }, animated: false });
        }
        Ok(actions)
    }

    /// Release the rotation handle. Sends even for a zero sweep, unless a
    /// remote move carried the magnet out of the window meanwhile; then it is
    /// evicted and nothing is sent.
    pub fn end_rotate(&mut self) -> Result<Vec<Action>, GestureError> {
        let GestureState::RotatingEntity { id, rotation, .. } = self.gesture else {
            return Err(GestureError::NotActive("rotate"));
        };
        self.gesture = GestureState::Idle;
        let mut evicted = self.reconciler.release(&self.window);
        if !evicted.is_empty() {
            debug!(id, rotation, "rotated magnet was moved out of the window");
            self.after_reconcile(&mut evicted);
            return Ok(evicted);
        }

        let Some(entity) = self.reconciler.get(id).cloned() else {
            return Ok(Vec::new());
        };
        let mut actions = Vec::new();
        if let Some(updated) = self.reconciler.apply_local(id, entity.x, entity.y, rotation, entity.z_index) {
            actions.push(Action::EntityUpdated { entity: updated, animated: false });
        }
        actions.push(Action::Send(mutation(id, entity.x, entity.y, rotation)));
        Ok(actions)
    }

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selected.take().is_some() {
            vec![Action::SelectionChanged(None)]
        } else {
            Vec::new()
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn window(&self) -> SpatialWindow {
        self.window
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// The magnet showing the rotation handle, if any.
    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.ui.selected
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.reconciler.get(id)
    }

    #[must_use]
    pub fn reconciler(&self) -> &EntityReconciler {
        &self.reconciler
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_px(v: f64) -> i32 {
    v.round() as i32
}
