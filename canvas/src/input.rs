//! Gesture state machine and persistent UI state.
//!
//! Exactly one gesture is active at a time. `GestureState` carries all the
//! context needed between pointer-down and pointer-up to compute the final
//! mutation on release; the engine drives the transitions and rejects invalid
//! ones with a [`GestureError`] instead of letting two gestures overlap.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::EntityId;

use crate::camera::Point;

/// Why a gesture transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("cannot start {requested} while {active} is in progress")]
    Busy { active: &'static str, requested: &'static str },

    #[error("magnet {0} is not tracked")]
    UnknownEntity(EntityId),

    #[error("magnet {0} must be selected before it can be rotated")]
    NotSelected(EntityId),

    #[error("no {0} gesture is in progress")]
    NotActive(&'static str),
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    /// Magnet showing the rotation handle, if any.
    pub selected: Option<EntityId>,
}

/// The active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is dragging the background to move the view.
    PanningViewport {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving a magnet.
    DraggingEntity {
        id: EntityId,
        /// Magnet position when the drag began (world units).
        origin: Point,
        /// Pointer position minus magnet position at pointer-down (world units).
        grab_offset: Point,
        /// Unclamped, unrounded position from the latest pointer move, or
        /// `None` if the pointer has not moved since pointer-down.
        current: Option<Point>,
    },
    /// The user is turning a magnet by its rotation handle.
    RotatingEntity {
        id: EntityId,
        /// Screen-space pivot.
        center: Point,
        /// Rotation in degrees at the start of the gesture.
        orig_rotation: i32,
        /// Pointer angle around `center` at pointer-down, in degrees.
        initial_angle: f64,
        /// Latest rotation in whole degrees.
        rotation: i32,
    },
}

impl GestureState {
    /// Short name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PanningViewport { .. } => "pan",
            Self::DraggingEntity { .. } => "drag",
            Self::RotatingEntity { .. } => "rotate",
        }
    }

    /// The magnet this gesture holds, if any.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::DraggingEntity { id, .. } | Self::RotatingEntity { id, .. } => Some(*id),
            Self::Idle | Self::PanningViewport { .. } => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Error for starting `requested` from this state.
    #[must_use]
    pub fn busy(&self, requested: &'static str) -> GestureError {
        GestureError::Busy { active: self.name(), requested }
    }
}

/// Pointer angle around `center`, in degrees, measured from +x toward +y.
#[must_use]
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

/// Rotation after the pointer has swept from `initial_angle` to `angle`,
/// wrapped into `(-360, 360)` and rounded to whole degrees.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn swept_rotation(orig_rotation: i32, initial_angle: f64, angle: f64) -> i32 {
    ((f64::from(orig_rotation) + (angle - initial_angle)) % 360.0).round() as i32
}
