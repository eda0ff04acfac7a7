//! Packaging of local edits for the server.
//!
//! Mutations are fire-and-forget: the host hands the resulting
//! [`ClientMessage`] to the connection, which drops it if the socket is not
//! open. The next snapshot is the only recovery for a lost mutation.

#[cfg(test)]
#[path = "outbound_test.rs"]
mod outbound_test;

use frames::{ClientMessage, EntityId, Mutation};

use crate::camera::Point;
use crate::consts::{TAP_THRESHOLD, WORLD_LIMIT};

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRelease {
    /// Too little movement to count as a drag; toggles the rotation handle.
    Tap,
    /// Dropped at a new rounded world position.
    Moved { x: i32, y: i32 },
}

/// Clamp a dragged position into the addressable world.
#[must_use]
pub fn clamp_to_world(p: Point) -> Point {
    Point::new(p.x.clamp(-WORLD_LIMIT, WORLD_LIMIT), p.y.clamp(-WORLD_LIMIT, WORLD_LIMIT))
}

/// Classify a drag release.
///
/// `current` is `None` when the pointer never moved after pointer-down. A
/// release closer than [`TAP_THRESHOLD`] to `origin` on both axes is a tap
/// too; pointer jitter on click would otherwise register as a tiny drag.
#[must_use]
pub fn classify_drag(origin: Point, current: Option<Point>) -> DragRelease {
    let Some(current) = current else {
        return DragRelease::Tap;
    };
    if (current.x - origin.x).abs() < TAP_THRESHOLD && (current.y - origin.y).abs() < TAP_THRESHOLD {
        return DragRelease::Tap;
    }
    let current = clamp_to_world(current);
    DragRelease::Moved { x: round_coord(current.x), y: round_coord(current.y) }
}

/// Wire message for a local edit.
#[must_use]
pub fn mutation(id: EntityId, x: i32, y: i32, rotation: i32) -> ClientMessage {
    ClientMessage::Mutate(Mutation { id, x, y, rotation })
}

#[allow(clippy::cast_possible_truncation)]
fn round_coord(v: f64) -> i32 {
    v.round() as i32
}
