//! The spatial subscription window.
//!
//! A `SpatialWindow` is the world-space rectangle the client is subscribed to.
//! It is derived from the view center, scale, and viewport size with a 3x
//! oversampling margin so magnets about to scroll into view are already
//! materialized. Instances are replaced wholesale whenever pan/zoom/resize
//! settles; nothing mutates a window in place.

#[cfg(test)]
#[path = "window_test.rs"]
mod window_test;

use frames::Subscription;
use rand::Rng;

use crate::consts::{WINDOW_MARGIN_FACTOR, WINDOW_PAD};

/// Axis-aligned world rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialWindow {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl SpatialWindow {
    /// Build a window from two corners, ordering each axis.
    #[must_use]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1: x1.min(x2), y1: y1.min(y2), x2: x1.max(x2), y2: y1.max(y2) }
    }

    /// Window centered on `(cx, cy)` covering 1.5 viewport extents (in world
    /// units at `scale`) plus a fixed pad in every direction.
    ///
    /// A non-finite or non-positive `scale` is treated as `1.0`.
    #[must_use]
    pub fn from_center(cx: f64, cy: f64, scale: f64, viewport_w: f64, viewport_h: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let half_w = WINDOW_MARGIN_FACTOR * viewport_w.max(0.0) / scale + WINDOW_PAD;
        let half_h = WINDOW_MARGIN_FACTOR * viewport_h.max(0.0) / scale + WINDOW_PAD;
        Self::new(
            round_to_world(cx - half_w),
            round_to_world(cy - half_h),
            round_to_world(cx + half_w),
            round_to_world(cy + half_h),
        )
    }

    #[must_use]
    pub fn x1(&self) -> i32 {
        self.x1
    }

    #[must_use]
    pub fn y1(&self) -> i32 {
        self.y1
    }

    #[must_use]
    pub fn x2(&self) -> i32 {
        self.x2
    }

    #[must_use]
    pub fn y2(&self) -> i32 {
        self.y2
    }

    /// Boundary-inclusive containment test.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Wire form of this window. `rescale` marks a window that changed
    /// because the scale changed rather than because the view panned.
    #[must_use]
    pub fn to_subscription(&self, rescale: bool) -> Subscription {
        Subscription { rescale, x1: self.x1, y1: self.y1, x2: self.x2, y2: self.y2 }
    }

    /// A point on one of the four edges, each edge chosen with equal
    /// probability and the free coordinate uniform over that edge's span.
    pub fn random_boundary_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (i32, i32) {
        match rng.random_range(0..4_u8) {
            0 => (self.x1, rng.random_range(self.y1..=self.y2)),
            1 => (self.x2, rng.random_range(self.y1..=self.y2)),
            2 => (rng.random_range(self.x1..=self.x2), self.y1),
            _ => (rng.random_range(self.x1..=self.x2), self.y2),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_world(value: f64) -> i32 {
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
