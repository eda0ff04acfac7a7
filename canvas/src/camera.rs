#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::window::SpatialWindow;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// View state on the unbounded plane.
///
/// `center_x` / `center_y` are the world coordinates shown at the middle of
/// the viewport. `scale` is screen pixels per world unit (1.0 = no zoom).
/// `viewport_w` / `viewport_h` are in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
    pub viewport_w: f64,
    pub viewport_h: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { center_x: 0.0, center_y: 0.0, scale: 1.0, viewport_w: 0.0, viewport_h: 0.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels, origin top-left) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: self.center_x + (screen.x - self.viewport_w / 2.0) / self.scale,
            y: self.center_y + (screen.y - self.viewport_h / 2.0) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: (world.x - self.center_x) * self.scale + self.viewport_w / 2.0,
            y: (world.y - self.center_y) * self.scale + self.viewport_h / 2.0,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Move the view so the content follows a pointer dragged by `(dx, dy)` pixels.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.center_x -= self.screen_dist_to_world(dx);
        self.center_y -= self.screen_dist_to_world(dy);
    }

    /// Subscription window for the current view.
    #[must_use]
    pub fn window(&self) -> SpatialWindow {
        SpatialWindow::from_center(self.center_x, self.center_y, self.scale, self.viewport_w, self.viewport_h)
    }
}
