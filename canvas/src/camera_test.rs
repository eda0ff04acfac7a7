#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn camera(center_x: f64, center_y: f64, scale: f64) -> Camera {
    Camera { center_x, center_y, scale, viewport_w: 200.0, viewport_h: 100.0 }
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_equality() {
    assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 3.0));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_centered_at_origin_unscaled() {
    let cam = Camera::default();
    assert_eq!(cam.center_x, 0.0);
    assert_eq!(cam.center_y, 0.0);
    assert_eq!(cam.scale, 1.0);
}

// --- screen_to_world ---

#[test]
fn viewport_middle_maps_to_center() {
    let cam = camera(40.0, -60.0, 3.0);
    let world = cam.screen_to_world(Point::new(100.0, 50.0));
    assert!(point_approx_eq(world, Point::new(40.0, -60.0)));
}

#[test]
fn screen_to_world_top_left_corner() {
    let cam = camera(0.0, 0.0, 2.0);
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(approx_eq(world.x, -50.0));
    assert!(approx_eq(world.y, -25.0));
}

// --- world_to_screen ---

#[test]
fn world_to_screen_with_scale() {
    let cam = camera(0.0, 0.0, 2.0);
    let screen = cam.world_to_screen(Point::new(10.0, 20.0));
    assert!(approx_eq(screen.x, 120.0));
    assert!(approx_eq(screen.y, 90.0));
}

// --- Round trips ---

#[test]
fn round_trip_fractional_scale() {
    let cam = camera(13.7, -42.3, 0.75);
    let world = Point::new(333.3, -999.9);
    let back = cam.screen_to_world(cam.world_to_screen(world));
    assert!(point_approx_eq(world, back));
}

#[test]
fn round_trip_screen_first() {
    let cam = camera(10.0, 20.0, 1.5);
    let screen = Point::new(400.0, 300.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!(point_approx_eq(screen, back));
}

// --- screen_dist_to_world ---

#[test]
fn screen_dist_to_world_with_scale() {
    assert!(approx_eq(camera(0.0, 0.0, 2.0).screen_dist_to_world(10.0), 5.0));
    assert!(approx_eq(camera(0.0, 0.0, 0.5).screen_dist_to_world(10.0), 20.0));
}

#[test]
fn screen_dist_to_world_ignores_center() {
    let cam = camera(999.0, -999.0, 4.0);
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// --- Panning ---

#[test]
fn pan_moves_center_against_pointer() {
    let mut cam = camera(0.0, 0.0, 2.0);
    cam.pan_by_screen(10.0, -4.0);
    assert!(approx_eq(cam.center_x, -5.0));
    assert!(approx_eq(cam.center_y, 2.0));
}

#[test]
fn point_under_pointer_stays_under_pointer_while_panning() {
    let mut cam = camera(5.0, 5.0, 1.25);
    let grab = Point::new(30.0, 70.0);
    let world_before = cam.screen_to_world(grab);
    cam.pan_by_screen(25.0, -15.0);
    let world_after = cam.screen_to_world(Point::new(grab.x + 25.0, grab.y - 15.0));
    assert!(point_approx_eq(world_before, world_after));
}

// --- Window ---

#[test]
fn window_matches_from_center() {
    let cam = camera(100.0, 100.0, 1.0);
    assert_eq!(cam.window(), SpatialWindow::from_center(100.0, 100.0, 1.0, 200.0, 100.0));
}
