use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

// =============================================================
// Construction
// =============================================================

#[test]
fn new_orders_corners() {
    let w = SpatialWindow::new(100, 50, -10, -20);
    assert_eq!((w.x1(), w.y1(), w.x2(), w.y2()), (-10, -20, 100, 50));
}

#[test]
fn from_center_applies_margin_and_pad() {
    let w = SpatialWindow::from_center(0.0, 0.0, 1.0, 100.0, 200.0);
    assert_eq!((w.x1(), w.y1(), w.x2(), w.y2()), (-165, -315, 165, 315));
}

#[test]
fn from_center_divides_by_scale() {
    let w = SpatialWindow::from_center(1000.0, -1000.0, 2.0, 100.0, 100.0);
    assert_eq!((w.x1(), w.y1(), w.x2(), w.y2()), (910, -1090, 1090, -910));
}

#[test]
fn from_center_treats_bad_scale_as_identity() {
    let zero = SpatialWindow::from_center(0.0, 0.0, 0.0, 100.0, 100.0);
    let one = SpatialWindow::from_center(0.0, 0.0, 1.0, 100.0, 100.0);
    assert_eq!(zero, one);
    let nan = SpatialWindow::from_center(0.0, 0.0, f64::NAN, 100.0, 100.0);
    assert_eq!(nan, one);
}

// =============================================================
// contains
// =============================================================

#[test]
fn contains_is_boundary_inclusive() {
    let w = SpatialWindow::new(0, 0, 100, 100);
    assert!(w.contains(0, 0));
    assert!(w.contains(100, 100));
    assert!(w.contains(0, 100));
    assert!(w.contains(100, 0));
}

#[test]
fn contains_rejects_points_just_outside() {
    let w = SpatialWindow::new(0, 0, 100, 100);
    assert!(!w.contains(-1, 50));
    assert!(!w.contains(101, 50));
    assert!(!w.contains(50, -1));
    assert!(!w.contains(50, 101));
}

#[test]
fn degenerate_window_contains_its_single_point() {
    let w = SpatialWindow::new(7, 7, 7, 7);
    assert!(w.contains(7, 7));
    assert!(!w.contains(7, 8));
}

// =============================================================
// Wire form
// =============================================================

#[test]
fn subscription_mirrors_corners_and_flag() {
    let w = SpatialWindow::new(-1, -2, 3, 4);
    let sub = w.to_subscription(true);
    assert!(sub.rescale);
    assert_eq!((sub.x1, sub.y1, sub.x2, sub.y2), (-1, -2, 3, 4));
    assert!(!w.to_subscription(false).rescale);
}

// =============================================================
// Boundary sampling
// =============================================================

#[test]
fn boundary_point_always_lies_on_an_edge_and_inside() {
    let mut rng = StdRng::seed_from_u64(7);
    let w = SpatialWindow::new(-40, 10, 60, 90);
    for _ in 0..2000 {
        let (x, y) = w.random_boundary_point(&mut rng);
        assert!(x == w.x1() || x == w.x2() || y == w.y1() || y == w.y2(), "({x}, {y}) not on an edge");
        assert!(w.contains(x, y), "({x}, {y}) outside {w:?}");
    }
}

#[test]
fn boundary_point_visits_all_four_edges() {
    let mut rng = StdRng::seed_from_u64(11);
    let w = SpatialWindow::new(0, 0, 1000, 1000);
    let mut seen = [false; 4];
    for _ in 0..400 {
        let (x, y) = w.random_boundary_point(&mut rng);
        if x == 0 {
            seen[0] = true;
        }
        if x == 1000 {
            seen[1] = true;
        }
        if y == 0 {
            seen[2] = true;
        }
        if y == 1000 {
            seen[3] = true;
        }
    }
    assert_eq!(seen, [true; 4]);
}

#[test]
fn boundary_point_of_degenerate_window_is_the_point() {
    let mut rng = StdRng::seed_from_u64(3);
    let w = SpatialWindow::new(5, -5, 5, -5);
    assert_eq!(w.random_boundary_point(&mut rng), (5, -5));
}
