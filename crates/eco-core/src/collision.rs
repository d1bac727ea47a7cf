//! Narrow-phase tests.
//!
//! Each shape pairing has its own test, and which one runs depends on the
//! mover's shape (see [`CollisionTest::select`]). The tests are
//! not all equivalent: the circle/rectangle pair is checked with a clamped
//! per-axis test when a circle moves and with a nearest-point test when a
//! rectangle moves.

use crate::position::Position;
use crate::shape::{Rectangle, Shape};

/// Upper bound on support-point iterations in [`gjk`].
pub const GJK_MAX_ITERATIONS: usize = 32;

/// A shape placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Centre for circles, lower-left anchor for rectangles.
    pub position: Position,
    /// The body's shape.
    pub shape: Shape,
}

impl Body {
    /// Place `shape` at `position`.
    pub fn new(position: Position, shape: Shape) -> Self {
        Self { position, shape }
    }

    /// Points fed to the support function: rotated corners for rectangles,
    /// the centre alone for circles.
    fn support_points(&self) -> Vec<Position> {
        match &self.shape {
            Shape::Circle(_) => vec![self.position],
            Shape::Rectangle(r) => r.corners(self.position).to_vec(),
        }
    }
}

/// Which narrow-phase test to run for a mover/other pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionTest {
    /// Centre distance against the radius sum.
    CircleCircle,
    /// Circle mover against a rectangle, clamped per-axis with corner check.
    CircleRectangle,
    /// Axis-aligned interval overlap between two rectangles.
    Aabb,
    /// Rectangle mover against a circle, nearest point on the extent.
    RectangleCircle,
    /// Support-point iteration over rotated rectangle corners.
    Rotated,
}

impl CollisionTest {
    /// Pick the test for `mover` hitting `other`.
    ///
    /// `rotation_aware` routes every rectangle mover through [`gjk`].
    pub fn select(mover: &Shape, other: &Shape, rotation_aware: bool) -> Self {
        match (mover, other) {
            (Shape::Circle(_), Shape::Circle(_)) => Self::CircleCircle,
            (Shape::Circle(_), Shape::Rectangle(_)) => Self::CircleRectangle,
            (Shape::Rectangle(_), _) if rotation_aware => Self::Rotated,
            (Shape::Rectangle(_), Shape::Rectangle(_)) => Self::Aabb,
            (Shape::Rectangle(_), Shape::Circle(_)) => Self::RectangleCircle,
        }
    }

    /// Run this test. A test that does not fit the pair's shapes reports no
    /// collision.
    pub fn run(self, mover: &Body, other: &Body) -> bool {
        match (self, &mover.shape, &other.shape) {
            (Self::CircleCircle, Shape::Circle(a), Shape::Circle(b)) => {
                circle_circle(mover.position, a.radius, other.position, b.radius)
            }
            (Self::CircleRectangle, Shape::Circle(c), Shape::Rectangle(r)) => {
                circle_rectangle(mover.position, c.radius, other.position, r)
            }
            (Self::Aabb, Shape::Rectangle(a), Shape::Rectangle(b)) => {
                aabb(mover.position, a, other.position, b)
            }
            (Self::RectangleCircle, Shape::Rectangle(r), Shape::Circle(c)) => {
                rectangle_circle(mover.position, r, other.position, c.radius)
            }
            (Self::Rotated, Shape::Rectangle(_), _) => {
                gjk(&mover.support_points(), &other.support_points())
            }
            _ => false,
        }
    }
}

/// Select and run the test for `mover` hitting `other`.
pub fn is_colliding(mover: &Body, other: &Body, rotation_aware: bool) -> bool {
    CollisionTest::select(&mover.shape, &other.shape, rotation_aware).run(mover, other)
}

/// Circles collide iff their centres are strictly closer than the radius sum.
pub fn circle_circle(a: Position, ra: f64, b: Position, rb: f64) -> bool {
    a.distance_to(b) < ra + rb
}

/// Clamped per-axis circle/rectangle test.
///
/// Rejects when the centre is beyond half-extent plus radius on either axis,
/// accepts when it is within the half-extent on either axis, and otherwise
/// falls back to the squared distance from the nearest corner.
pub fn circle_rectangle(center: Position, radius: f64, anchor: Position, rect: &Rectangle) -> bool {
    let (hw, hh) = rect.half_extents();
    let rc = rect.center(anchor);
    let dx = (center.x - rc.x).abs();
    let dy = (center.y - rc.y).abs();

    if dx > hw + radius || dy > hh + radius {
        return false;
    }
    if dx <= hw || dy <= hh {
        return true;
    }

    let corner_dist_sq = (dx - hw).powi(2) + (dy - hh).powi(2);
    corner_dist_sq <= radius * radius
}

/// Nearest-point rectangle/circle test: clamp the centre into the extent and
/// compare the squared distance against the squared radius.
pub fn rectangle_circle(anchor: Position, rect: &Rectangle, center: Position, radius: f64) -> bool {
    let max = rect.max_corner(anchor);
    let nearest = Position::new(center.x.clamp(anchor.x, max.x), center.y.clamp(anchor.y, max.y));
    let d = center - nearest;
    d.dot(d) < radius * radius
}

/// Strict interval overlap on both axes.
pub fn aabb(a_anchor: Position, a: &Rectangle, b_anchor: Position, b: &Rectangle) -> bool {
    a_anchor.x < b_anchor.x + b.width
        && a_anchor.x + a.width > b_anchor.x
        && a_anchor.y < b_anchor.y + b.height
        && a_anchor.y + a.height > b_anchor.y
}

/// Support-point iteration over the Minkowski difference of two point sets.
///
/// Starts along `(1, 0)`, then repeatedly searches opposite the newest
/// simplex point. A support point whose projection onto the search direction
/// is negative proves separation. Once three points are held, the origin
/// test runs; on failure the oldest point is dropped. Runs at most
/// [`GJK_MAX_ITERATIONS`] times and reports no collision when exhausted.
pub fn gjk(shape1: &[Position], shape2: &[Position]) -> bool {
    if shape1.is_empty() || shape2.is_empty() {
        return false;
    }

    let mut direction = Position::new(1.0, 0.0);
    let mut simplex = vec![support(shape1, shape2, direction)];

    for _ in 0..GJK_MAX_ITERATIONS {
        let Some(&last) = simplex.last() else {
            return false;
        };
        direction = -last;
        let point = support(shape1, shape2, direction);

        if point.dot(direction) < 0.0 {
            return false;
        }
        simplex.push(point);

        if simplex.len() == 3 {
            if triangle_contains_origin(simplex[0], simplex[1], simplex[2]) {
                return true;
            }
            simplex.remove(0);
        }
    }
    false
}

/// Farthest point of `shape1` along `direction` minus the nearest of `shape2`.
/// Ties keep the first point encountered.
fn support(shape1: &[Position], shape2: &[Position], direction: Position) -> Position {
    let farthest = first_extreme(shape1, |d, best| d > best, direction);
    let nearest = first_extreme(shape2, |d, best| d < best, direction);
    farthest - nearest
}

fn first_extreme(
    points: &[Position],
    better: impl Fn(f64, f64) -> bool,
    direction: Position,
) -> Position {
    let mut best = points[0];
    let mut best_dot = best.dot(direction);
    for &p in &points[1..] {
        let d = p.dot(direction);
        if better(d, best_dot) {
            best = p;
            best_dot = d;
        }
    }
    best
}

/// Edge cross-product test: contact when neither `ab x ao` nor `ac x ao` is
/// positive.
fn triangle_contains_origin(a: Position, b: Position, c: Position) -> bool {
    let ao = -a;
    let ab = b - a;
    let ac = c - a;
    ab.cross(ao) <= 0.0 && ac.cross(ao) <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect_body(x: f64, y: f64, w: f64, h: f64) -> Body {
        Body::new(Position::new(x, y), Shape::rectangle(w, h))
    }

    fn circle_body(x: f64, y: f64, r: f64) -> Body {
        Body::new(Position::new(x, y), Shape::circle(r))
    }

    #[test]
    fn circle_boundary_is_not_a_collision() {
        assert!(!circle_circle(Position::ORIGIN, 1.0, Position::new(2.0, 0.0), 1.0));
        assert!(circle_circle(Position::ORIGIN, 1.0, Position::new(1.99, 0.0), 1.0));
    }

    #[test]
    fn aabb_fixtures() {
        let a = rect_body(0.0, 0.0, 2.0, 2.0);
        let b = rect_body(1.0, 1.0, 2.0, 2.0);
        let c = rect_body(3.0, 3.0, 2.0, 2.0);
        assert!(is_colliding(&a, &b, false));
        assert!(is_colliding(&b, &a, false));
        assert!(!is_colliding(&a, &c, false));
        assert!(!is_colliding(&c, &a, false));
    }

    #[test]
    fn aabb_touching_edges_do_not_collide() {
        let a = rect_body(0.0, 0.0, 2.0, 2.0);
        let b = rect_body(2.0, 0.0, 2.0, 2.0);
        assert!(!is_colliding(&a, &b, false));
    }

    #[test]
    fn circle_rectangle_clamped_axis() {
        let rect = Rectangle::new(2.0, 2.0);
        // centre of rect at (1, 1)
        assert!(circle_rectangle(Position::new(1.0, 2.5), 1.0, Position::ORIGIN, &rect));
        assert!(!circle_rectangle(Position::new(1.0, 4.5), 1.0, Position::ORIGIN, &rect));
        // diagonal: corner at (2, 2); circle at (2.6, 2.6) is 0.848 away
        assert!(circle_rectangle(Position::new(2.6, 2.6), 1.0, Position::ORIGIN, &rect));
        assert!(!circle_rectangle(Position::new(2.8, 2.8), 1.0, Position::ORIGIN, &rect));
    }

    #[test]
    fn circle_rectangle_accepts_when_within_either_half_extent() {
        // inside the half width on x, inside the radius band on y
        let rect = Rectangle::new(2.0, 2.0);
        assert!(circle_rectangle(Position::new(1.5, 2.9), 1.0, Position::ORIGIN, &rect));
    }

    #[test]
    fn rectangle_circle_nearest_point() {
        let rect = Rectangle::new(2.0, 2.0);
        assert!(rectangle_circle(Position::ORIGIN, &rect, Position::new(1.0, 1.0), 0.5));
        assert!(rectangle_circle(Position::ORIGIN, &rect, Position::new(2.5, 1.0), 1.0));
        assert!(!rectangle_circle(Position::ORIGIN, &rect, Position::new(3.0, 1.0), 1.0));
        // corner distance sqrt(0.5) ~ 0.707
        assert!(rectangle_circle(Position::ORIGIN, &rect, Position::new(2.5, 2.5), 0.75));
        assert!(!rectangle_circle(Position::ORIGIN, &rect, Position::new(2.5, 2.5), 0.7));
    }

    #[test]
    fn test_selection_table() {
        let c = Shape::circle(1.0);
        let r = Shape::rectangle(1.0, 1.0);
        assert_eq!(CollisionTest::select(&c, &c, false), CollisionTest::CircleCircle);
        assert_eq!(CollisionTest::select(&c, &r, false), CollisionTest::CircleRectangle);
        assert_eq!(CollisionTest::select(&r, &r, false), CollisionTest::Aabb);
        assert_eq!(CollisionTest::select(&r, &c, false), CollisionTest::RectangleCircle);
        assert_eq!(CollisionTest::select(&r, &r, true), CollisionTest::Rotated);
        assert_eq!(CollisionTest::select(&r, &c, true), CollisionTest::Rotated);
        assert_eq!(CollisionTest::select(&c, &r, true), CollisionTest::CircleRectangle);
    }

    #[test]
    fn mismatched_test_reports_no_collision() {
        let a = circle_body(0.0, 0.0, 5.0);
        let b = circle_body(0.0, 0.0, 5.0);
        assert!(!CollisionTest::Aabb.run(&a, &b));
        assert!(!CollisionTest::Rotated.run(&a, &b));
    }

    #[test]
    fn gjk_far_apart_rectangles_do_not_collide() {
        let a = rect_body(0.0, 0.0, 2.0, 2.0);
        let b = rect_body(10.0, 10.0, 2.0, 2.0);
        assert!(!is_colliding(&a, &b, true));
    }

    #[test]
    fn gjk_overlapping_rectangles_collide() {
        let a = rect_body(-1.0, -1.0, 2.0, 2.0);
        let b = rect_body(-0.5, -1.0, 2.0, 2.0);
        assert!(is_colliding(&a, &b, true));
    }

    #[test]
    fn gjk_point_far_from_rectangle() {
        let rect = rect_body(0.0, 0.0, 2.0, 2.0);
        let circle = circle_body(20.0, 20.0, 1.0);
        assert!(!is_colliding(&rect, &circle, true));
    }

    #[test]
    fn gjk_empty_input_is_no_collision() {
        assert!(!gjk(&[], &[Position::ORIGIN]));
        assert!(!gjk(&[Position::ORIGIN], &[]));
    }

    proptest! {
        #[test]
        fn circle_test_is_symmetric(
            ax in -50.0f64..50.0, ay in -50.0f64..50.0, ar in 0.1f64..5.0,
            bx in -50.0f64..50.0, by in -50.0f64..50.0, br in 0.1f64..5.0,
        ) {
            let a = circle_body(ax, ay, ar);
            let b = circle_body(bx, by, br);
            prop_assert_eq!(is_colliding(&a, &b, false), is_colliding(&b, &a, false));
        }

        #[test]
        fn aabb_is_symmetric_and_matches_intervals(
            ax in -20.0f64..20.0, ay in -20.0f64..20.0,
            aw in 0.5f64..5.0, ah in 0.5f64..5.0,
            bx in -20.0f64..20.0, by in -20.0f64..20.0,
            bw in 0.5f64..5.0, bh in 0.5f64..5.0,
        ) {
            let a = rect_body(ax, ay, aw, ah);
            let b = rect_body(bx, by, bw, bh);
            let x_overlap = ax.max(bx) < (ax + aw).min(bx + bw);
            let y_overlap = ay.max(by) < (ay + ah).min(by + bh);
            prop_assert_eq!(is_colliding(&a, &b, false), x_overlap && y_overlap);
            prop_assert_eq!(is_colliding(&a, &b, false), is_colliding(&b, &a, false));
        }

        #[test]
        fn gjk_always_terminates(
            ax in -20.0f64..20.0, ay in -20.0f64..20.0, rot in -180.0f64..180.0,
            bx in -20.0f64..20.0, by in -20.0f64..20.0,
        ) {
            let mut a = Rectangle::new(2.0, 3.0);
            a.rotation_deg = rot;
            let a = Body::new(Position::new(ax, ay), Shape::Rectangle(a));
            let b = rect_body(bx, by, 2.0, 2.0);
            // Only termination matters here; the answer is checked elsewhere.
            let _ = is_colliding(&a, &b, true);
        }
    }
}
