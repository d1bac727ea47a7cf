//! Positional bounce applied after the narrow phase reports a contact.

use eco_core::Shape;
use eco_core::position::Position;

use crate::agent::Agent;
use crate::config::BounceTable;

/// Penetration depth along the contact normal, per shape pair.
///
/// Rectangle movers measure against raw anchors rather than centres, which
/// can come out negative; that is clamped to zero so a contact never pulls
/// the bodies together.
fn overlap(mover: &Agent, other: &Agent, distance: f64) -> f64 {
    let pa = mover.position;
    let pb = other.position;
    let depth = match (&mover.shape, &other.shape) {
        (Shape::Circle(a), Shape::Circle(b)) => a.radius + b.radius - distance,
        (Shape::Circle(c), Shape::Rectangle(r)) => {
            let (hw, hh) = r.half_extents();
            let center = r.center(pb);
            let dx = (pa.x - center.x).abs();
            let dy = (pa.y - center.y).abs();
            (c.radius + hw - dx).min(c.radius + hh - dy)
        }
        (Shape::Rectangle(a), Shape::Rectangle(b)) => {
            let (ahw, ahh) = a.half_extents();
            let (bhw, bhh) = b.half_extents();
            let dx = (pa.x - pb.x).abs();
            let dy = (pa.y - pb.y).abs();
            (ahw + bhw - dx).min(ahh + bhh - dy)
        }
        (Shape::Rectangle(r), Shape::Circle(c)) => {
            let (hw, hh) = r.half_extents();
            let dx = (pa.x - pb.x).abs();
            let dy = (pa.y - pb.y).abs();
            (c.radius + hw - dx).min(c.radius + hh - dy)
        }
    };
    depth.max(0.0)
}

/// Push `mover` and `other` apart along the line joining their positions.
///
/// The mover receives `normal * overlap * k`, the other party the opposite.
/// Coincident positions have no normal, so nothing moves and `None` is
/// returned; otherwise the displacement applied to the mover is returned.
pub fn resolve(mover: &mut Agent, other: &mut Agent, table: &BounceTable) -> Option<Position> {
    let delta = mover.position - other.position;
    let distance = delta.length();
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }

    let normal = delta * (1.0 / distance);
    let k = table.coefficient(&mover.shape, &other.shape);
    let bounce = normal * (overlap(mover, other, distance) * k);

    mover.position.move_by(bounce.x, bounce.y);
    other.position.move_by(-bounce.x, -bounce.y);
    Some(bounce)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(p: Position) -> bool {
        p.x.is_finite() && p.y.is_finite()
    }

    #[test]
    fn circles_push_apart_along_the_normal() {
        let mut a = Agent::herbivore("A", Position::new(1.0, 0.0), 1.0, 0.1);
        let mut b = Agent::herbivore("B", Position::ORIGIN, 1.0, 0.1);
        let bounce = resolve(&mut a, &mut b, &BounceTable::default()).unwrap();

        // overlap 1.0, k 0.7
        assert!((bounce.x - 0.7).abs() < 1e-12);
        assert!(bounce.y.abs() < 1e-12);
        assert!((a.position.x - 1.7).abs() < 1e-12);
        assert!((b.position.x + 0.7).abs() < 1e-12);
    }

    #[test]
    fn displacements_are_equal_and_opposite() {
        let mut a = Agent::predator("A", Position::new(1.0, 1.5), 2.0, 2.0, 0.1);
        let mut b = Agent::herbivore("B", Position::new(0.5, 0.5), 1.0, 0.1);
        let (a0, b0) = (a.position, b.position);
        resolve(&mut a, &mut b, &BounceTable::default()).unwrap();
        let da = a.position - a0;
        let db = b.position - b0;
        assert!((da.x + db.x).abs() < 1e-12);
        assert!((da.y + db.y).abs() < 1e-12);
    }

    #[test]
    fn rectangle_overlap_uses_smallest_axis() {
        let mut a = Agent::predator("A", Position::new(1.0, 0.0), 2.0, 2.0, 0.1);
        let mut b = Agent::predator("B", Position::ORIGIN, 2.0, 2.0, 0.1);
        let bounce = resolve(&mut a, &mut b, &BounceTable::default()).unwrap();
        // min(2 - 1, 2 - 0) = 1, k 0.5
        assert!((bounce.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn circle_mover_measures_against_rectangle_center() {
        // rectangle centre (1, 1); circle at (3, 1): min(1 + 1 - 2, 1 + 1 - 0) = 0
        let mut a = Agent::herbivore("A", Position::new(3.0, 1.0), 1.0, 0.1);
        let mut b = Agent::predator("B", Position::ORIGIN, 2.0, 2.0, 0.1);
        let bounce = resolve(&mut a, &mut b, &BounceTable::default()).unwrap();
        assert!(bounce.length() < 1e-12);
    }

    #[test]
    fn negative_depth_never_attracts() {
        // anchor (5, 5) vs circle (7.5, 6): min(2 - 2.5, 2 - 1) < 0
        let mut a = Agent::predator("A", Position::new(5.0, 5.0), 2.0, 2.0, 0.1);
        let mut b = Agent::plant("B", Position::new(7.5, 6.0), 1.0);
        let bounce = resolve(&mut a, &mut b, &BounceTable::default()).unwrap();
        assert!(bounce.length() < 1e-12);
        assert_eq!(b.position, Position::new(7.5, 6.0));
    }

    #[test]
    fn coincident_positions_are_skipped() {
        let mut a = Agent::herbivore("A", Position::new(2.0, 2.0), 1.0, 0.1);
        let mut b = Agent::plant("B", Position::new(2.0, 2.0), 1.0);
        assert!(resolve(&mut a, &mut b, &BounceTable::default()).is_none());
        assert!(finite(a.position));
        assert!(finite(b.position));
        assert_eq!(a.position, Position::new(2.0, 2.0));
        assert_eq!(b.position, Position::new(2.0, 2.0));
    }

    #[test]
    fn coincident_rectangles_are_skipped() {
        let mut a = Agent::predator("A", Position::ORIGIN, 2.0, 2.0, 0.1);
        let mut b = Agent::predator("B", Position::ORIGIN, 3.0, 1.0, 0.1);
        assert!(resolve(&mut a, &mut b, &BounceTable::default()).is_none());
        assert!(finite(a.position) && finite(b.position));
    }
}
