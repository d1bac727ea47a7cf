use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Distance below which a mover counts as having reached its target.
pub const ARRIVAL_DISTANCE: f64 = 0.1;

/// Distance over which the ease factor ramps from its floor up to full speed.
pub const EASE_DISTANCE: f64 = 5.0;

/// Lower bound on the ease factor, so a mover never stalls near its target.
pub const MIN_EASE: f64 = 0.1;

/// A point (or displacement) in the 2D simulation plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// The origin.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displace this position in place.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Step toward `target` with ease-in-out speed scaling.
    ///
    /// Returns `true` (and leaves the position untouched) once the target is
    /// closer than [`ARRIVAL_DISTANCE`]. Otherwise advances by
    /// `max_speed * clamp(distance / 5, 0.1, 1.0)` along the unit direction
    /// and returns `false`.
    pub fn move_towards(&mut self, target: Position, max_speed: f64) -> bool {
        let direction = target - *self;
        let distance = direction.length();

        if distance < ARRIVAL_DISTANCE {
            return true;
        }

        let unit = direction * (1.0 / distance);
        let ease = (distance / EASE_DISTANCE).clamp(MIN_EASE, 1.0);
        let step = unit * (max_speed * ease);
        self.move_by(step.x, step.y);
        false
    }

    /// Euclidean length when read as a vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Position) -> f64 {
        (other - self).length()
    }

    /// Dot product when both positions are read as vectors.
    pub fn dot(self, other: Position) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of two planar vectors.
    pub fn cross(self, other: Position) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_by_displaces_in_place() {
        let mut pos = Position::new(1.0, 2.0);
        pos.move_by(0.5, -1.0);
        assert_eq!(pos, Position::new(1.5, 1.0));
    }

    #[test]
    fn move_towards_strictly_approaches_then_arrives() {
        let mut pos = Position::ORIGIN;
        let target = Position::new(10.0, 0.0);
        let mut last = pos.distance_to(target);

        let mut steps = 0;
        while !pos.move_towards(target, 2.0) {
            let now = pos.distance_to(target);
            assert!(now < last, "distance grew from {last} to {now}");
            last = now;
            steps += 1;
            assert!(steps < 100, "never arrived");
        }

        assert!(last < ARRIVAL_DISTANCE);
        let settled = pos;
        assert!(pos.move_towards(target, 2.0));
        assert_eq!(pos, settled);
    }

    #[test]
    fn move_towards_full_speed_far_from_target() {
        let mut pos = Position::ORIGIN;
        assert!(!pos.move_towards(Position::new(0.0, 50.0), 3.0));
        assert!((pos.y - 3.0).abs() < 1e-12);
        assert!(pos.x.abs() < 1e-12);
    }

    #[test]
    fn move_towards_eases_near_target() {
        let mut pos = Position::ORIGIN;
        // distance 2.5 -> ease 0.5
        pos.move_towards(Position::new(2.5, 0.0), 1.0);
        assert!((pos.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn move_towards_ease_floor() {
        let mut pos = Position::ORIGIN;
        // distance 0.2 -> ease clamps to 0.1
        pos.move_towards(Position::new(0.2, 0.0), 1.0);
        assert!((pos.x - 0.1).abs() < 1e-12);
    }

    #[test]
    fn vector_helpers() {
        let a = Position::new(3.0, 4.0);
        assert!((a.length() - 5.0).abs() < f64::EPSILON);
        assert!((a.dot(Position::new(1.0, 1.0)) - 7.0).abs() < f64::EPSILON);
        assert!((Position::new(1.0, 0.0).cross(Position::new(0.0, 1.0)) - 1.0).abs() < f64::EPSILON);
        assert_eq!(-a, Position::new(-3.0, -4.0));
        assert_eq!(a * 2.0, Position::new(6.0, 8.0));
    }

    #[test]
    fn display_rounds_to_two_places() {
        assert_eq!(Position::new(1.0, -2.346).to_string(), "(1.00, -2.35)");
    }
}
