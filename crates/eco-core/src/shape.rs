use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::position::Position;

/// A circular body. Its owner's position is the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Radius in world units.
    pub radius: f64,
}

/// A rectangular body. Its owner's position is the lower-left anchor, so the
/// extent is `[x, x + width] x [y, y + height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Extent along the x axis.
    pub width: f64,
    /// Extent along the y axis.
    pub height: f64,
    /// Heading in degrees, derived from the last frame's displacement.
    #[serde(default)]
    pub rotation_deg: f64,
}

impl Circle {
    /// Create a circle with the given radius.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Rectangle {
    /// Create an unrotated rectangle.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rotation_deg: 0.0,
        }
    }

    /// Half width and half height.
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Centre of the rectangle anchored at `anchor`.
    pub fn center(&self, anchor: Position) -> Position {
        let (hw, hh) = self.half_extents();
        Position::new(anchor.x + hw, anchor.y + hh)
    }

    /// Upper-right corner of the axis-aligned extent anchored at `anchor`.
    pub fn max_corner(&self, anchor: Position) -> Position {
        Position::new(anchor.x + self.width, anchor.y + self.height)
    }

    /// The four corners rotated by `rotation_deg` about the centre.
    ///
    /// Order: (+w,+h), (-w,+h), (-w,-h), (+w,-h) in the rectangle's local frame.
    pub fn corners(&self, anchor: Position) -> [Position; 4] {
        let c = self.center(anchor);
        let (hw, hh) = self.half_extents();
        let (sin_a, cos_a) = self.rotation_deg.to_radians().sin_cos();

        [
            Position::new(c.x + cos_a * hw - sin_a * hh, c.y + sin_a * hw + cos_a * hh),
            Position::new(c.x - cos_a * hw - sin_a * hh, c.y - sin_a * hw + cos_a * hh),
            Position::new(c.x - cos_a * hw + sin_a * hh, c.y - sin_a * hw - cos_a * hh),
            Position::new(c.x + cos_a * hw + sin_a * hh, c.y + sin_a * hw - cos_a * hh),
        ]
    }
}

/// The closed set of body shapes. Fixed per agent at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// A circle, positioned by its centre.
    Circle(Circle),
    /// A rectangle, positioned by its lower-left anchor.
    Rectangle(Rectangle),
}

impl Shape {
    /// Shorthand for a circle shape.
    pub fn circle(radius: f64) -> Self {
        Self::Circle(Circle::new(radius))
    }

    /// Shorthand for an unrotated rectangle shape.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::Rectangle(Rectangle::new(width, height))
    }

    /// Check that every dimension is positive and finite.
    pub fn validate(&self) -> CoreResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        match self {
            Self::Circle(c) if !ok(c.radius) => Err(CoreError::InvalidShape(format!(
                "circle radius {} must be positive",
                c.radius
            ))),
            Self::Rectangle(r) if !ok(r.width) || !ok(r.height) => {
                Err(CoreError::InvalidShape(format!(
                    "rectangle {}x{} must have positive sides",
                    r.width, r.height
                )))
            }
            _ => Ok(()),
        }
    }

    /// Geometric centre of the shape placed at `position`.
    pub fn center(&self, position: Position) -> Position {
        match self {
            Self::Circle(_) => position,
            Self::Rectangle(r) => r.center(position),
        }
    }

    /// Half extents along x and y (the radius twice for a circle).
    pub fn half_extents(&self) -> (f64, f64) {
        match self {
            Self::Circle(c) => (c.radius, c.radius),
            Self::Rectangle(r) => r.half_extents(),
        }
    }

    /// Returns the rectangle variant, if this is one.
    pub fn as_rectangle(&self) -> Option<&Rectangle> {
        match self {
            Self::Rectangle(r) => Some(r),
            Self::Circle(_) => None,
        }
    }

    /// Returns the circle variant, if this is one.
    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Self::Circle(c) => Some(c),
            Self::Rectangle(_) => None,
        }
    }
}
