use std::fmt;

use eco_core::collision::Body;
use eco_core::position::Position;
use eco_core::shape::Shape;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Energy every agent starts with; also the value offspring are reset to.
/// Carried for display only.
pub const INITIAL_ENERGY: f64 = 100.0;

/// Unique identifier for every agent in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The three species in the ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Rectangle-bodied hunter; consumes herbivores.
    Predator,
    /// Circle-bodied grazer; consumes plants and divides.
    Herbivore,
    /// Stationary circle; never initiates contact.
    Plant,
}

impl AgentKind {
    /// Every kind, in display order.
    pub const ALL: [AgentKind; 3] = [Self::Predator, Self::Herbivore, Self::Plant];

    /// Whether agents of this kind steer and initiate contacts.
    pub fn is_mobile(self) -> bool {
        !matches!(self, Self::Plant)
    }

    /// Colour given to agents of this kind at creation.
    pub fn default_color(self) -> Color {
        match self {
            Self::Predator => Color::Red,
            Self::Herbivore => Color::Blue,
            Self::Plant => Color::Green,
        }
    }

    /// Name given to clones produced by division.
    pub fn clone_name(self) -> &'static str {
        match self {
            Self::Predator => "Predator Clone",
            Self::Herbivore => "Herbivore Clone",
            Self::Plant => "Plant Clone",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predator => write!(f, "predator"),
            Self::Herbivore => write!(f, "herbivore"),
            Self::Plant => write!(f, "plant"),
        }
    }
}

/// Display colour. Never read by any rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default herbivore colour.
    Blue,
    /// Default predator colour.
    Red,
    /// Default plant colour.
    Green,
    /// Clone palette colour.
    Purple,
    /// Clone palette colour.
    Orange,
}

impl Color {
    /// Colours offspring are drawn from.
    pub const CLONE_PALETTE: [Color; 2] = [Color::Purple, Color::Orange];
    /// Colours scattered plant seedlings are drawn from.
    pub const SEEDLING_PALETTE: [Color; 4] =
        [Color::Blue, Color::Green, Color::Purple, Color::Orange];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        };
        f.write_str(s)
    }
}

/// A single organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identity handle.
    pub id: EntityId,
    /// Species.
    pub kind: AgentKind,
    /// Display label.
    pub name: String,
    /// Display colour.
    pub color: Color,
    /// Display-only energy.
    pub energy: f64,
    /// Centre for circles, lower-left anchor for rectangles.
    pub position: Position,
    /// Current steering destination; always `None` for plants.
    pub target: Option<Position>,
    /// Body shape, fixed at creation.
    pub shape: Shape,
    /// Base speed at 60 fps.
    pub speed: f64,
    /// Cleared the moment the agent is consumed.
    pub alive: bool,
}

impl Agent {
    /// Create an agent with the kind's default colour and full energy.
    pub fn new(
        kind: AgentKind,
        name: impl Into<String>,
        position: Position,
        shape: Shape,
        speed: f64,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            name: name.into(),
            color: kind.default_color(),
            energy: INITIAL_ENERGY,
            position,
            target: None,
            shape,
            speed,
            alive: true,
        }
    }

    /// A rectangle-bodied predator anchored at `position`.
    pub fn predator(
        name: impl Into<String>,
        position: Position,
        width: f64,
        height: f64,
        speed: f64,
    ) -> Self {
        Self::new(
            AgentKind::Predator,
            name,
            position,
            Shape::rectangle(width, height),
            speed,
        )
    }

    /// A circle-bodied herbivore centred at `position`.
    pub fn herbivore(name: impl Into<String>, position: Position, radius: f64, speed: f64) -> Self {
        Self::new(
            AgentKind::Herbivore,
            name,
            position,
            Shape::circle(radius),
            speed,
        )
    }

    /// A stationary plant centred at `position`.
    pub fn plant(name: impl Into<String>, position: Position, radius: f64) -> Self {
        Self::new(AgentKind::Plant, name, position, Shape::circle(radius), 0.0)
    }

    /// Set the steering destination.
    pub fn with_target(mut self, target: Position) -> Self {
        if self.kind.is_mobile() {
            self.target = Some(target);
        }
        self
    }

    /// Set the display colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The agent's shape placed at its position, for collision tests.
    pub fn body(&self) -> Body {
        Body::new(self.position, self.shape)
    }

    /// Heading in degrees for rectangle-bodied agents.
    pub fn rotation_deg(&self) -> Option<f64> {
        self.shape.as_rectangle().map(|r| r.rotation_deg)
    }
}
