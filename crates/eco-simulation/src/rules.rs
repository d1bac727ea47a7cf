//! Kind-pair interaction rules and the deferred lifecycle buffer.

use eco_core::Shape;
use eco_core::position::Position;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::agent::{Agent, AgentKind, Color, EntityId, INITIAL_ENERGY};
use crate::config::{SimConfig, Span};
use crate::steering;

/// Speed range offspring are drawn from.
pub const OFFSPRING_SPEED: Span = Span::new(0.1, 0.3);

/// Per-axis jitter applied to a herbivore clone's position.
pub const HERBIVORE_JITTER: f64 = 1.0;

/// Per-axis jitter applied to a predator clone's position.
pub const PREDATOR_JITTER: f64 = 5.0;

/// What happens when a mover touches a neighbour, beyond the bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing beyond the bounce.
    Bounce,
    /// The mover eats a plant and divides; the plant is removed.
    Graze,
    /// The mover eats a herbivore, which is removed.
    Hunt,
    /// The mover crushes a plant, which is removed. The mover never divides.
    Trample,
}

impl Interaction {
    /// The rule for a contact initiated by `mover` against `other`.
    pub fn between(mover: AgentKind, other: AgentKind) -> Self {
        match (mover, other) {
            (AgentKind::Herbivore, AgentKind::Plant) => Self::Graze,
            (AgentKind::Predator, AgentKind::Herbivore) => Self::Hunt,
            (AgentKind::Predator, AgentKind::Plant) => Self::Trample,
            _ => Self::Bounce,
        }
    }
}

/// A clone of `parent` with a new identity, fresh speed and a fresh target.
///
/// Herbivores land within one unit of the parent on each axis, predators
/// within five; plants scatter anywhere in the window. The rectangle heading
/// is reset and energy starts full.
pub fn offspring(parent: &Agent, config: &SimConfig, rng: &mut dyn RngCore) -> Agent {
    let half = config.window_size / 2.0;
    let position = match parent.kind {
        AgentKind::Herbivore => jitter(parent.position, HERBIVORE_JITTER, rng),
        AgentKind::Predator => jitter(parent.position, PREDATOR_JITTER, rng),
        AgentKind::Plant => Position::new(
            rng.random_range(-half..half),
            rng.random_range(-half..half),
        ),
    };

    let shape = match parent.shape {
        Shape::Rectangle(r) => Shape::rectangle(r.width, r.height),
        circle @ Shape::Circle(_) => circle,
    };

    let palette: &[Color] = match parent.kind {
        AgentKind::Plant => &Color::SEEDLING_PALETTE,
        AgentKind::Predator | AgentKind::Herbivore => &Color::CLONE_PALETTE,
    };
    let color = palette.choose(rng).copied().unwrap_or(parent.color);

    let speed = if parent.kind.is_mobile() {
        OFFSPRING_SPEED.sample(rng)
    } else {
        0.0
    };

    let mut child = Agent::new(parent.kind, parent.kind.clone_name(), position, shape, speed)
        .with_color(color);
    child.energy = INITIAL_ENERGY;
    steering::retarget(
        &mut child,
        config.window_size,
        config.min_target_distance,
        rng,
    );
    child
}

fn jitter(origin: Position, amount: f64, rng: &mut dyn RngCore) -> Position {
    Position::new(
        origin.x + rng.random_range(-amount..=amount),
        origin.y + rng.random_range(-amount..=amount),
    )
}

/// Spawns and removals gathered during a tick and applied after it.
///
/// Consumed agents are flagged dead immediately so the rest of the pass skips
/// them; the buffer only defers registry changes.
#[derive(Debug, Default)]
pub struct LifecycleBuffer {
    removals: Vec<(EntityId, Option<EntityId>)>,
    spawns: Vec<(EntityId, Agent)>,
}

impl LifecycleBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `entity` for removal, consumed by `by` if given. Duplicates are dropped.
    pub fn remove(&mut self, entity: EntityId, by: Option<EntityId>) {
        if !self.removals.iter().any(|(id, _)| *id == entity) {
            self.removals.push((entity, by));
        }
    }

    /// Queue a clone produced by `parent`.
    pub fn spawn(&mut self, parent: EntityId, child: Agent) {
        self.spawns.push((parent, child));
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.spawns.is_empty()
    }

    /// Take the queued removals and spawns, leaving the buffer empty.
    pub fn drain(
        &mut self,
    ) -> (Vec<(EntityId, Option<EntityId>)>, Vec<(EntityId, Agent)>) {
        (
            std::mem::take(&mut self.removals),
            std::mem::take(&mut self.spawns),
        )
    }
}
