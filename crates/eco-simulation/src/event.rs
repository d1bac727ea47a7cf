use serde::Serialize;

use crate::agent::{AgentKind, EntityId};

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEventKind {
    // Lifecycle
    /// An agent entered the world from outside a division.
    Spawned {
        /// The new agent.
        entity: EntityId,
        /// Its species.
        kind: AgentKind,
    },
    /// An agent produced a clone.
    Divided {
        /// The agent that divided.
        parent: EntityId,
        /// The newly created clone.
        child: EntityId,
    },
    /// An agent left the world.
    Removed {
        /// The agent that was removed.
        entity: EntityId,
        /// The agent that consumed it, if any.
        by: Option<EntityId>,
    },

    // Contacts
    /// The narrow phase reported a contact between a mover and a neighbour.
    Collided {
        /// The moving agent that initiated the contact.
        mover: EntityId,
        /// The neighbour it touched.
        other: EntityId,
    },

    // Systems
    /// The replenishment system added plants.
    Replenished {
        /// Number of plants added.
        count: usize,
    },

    // Custom
    /// A user-defined event.
    Custom {
        /// A label identifying the custom event type.
        label: String,
        /// The entities involved in this custom event.
        entities: Vec<EntityId>,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Spawned { entity, .. } => *entity == id,
            Self::Divided { parent, child } => *parent == id || *child == id,
            Self::Removed { entity, by } => *entity == id || *by == Some(id),
            Self::Collided { mover, other } => *mover == id || *other == id,
            Self::Replenished { .. } => false,
            Self::Custom { entities, .. } => entities.contains(&id),
        }
    }

    /// Lifecycle changes; the CLI shows these without `--verbose`.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::Divided { .. } | Self::Removed { .. } | Self::Replenished { .. }
        )
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Bounded history of what happened during a run.
///
/// With a non-zero `max_events` the oldest entries are evicted first; the
/// number evicted is kept so reports can say how much history was lost.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
    dropped: usize,
}

impl EventLog {
    /// An empty log holding at most `max_events` entries (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            dropped: 0,
        }
    }

    /// Append an event, evicting the oldest ones past the cap.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let excess = self.events.len() - self.max_events;
            self.events.drain(..excess);
            self.dropped += excess;
        }
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Retained events recorded at `tick`.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Retained events naming `id` in any role.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Divisions, removals and replenishments, oldest first.
    pub fn lifecycle(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(|e| e.kind.is_lifecycle())
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted by the cap so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
