use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentKind, EntityId};
use crate::error::{SimError, SimResult};

/// Live agent counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    /// Live predators.
    pub predators: usize,
    /// Live herbivores.
    pub herbivores: usize,
    /// Live plants.
    pub plants: usize,
}

impl PopulationCounts {
    /// Count for a single kind.
    pub fn get(&self, kind: AgentKind) -> usize {
        match kind {
            AgentKind::Predator => self.predators,
            AgentKind::Herbivore => self.herbivores,
            AgentKind::Plant => self.plants,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        self.predators + self.herbivores + self.plants
    }

    fn bump(&mut self, kind: AgentKind) {
        match kind {
            AgentKind::Predator => self.predators += 1,
            AgentKind::Herbivore => self.herbivores += 1,
            AgentKind::Plant => self.plants += 1,
        }
    }
}

impl fmt::Display for PopulationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} predators, {} herbivores, {} plants",
            self.predators, self.herbivores, self.plants
        )
    }
}

/// Registry of every agent, in insertion order.
///
/// Iteration order is stable across ticks: new agents are appended and
/// removal keeps the relative order of the rest.
#[derive(Debug, Clone, Default)]
pub struct World {
    agents: Vec<Agent>,
    index: HashMap<EntityId, usize>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Agent CRUD
    // -----------------------------------------------------------------------

    /// Register an agent. Returns its ID.
    pub fn add_agent(&mut self, agent: Agent) -> SimResult<EntityId> {
        let id = agent.id;
        if self.index.contains_key(&id) {
            return Err(SimError::DuplicateEntity(id));
        }
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        Ok(id)
    }

    /// Get a reference to an agent by ID.
    pub fn get(&self, id: EntityId) -> Option<&Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    /// Get a mutable reference to an agent by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        self.index.get(&id).map(|&i| &mut self.agents[i])
    }

    /// Returns `true` if the ID is registered (alive or not).
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Detach an agent. Unknown IDs return `None`, so removing twice is harmless.
    pub fn remove_agent(&mut self, id: EntityId) -> Option<Agent> {
        let slot = self.index.remove(&id)?;
        let agent = self.agents.remove(slot);
        for (i, a) in self.agents.iter().enumerate().skip(slot) {
            self.index.insert(a.id, i);
        }
        Some(agent)
    }

    /// Two distinct agents borrowed mutably at once.
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Agent, &mut Agent)> {
        let i = *self.index.get(&a)?;
        let j = *self.index.get(&b)?;
        if i == j {
            return None;
        }
        if i < j {
            let (left, right) = self.agents.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.agents.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every registered agent, including ones consumed this tick.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Agents that are still alive.
    pub fn live(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.alive)
    }

    /// IDs of every registered agent, in registry order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.agents.iter().map(|a| a.id).collect()
    }

    /// IDs of live agents, in registry order.
    pub fn live_ids(&self) -> Vec<EntityId> {
        self.live().map(|a| a.id).collect()
    }

    /// Number of live agents of the given kind.
    pub fn count_by_kind(&self, kind: AgentKind) -> usize {
        self.live().filter(|a| a.kind == kind).count()
    }

    /// Live counts for every kind in one pass.
    pub fn population(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for agent in self.live() {
            counts.bump(agent.kind);
        }
        counts
    }

    /// Number of registered agents, dead ones included until detached.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns `true` if no agents are registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::position::Position;

    fn test_world() -> (World, Vec<EntityId>) {
        let mut world = World::new();
        let ids = vec![
            world
                .add_agent(Agent::predator("P", Position::ORIGIN, 2.0, 2.0, 0.3))
                .unwrap(),
            world
                .add_agent(Agent::herbivore("H", Position::new(5.0, 5.0), 1.0, 0.2))
                .unwrap(),
            world
                .add_agent(Agent::plant("Pl", Position::new(-5.0, 5.0), 1.0))
                .unwrap(),
        ];
        (world, ids)
    }

    #[test]
    fn add_and_get_agent() {
        let (world, ids) = test_world();
        assert_eq!(world.len(), 3);
        assert_eq!(world.get(ids[1]).unwrap().kind, AgentKind::Herbivore);
        assert!(world.contains(ids[2]));
        assert!(world.get(EntityId::new()).is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let (mut world, ids) = test_world();
        let copy = world.get(ids[0]).unwrap().clone();
        assert!(matches!(
            world.add_agent(copy),
            Err(SimError::DuplicateEntity(id)) if id == ids[0]
        ));
    }

    #[test]
    fn remove_keeps_order_and_is_idempotent() {
        let (mut world, ids) = test_world();
        let removed = world.remove_agent(ids[0]).unwrap();
        assert_eq!(removed.id, ids[0]);
        assert_eq!(world.ids(), vec![ids[1], ids[2]]);
        assert_eq!(world.get(ids[2]).unwrap().id, ids[2]);

        assert!(world.remove_agent(ids[0]).is_none());
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn counts_skip_dead_agents() {
        let (mut world, ids) = test_world();
        assert_eq!(
            world.population(),
            PopulationCounts {
                predators: 1,
                herbivores: 1,
                plants: 1
            }
        );
        world.get_mut(ids[1]).unwrap().alive = false;
        assert_eq!(world.count_by_kind(AgentKind::Herbivore), 0);
        assert_eq!(world.population().total(), 2);
        assert_eq!(world.live_ids(), vec![ids[0], ids[2]]);
        assert_eq!(world.ids().len(), 3);
    }

    #[test]
    fn pair_mut_borrows_both_orders() {
        let (mut world, ids) = test_world();
        {
            let (a, b) = world.pair_mut(ids[2], ids[0]).unwrap();
            assert_eq!(a.kind, AgentKind::Plant);
            assert_eq!(b.kind, AgentKind::Predator);
            a.position.move_by(1.0, 0.0);
        }
        assert_eq!(world.get(ids[2]).unwrap().position, Position::new(-4.0, 5.0));
        assert!(world.pair_mut(ids[1], ids[1]).is_none());
        assert!(world.pair_mut(ids[1], EntityId::new()).is_none());
    }

    #[test]
    fn population_display() {
        let counts = PopulationCounts {
            predators: 3,
            herbivores: 5,
            plants: 2,
        };
        assert_eq!(counts.to_string(), "3 predators, 5 herbivores, 2 plants");
        assert_eq!(counts.get(AgentKind::Plant), 2);
    }
}
