use rand::RngCore;

use crate::agent::{Agent, EntityId};
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::steering;
use crate::world::World;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The agent registry.
    pub world: &'a mut World,
    /// The simulation clock (read-only for systems).
    pub clock: &'a SimClock,
    /// The run configuration.
    pub config: &'a SimConfig,
    /// The event log for recording what happened.
    pub events: &'a mut EventLog,
    /// The simulation's random number generator.
    pub rng: &'a mut dyn RngCore,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Register a new agent and record a `Spawned` event for it.
    ///
    /// Mobile agents without a target get one before they enter the world.
    pub fn spawn(&mut self, mut agent: Agent) -> SimResult<EntityId> {
        agent.shape.validate()?;
        if agent.target.is_none() {
            steering::retarget(
                &mut agent,
                self.config.window_size,
                self.config.min_target_distance,
                self.rng,
            );
        }
        let kind = agent.kind;
        let name = agent.name.clone();
        let id = self.world.add_agent(agent)?;
        tracing::debug!(%id, %kind, tick = self.clock.tick(), "agent spawned");
        self.emit(
            SimEventKind::Spawned { entity: id, kind },
            format!("{name} ({id}) appeared"),
        );
        Ok(id)
    }

    /// The current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}
