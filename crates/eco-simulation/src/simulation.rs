use eco_core::collision;
use eco_core::grid::SpatialGrid;
use eco_core::position::Position;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::agent::{Agent, AgentKind, EntityId};
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::resolver;
use crate::rules::{self, Interaction, LifecycleBuffer};
use crate::spawner::PlantSpawner;
use crate::stats::PopulationTracker;
use crate::steering;
use crate::system::System;
use crate::world::{PopulationCounts, World};

/// The top-level simulation orchestrator.
///
/// Owns the agent registry, broad-phase grid, clock, RNG, event log, and
/// registered systems. Each tick rebuilds the grid, moves every live mobile
/// agent in registry order, resolves its contacts, applies the deferred
/// spawns and removals, then runs the systems.
pub struct Simulation {
    world: World,
    grid: SpatialGrid<EntityId>,
    clock: SimClock,
    rng: Box<dyn RngCore>,
    events: EventLog,
    config: SimConfig,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("agents", &self.world.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create an empty simulation seeded from `config.seed`.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Create an empty simulation drawing randomness from `rng`.
    pub fn with_rng(config: SimConfig, rng: impl RngCore + 'static) -> SimResult<Self> {
        config.validate()?;
        let grid = SpatialGrid::new(config.grid_size)?;
        let events = EventLog::new(config.max_events);
        Ok(Self {
            world: World::new(),
            grid,
            clock: SimClock::new(),
            rng: Box::new(rng),
            events,
            config,
            systems: Vec::new(),
            initialized: false,
        })
    }

    /// Create a simulation with plant replenishment and population tracking
    /// registered, in that order.
    pub fn with_default_systems(config: SimConfig) -> SimResult<Self> {
        let mut sim = Self::new(config)?;
        sim.add_system(PlantSpawner::new(sim.config.replenish.clone()));
        sim.add_system(PopulationTracker::new(sim.config.history_len));
        Ok(sim)
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.init(&mut self.context());
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            world: &mut self.world,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut *self.rng,
        }
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Seed the configured initial herbivores, predators and plants at
    /// uniformly random positions in the window.
    pub fn populate(&mut self) -> SimResult<Vec<EntityId>> {
        let pop = self.config.population.clone();
        let mut ids = Vec::with_capacity(pop.herbivores + pop.predators + pop.plants);

        for i in 0..pop.herbivores {
            let position = self.random_position();
            let radius = pop.herbivore_radius.sample(&mut *self.rng);
            let speed = pop.herbivore_speed.sample(&mut *self.rng);
            let agent = Agent::herbivore(format!("Herbivore {}", i + 1), position, radius, speed);
            ids.push(self.add_entity(agent)?);
        }
        for i in 0..pop.predators {
            let position = self.random_position();
            let width = pop.predator_size.sample(&mut *self.rng);
            let height = pop.predator_size.sample(&mut *self.rng);
            let speed = pop.predator_speed.sample(&mut *self.rng);
            let agent =
                Agent::predator(format!("Predator {}", i + 1), position, width, height, speed);
            ids.push(self.add_entity(agent)?);
        }
        for i in 0..pop.plants {
            let position = self.random_position();
            let radius = pop.plant_radius.sample(&mut *self.rng);
            ids.push(self.add_entity(Agent::plant(format!("Plant {}", i + 1), position, radius))?);
        }

        tracing::debug!(population = %self.population(), "initial population seeded");
        Ok(ids)
    }

    fn random_position(&mut self) -> Position {
        let half = self.config.window_size / 2.0;
        Position::new(
            self.rng.random_range(-half..half),
            self.rng.random_range(-half..half),
        )
    }

    /// Register an agent. Mobile agents without a target are given one.
    pub fn add_entity(&mut self, agent: Agent) -> SimResult<EntityId> {
        self.context().spawn(agent)
    }

    /// Clone a live agent next to itself (or anywhere, for plants).
    pub fn divide(&mut self, id: EntityId) -> SimResult<EntityId> {
        let parent = self
            .world
            .get(id)
            .filter(|a| a.alive)
            .ok_or(SimError::EntityNotFound(id))?;
        let parent_name = parent.name.clone();
        let child = rules::offspring(parent, &self.config, &mut *self.rng);
        let child_id = self.world.add_agent(child)?;
        self.record_division(id, &parent_name, child_id);
        Ok(child_id)
    }

    /// Detach an agent immediately. Returns `false` for unknown or already
    /// removed handles.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.world.remove_agent(id) {
            Some(agent) => {
                self.record_removal(&agent, None);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    /// Advance the simulation by one frame at `fps`. Returns the live agents
    /// in registry order.
    pub fn tick(&mut self, fps: f64) -> SimResult<Vec<EntityId>> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SimError::InvalidFrameRate(fps));
        }
        if !self.initialized {
            self.init()?;
        }

        self.clock.advance(fps);
        self.grid
            .rebuild(self.world.live().map(|a| (a.position, a.id)));

        let mut buffer = LifecycleBuffer::new();
        for id in self.world.live_ids() {
            self.update_agent(id, fps, &mut buffer);
        }
        self.apply_lifecycle(buffer)?;

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.tick(&mut self.context());
            self.systems[i] = system;
            result?;
        }

        Ok(self.world.live_ids())
    }

    /// Advance one frame at the configured target frame rate.
    pub fn step(&mut self) -> SimResult<Vec<EntityId>> {
        self.tick(self.config.target_fps)
    }

    /// Advance the simulation by `n` frames at the target frame rate.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        tracing::info!(
            tick = self.clock.tick(),
            population = %self.population(),
            "run finished"
        );
        Ok(())
    }

    /// Steer one agent, then test and resolve it against its cell mates.
    fn update_agent(&mut self, id: EntityId, fps: f64, buffer: &mut LifecycleBuffer) {
        let window = self.config.window_size;
        let min_distance = self.config.min_target_distance;

        let Some(agent) = self.world.get_mut(id) else {
            return;
        };
        if !agent.alive || !agent.kind.is_mobile() {
            return;
        }

        let previous = agent.position;
        let target = match agent.target {
            Some(t) => t,
            None => {
                let t =
                    steering::sample_target(agent.position, window, min_distance, &mut *self.rng);
                agent.target = Some(t);
                t
            }
        };
        let max_speed = steering::frame_speed(agent.speed, fps);
        if agent.position.move_towards(target, max_speed) {
            steering::retarget(agent, window, min_distance, &mut *self.rng);
        }

        let candidates = self.grid.query(agent.position).to_vec();
        let tick = self.clock.tick();
        for other_id in candidates {
            if other_id == id {
                continue;
            }
            let Some((mover, other)) = self.world.pair_mut(id, other_id) else {
                continue;
            };
            if !other.alive
                || !collision::is_colliding(&mover.body(), &other.body(), self.config.rotation_aware)
            {
                continue;
            }

            tracing::trace!(tick, mover = %id, other = %other_id, "contact");
            self.events.push(SimEvent::new(
                tick,
                SimEventKind::Collided {
                    mover: id,
                    other: other_id,
                },
                format!("{} touched {}", mover.name, other.name),
            ));

            resolver::resolve(mover, other, &self.config.bounce);
            steering::retarget(mover, window, min_distance, &mut *self.rng);
            steering::retarget(other, window, min_distance, &mut *self.rng);

            match Interaction::between(mover.kind, other.kind) {
                Interaction::Bounce => {}
                Interaction::Graze => {
                    other.alive = false;
                    buffer.remove(other_id, Some(id));
                    buffer.spawn(id, rules::offspring(mover, &self.config, &mut *self.rng));
                }
                Interaction::Hunt => {
                    other.alive = false;
                    buffer.remove(other_id, Some(id));
                    if self.config.predator_divides_on_kill {
                        buffer.spawn(id, rules::offspring(mover, &self.config, &mut *self.rng));
                    }
                }
                Interaction::Trample => {
                    other.alive = false;
                    buffer.remove(other_id, Some(id));
                }
            }
        }

        if let Some(agent) = self.world.get_mut(id) {
            steering::update_heading(agent, previous);
        }
    }

    fn apply_lifecycle(&mut self, mut buffer: LifecycleBuffer) -> SimResult<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        let (removals, spawns) = buffer.drain();

        for (entity, by) in removals {
            if let Some(agent) = self.world.remove_agent(entity) {
                self.record_removal(&agent, by);
            }
        }
        for (parent, child) in spawns {
            let parent_name = self
                .world
                .get(parent)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| parent.to_string());
            let child_id = self.world.add_agent(child)?;
            self.record_division(parent, &parent_name, child_id);
        }
        Ok(())
    }

    fn record_removal(&mut self, agent: &Agent, by: Option<EntityId>) {
        let tick = self.clock.tick();
        let description = match by.and_then(|b| self.world.get(b)) {
            Some(eater) => format!(
                "{} ({}) was eaten by {} ({})",
                agent.name, agent.id, eater.name, eater.id
            ),
            None => format!("{} ({}) was removed", agent.name, agent.id),
        };
        tracing::debug!(tick, id = %agent.id, kind = %agent.kind, "agent removed");
        self.events.push(SimEvent::new(
            tick,
            SimEventKind::Removed {
                entity: agent.id,
                by,
            },
            description,
        ));
    }

    fn record_division(&mut self, parent: EntityId, parent_name: &str, child: EntityId) {
        let tick = self.clock.tick();
        tracing::debug!(tick, %parent, %child, "agent divided");
        self.events.push(SimEvent::new(
            tick,
            SimEventKind::Divided { parent, child },
            format!("{parent_name} ({parent}) divided into {child}"),
        ));
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Number of live agents of the given kind.
    pub fn count_by_kind(&self, kind: AgentKind) -> usize {
        self.world.count_by_kind(kind)
    }

    /// Live counts for every kind.
    pub fn population(&self) -> PopulationCounts {
        self.world.population()
    }

    /// The agent registry.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the agent registry.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The broad-phase grid as of the last tick.
    pub fn grid(&self) -> &SpatialGrid<EntityId> {
        &self.grid
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// The current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
