use eco_core::position::Position;
use rand::Rng;

use crate::agent::Agent;
use crate::config::ReplenishConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Adds a batch of plants at random positions every `interval` ticks.
#[derive(Debug)]
pub struct PlantSpawner {
    config: ReplenishConfig,
    spawned: usize,
}

impl PlantSpawner {
    /// A spawner following `config`.
    pub fn new(config: ReplenishConfig) -> Self {
        Self { config, spawned: 0 }
    }

    /// Total plants added so far.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    fn due(&self, tick: u64) -> bool {
        self.config.interval > 0 && tick % self.config.interval == 0
    }
}

impl System for PlantSpawner {
    fn name(&self) -> &str {
        "plant_spawner"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        if !self.due(ctx.tick()) || self.config.count == 0 {
            return Ok(());
        }

        let half = ctx.config.window_size / 2.0;
        for k in 0..self.config.count {
            let position = Position::new(
                ctx.rng.random_range(-half..half),
                ctx.rng.random_range(-half..half),
            );
            let radius = self.config.radius.sample(ctx.rng);
            ctx.spawn(Agent::plant(format!("Plant {}", k + 1), position, radius))?;
        }
        self.spawned += self.config.count;

        let count = self.config.count;
        ctx.emit(
            SimEventKind::Replenished { count },
            format!("{count} plants sprouted"),
        );
        tracing::debug!(tick = ctx.tick(), count, "plants replenished");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
