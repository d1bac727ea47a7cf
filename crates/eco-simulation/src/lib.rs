//! Tick-based ecosystem simulation.
//!
//! Predators, herbivores and plants live in a [`World`] registry. Each
//! [`Simulation::tick`] steers every mobile agent toward its wandering target,
//! finds neighbours through the [`eco_core::SpatialGrid`] broad phase, runs
//! the narrow-phase tests from [`eco_core::collision`], bounces overlapping
//! bodies apart and applies the kind-pair rules (grazing, hunting, division).
//! Spawns and removals are buffered and applied after the pass. Add-on
//! [`System`]s such as plant replenishment and population tracking run last.

/// Agent model: identity, kind, shape and display attributes.
pub mod agent;
/// Simulation clock for tracking ticks and elapsed time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Positional bounce applied to colliding pairs.
pub mod resolver;
/// Interaction rules, offspring, and the deferred lifecycle buffer.
pub mod rules;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Plant replenishment system.
pub mod spawner;
/// Population history system.
pub mod stats;
/// Target assignment and per-frame speed scaling.
pub mod steering;
/// The trait that all simulation systems implement.
pub mod system;
/// Agent registry and population counts.
pub mod world;

/// Re-exports of the agent model.
pub use agent::{Agent, AgentKind, Color, EntityId};
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of the configuration types.
pub use config::{BounceTable, PopulationConfig, ReplenishConfig, SimConfig, Span};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`spawner::PlantSpawner`].
pub use spawner::PlantSpawner;
/// Re-export of [`stats::PopulationTracker`].
pub use stats::PopulationTracker;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-exports of [`world::World`] and [`world::PopulationCounts`].
pub use world::{PopulationCounts, World};
