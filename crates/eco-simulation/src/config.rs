use eco_core::Shape;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Inclusive numeric range that initial attributes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Span {
    /// Create a range from its bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a value uniformly from `[min, max]`.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    fn check(&self, field: &str, positive: bool) -> SimResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SimError::InvalidConfig(format!(
                "{field}: [{}, {}] is not a valid range",
                self.min, self.max
            )));
        }
        if positive && self.min <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "{field}: lower bound {} must be positive",
                self.min
            )));
        }
        Ok(())
    }
}

/// Per shape-pair bounce coefficients, keyed by (mover, other).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceTable {
    /// Circle mover against a circle.
    pub circle_circle: f64,
    /// Circle mover against a rectangle.
    pub circle_rectangle: f64,
    /// Rectangle mover against a rectangle.
    pub rectangle_rectangle: f64,
    /// Rectangle mover against a circle.
    pub rectangle_circle: f64,
}

impl Default for BounceTable {
    fn default() -> Self {
        Self {
            circle_circle: 0.7,
            circle_rectangle: 0.7,
            rectangle_rectangle: 0.5,
            rectangle_circle: 0.3,
        }
    }
}

impl BounceTable {
    /// Coefficient for a contact initiated by `mover` against `other`.
    pub fn coefficient(&self, mover: &Shape, other: &Shape) -> f64 {
        match (mover, other) {
            (Shape::Circle(_), Shape::Circle(_)) => self.circle_circle,
            (Shape::Circle(_), Shape::Rectangle(_)) => self.circle_rectangle,
            (Shape::Rectangle(_), Shape::Rectangle(_)) => self.rectangle_rectangle,
            (Shape::Rectangle(_), Shape::Circle(_)) => self.rectangle_circle,
        }
    }

    fn check(&self) -> SimResult<()> {
        let all = [
            ("circle_circle", self.circle_circle),
            ("circle_rectangle", self.circle_rectangle),
            ("rectangle_rectangle", self.rectangle_rectangle),
            ("rectangle_circle", self.rectangle_circle),
        ];
        for (name, k) in all {
            if !k.is_finite() || k < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "bounce.{name}: {k} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Sizes of the initial population and the ranges their attributes are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Herbivores seeded at start.
    pub herbivores: usize,
    /// Herbivore body radius.
    pub herbivore_radius: Span,
    /// Herbivore base speed.
    pub herbivore_speed: Span,
    /// Predators seeded at start.
    pub predators: usize,
    /// Drawn independently for width and height.
    pub predator_size: Span,
    /// Predator base speed.
    pub predator_speed: Span,
    /// Plants seeded at start.
    pub plants: usize,
    /// Plant body radius.
    pub plant_radius: Span,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            herbivores: 5,
            herbivore_radius: Span::new(1.0, 2.0),
            herbivore_speed: Span::new(0.1, 0.5),
            predators: 3,
            predator_size: Span::new(2.0, 4.0),
            predator_speed: Span::new(0.1, 0.5),
            plants: 5,
            plant_radius: Span::new(1.0, 2.0),
        }
    }
}

/// Periodic plant replenishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplenishConfig {
    /// Ticks between replenishments. 0 disables replenishment.
    pub interval: u64,
    /// Plants added per replenishment.
    pub count: usize,
    /// Radius range of replenished plants.
    pub radius: Span,
}

impl Default for ReplenishConfig {
    fn default() -> Self {
        Self {
            interval: 100,
            count: 5,
            radius: Span::new(1.0, 3.0),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Edge length of the square world; targets are drawn from
    /// `[-window_size / 2, window_size / 2)` on both axes.
    pub window_size: f64,
    /// Edge length of a broad-phase grid cell.
    pub grid_size: f64,
    /// A freshly assigned target must lie farther than this from the mover.
    pub min_target_distance: f64,
    /// Frame rate used by [`Simulation::step`](crate::Simulation::step).
    pub target_fps: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Route every rectangle-mover contact through the rotated GJK test.
    pub rotation_aware: bool,
    /// Let a predator divide when it consumes a herbivore.
    pub predator_divides_on_kill: bool,
    /// Ticks of population history kept by the tracker.
    pub history_len: usize,
    /// Push strength per shape pairing.
    pub bounce: BounceTable,
    /// Initial population.
    pub population: PopulationConfig,
    /// Plant replenishment schedule.
    pub replenish: ReplenishConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            window_size: 100.0,
            grid_size: 20.0,
            min_target_distance: 5.0,
            target_fps: 30.0,
            max_events: 0,
            rotation_aware: false,
            predator_divides_on_kill: false,
            history_len: 150,
            bounce: BounceTable::default(),
            population: PopulationConfig::default(),
            replenish: ReplenishConfig::default(),
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the world edge length.
    pub fn with_window_size(mut self, size: f64) -> Self {
        self.window_size = size;
        self
    }

    /// Set the broad-phase cell edge length.
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the minimum distance of a freshly assigned target.
    pub fn with_min_target_distance(mut self, distance: f64) -> Self {
        self.min_target_distance = distance;
        self
    }

    /// Set the frame rate used by `step`.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Enable or disable the rotated collision path.
    pub fn with_rotation_aware(mut self, enabled: bool) -> Self {
        self.rotation_aware = enabled;
        self
    }

    /// Enable or disable predator division on a kill.
    pub fn with_predator_divides_on_kill(mut self, enabled: bool) -> Self {
        self.predator_divides_on_kill = enabled;
        self
    }

    /// Set the population history length.
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Replace the bounce coefficients.
    pub fn with_bounce(mut self, bounce: BounceTable) -> Self {
        self.bounce = bounce;
        self
    }

    /// Replace the initial population settings.
    pub fn with_population(mut self, population: PopulationConfig) -> Self {
        self.population = population;
        self
    }

    /// Replace the replenishment settings.
    pub fn with_replenish(mut self, replenish: ReplenishConfig) -> Self {
        self.replenish = replenish;
        self
    }

    /// Reject values the engine cannot run with and warn about values it
    /// can run with but probably should not.
    pub fn validate(&self) -> SimResult<()> {
        positive("window_size", self.window_size)?;
        positive("grid_size", self.grid_size)?;
        positive("target_fps", self.target_fps)?;
        if !self.min_target_distance.is_finite() || self.min_target_distance < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "min_target_distance: {} must be a non-negative number",
                self.min_target_distance
            )));
        }
        self.bounce.check()?;

        let pop = &self.population;
        pop.herbivore_radius.check("population.herbivore_radius", true)?;
        pop.herbivore_speed.check("population.herbivore_speed", false)?;
        pop.predator_size.check("population.predator_size", true)?;
        pop.predator_speed.check("population.predator_speed", false)?;
        pop.plant_radius.check("population.plant_radius", true)?;
        self.replenish.radius.check("replenish.radius", true)?;

        let diagonal = self.window_size * std::f64::consts::SQRT_2;
        if self.min_target_distance > diagonal / 2.0 {
            tracing::warn!(
                min_target_distance = self.min_target_distance,
                diagonal,
                "min_target_distance is large for the window; target sampling may exhaust its retries"
            );
        }
        if self.grid_size > self.window_size {
            tracing::warn!(
                grid_size = self.grid_size,
                window_size = self.window_size,
                "grid cell is larger than the window; the broad phase will not prune anything"
            );
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{field}: {value} must be positive and finite"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn config_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.seed, 42);
        assert!((config.window_size - 100.0).abs() < f64::EPSILON);
        assert!((config.grid_size - 20.0).abs() < f64::EPSILON);
        assert!((config.min_target_distance - 5.0).abs() < f64::EPSILON);
        assert!((config.target_fps - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 0);
        assert!(!config.rotation_aware);
        assert!(!config.predator_divides_on_kill);
        assert_eq!(config.history_len, 150);
        assert_eq!(config.population.herbivores, 5);
        assert_eq!(config.population.predators, 3);
        assert_eq!(config.replenish.interval, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = SimConfig::default()
            .with_seed(123)
            .with_grid_size(10.0)
            .with_target_fps(60.0)
            .with_max_events(500)
            .with_predator_divides_on_kill(true);
        assert_eq!(config.seed, 123);
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert!((config.target_fps - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 500);
        assert!(config.predator_divides_on_kill);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(SimConfig::default().with_grid_size(0.0).validate().is_err());
        assert!(SimConfig::default().with_window_size(-1.0).validate().is_err());
        assert!(SimConfig::default().with_target_fps(f64::NAN).validate().is_err());
        assert!(SimConfig::default()
            .with_min_target_distance(-1.0)
            .validate()
            .is_err());

        let mut population = PopulationConfig::default();
        population.plant_radius = Span::new(3.0, 1.0);
        assert!(SimConfig::default()
            .with_population(population)
            .validate()
            .is_err());

        let bounce = BounceTable {
            rectangle_circle: -0.1,
            ..BounceTable::default()
        };
        assert!(SimConfig::default().with_bounce(bounce).validate().is_err());
    }

    #[test]
    fn large_target_distance_is_allowed() {
        // warns, but still runs
        let config = SimConfig::default().with_min_target_distance(90.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn span_samples_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let span = Span::new(1.0, 2.0);
        for _ in 0..200 {
            let v = span.sample(&mut rng);
            assert!((1.0..=2.0).contains(&v));
        }
        assert_eq!(Span::new(4.0, 4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn bounce_coefficient_by_pair() {
        let table = BounceTable::default();
        let c = Shape::circle(1.0);
        let r = Shape::rectangle(2.0, 2.0);
        assert!((table.coefficient(&c, &c) - 0.7).abs() < f64::EPSILON);
        assert!((table.coefficient(&c, &r) - 0.7).abs() < f64::EPSILON);
        assert!((table.coefficient(&r, &r) - 0.5).abs() < f64::EPSILON);
        assert!((table.coefficient(&r, &c) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"seed": 7, "replenish": {"interval": 0}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.replenish.interval, 0);
        assert_eq!(config.replenish.count, 5);
        assert_eq!(config.bounce, BounceTable::default());
    }
}
