use std::collections::VecDeque;

use crate::agent::AgentKind;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;
use crate::world::PopulationCounts;

/// Records live counts per kind after every tick, keeping the most recent
/// `capacity` samples.
#[derive(Debug)]
pub struct PopulationTracker {
    capacity: usize,
    history: VecDeque<PopulationCounts>,
    peak: PopulationCounts,
}

impl PopulationTracker {
    /// A tracker keeping at most `capacity` samples (0 = unlimited).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: VecDeque::new(),
            peak: PopulationCounts::default(),
        }
    }

    fn record(&mut self, counts: PopulationCounts) {
        self.peak.predators = self.peak.predators.max(counts.predators);
        self.peak.herbivores = self.peak.herbivores.max(counts.herbivores);
        self.peak.plants = self.peak.plants.max(counts.plants);

        self.history.push_back(counts);
        if self.capacity > 0 && self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Samples from oldest to newest.
    pub fn history(&self) -> impl Iterator<Item = &PopulationCounts> {
        self.history.iter()
    }

    /// Counts for one kind, oldest first.
    pub fn series(&self, kind: AgentKind) -> Vec<usize> {
        self.history.iter().map(|c| c.get(kind)).collect()
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<PopulationCounts> {
        self.history.back().copied()
    }

    /// Highest count seen per kind over the whole run, including evicted samples.
    pub fn peak(&self) -> PopulationCounts {
        self.peak
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` if no tick has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl System for PopulationTracker {
    fn name(&self) -> &str {
        "population_tracker"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.record(ctx.world.population());
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(predators: usize, herbivores: usize, plants: usize) -> PopulationCounts {
        PopulationCounts {
            predators,
            herbivores,
            plants,
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = PopulationTracker::new(3);
        for i in 0..5 {
            tracker.record(counts(1, i, 2));
        }
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.series(AgentKind::Herbivore), vec![2, 3, 4]);
        assert_eq!(tracker.latest(), Some(counts(1, 4, 2)));
    }

    #[test]
    fn peak_survives_eviction() {
        let mut tracker = PopulationTracker::new(2);
        tracker.record(counts(9, 0, 0));
        tracker.record(counts(1, 3, 0));
        tracker.record(counts(1, 1, 7));
        assert_eq!(tracker.peak(), counts(9, 3, 7));
        assert_eq!(tracker.series(AgentKind::Predator), vec![1, 1]);
    }

    #[test]
    fn unlimited_capacity() {
        let mut tracker = PopulationTracker::new(0);
        assert!(tracker.is_empty());
        for _ in 0..500 {
            tracker.record(counts(0, 0, 0));
        }
        assert_eq!(tracker.len(), 500);
        assert_eq!(tracker.history().count(), 500);
    }
}
