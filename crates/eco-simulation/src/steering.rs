//! Target assignment and per-frame speed scaling for mobile agents.

use eco_core::Shape;
use eco_core::position::Position;
use rand::{Rng, RngCore};

use crate::agent::Agent;

/// Rejection-sampling budget for a new target. When every attempt lands too
/// close the last sample is used anyway.
pub const MAX_TARGET_ATTEMPTS: usize = 64;

/// Frame displacement below which a rectangle keeps its previous heading.
pub const HEADING_EPSILON: f64 = 0.01;

/// Reference frame rate that base speeds are expressed at.
pub const REFERENCE_FPS: f64 = 60.0;

/// Scale a base speed to the distance covered in one frame at `fps`.
pub fn frame_speed(base_speed: f64, fps: f64) -> f64 {
    base_speed * (REFERENCE_FPS / fps)
}

/// Draw a target uniformly in `[-window_size / 2, window_size / 2)` on both
/// axes that lies farther than `min_distance` from `from`.
pub fn sample_target(
    from: Position,
    window_size: f64,
    min_distance: f64,
    rng: &mut dyn RngCore,
) -> Position {
    let half = window_size / 2.0;
    if !half.is_finite() || half <= 0.0 {
        return from;
    }

    let mut candidate = from;
    for _ in 0..MAX_TARGET_ATTEMPTS {
        candidate = Position::new(rng.random_range(-half..half), rng.random_range(-half..half));
        if candidate.distance_to(from) > min_distance {
            return candidate;
        }
    }

    tracing::warn!(
        attempts = MAX_TARGET_ATTEMPTS,
        min_distance,
        %from,
        %candidate,
        "target sampling exhausted its retries; accepting the last sample"
    );
    candidate
}

/// Give a mobile agent a fresh target. Plants are left untouched.
pub fn retarget(agent: &mut Agent, window_size: f64, min_distance: f64, rng: &mut dyn RngCore) {
    if !agent.kind.is_mobile() {
        return;
    }
    agent.target = Some(sample_target(agent.position, window_size, min_distance, rng));
}

/// Point a rectangle along its displacement since `previous`.
///
/// Small displacements keep the old heading so a stalled agent does not spin.
pub fn update_heading(agent: &mut Agent, previous: Position) {
    let Shape::Rectangle(rect) = &mut agent.shape else {
        return;
    };
    let delta = agent.position - previous;
    if delta.length() > HEADING_EPSILON {
        rect.rotation_deg = delta.y.atan2(delta.x).to_degrees();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Replays a fixed list of words forever.
    #[derive(Debug)]
    pub(crate) struct SequenceRng {
        words: Vec<u64>,
        next: usize,
    }

    impl SequenceRng {
        pub(crate) fn new(words: Vec<u64>) -> Self {
            Self { words, next: 0 }
        }

        /// Always yields the same word, so every sample is identical.
        pub(crate) fn constant(word: u64) -> Self {
            Self::new(vec![word])
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            word
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    #[test]
    fn frame_speed_scales_with_frame_rate() {
        assert!((frame_speed(0.5, 60.0) - 0.5).abs() < 1e-12);
        assert!((frame_speed(0.5, 30.0) - 1.0).abs() < 1e-12);
        assert!((frame_speed(0.3, 120.0) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn sampled_targets_respect_bounds_and_distance() {
        let mut rng = StdRng::seed_from_u64(9);
        let from = Position::new(3.0, -4.0);
        for _ in 0..500 {
            let t = sample_target(from, 100.0, 5.0, &mut rng);
            assert!((-50.0..50.0).contains(&t.x));
            assert!((-50.0..50.0).contains(&t.y));
            assert!(t.distance_to(from) > 5.0);
        }
    }

    #[test]
    fn sampling_terminates_when_no_target_qualifies() {
        // Nothing in a 10x10 window is 1000 units away.
        let mut rng = StdRng::seed_from_u64(1);
        let t = sample_target(Position::ORIGIN, 10.0, 1000.0, &mut rng);
        assert!((-5.0..5.0).contains(&t.x));
        assert!((-5.0..5.0).contains(&t.y));
    }

    #[test]
    fn constant_generator_falls_back_to_last_sample() {
        let first = sample_target(Position::ORIGIN, 100.0, 5.0, &mut SequenceRng::constant(0));
        // every draw lands on the same point; place the mover right on it
        let t = sample_target(first, 100.0, 5.0, &mut SequenceRng::constant(0));
        assert_eq!(t, first);
    }

    #[test]
    fn retarget_skips_plants() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut plant = Agent::plant("Plant", Position::ORIGIN, 1.0);
        retarget(&mut plant, 100.0, 5.0, &mut rng);
        assert!(plant.target.is_none());

        let mut herbivore = Agent::herbivore("Herbivore", Position::ORIGIN, 1.0, 0.2);
        retarget(&mut herbivore, 100.0, 5.0, &mut rng);
        let target = herbivore.target.unwrap();
        assert!(target.distance_to(Position::ORIGIN) > 5.0);
    }

    #[test]
    fn heading_follows_displacement() {
        let mut predator = Agent::predator("Predator", Position::new(1.0, 1.0), 2.0, 2.0, 0.3);
        update_heading(&mut predator, Position::new(1.0, 0.0));
        assert!((predator.rotation_deg().unwrap() - 90.0).abs() < 1e-9);

        // a tiny nudge keeps the previous heading
        update_heading(&mut predator, Position::new(1.0, 0.995));
        assert!((predator.rotation_deg().unwrap() - 90.0).abs() < 1e-9);

        let mut herbivore = Agent::herbivore("Herbivore", Position::ORIGIN, 1.0, 0.2);
        update_heading(&mut herbivore, Position::new(-3.0, 0.0));
        assert!(herbivore.rotation_deg().is_none());
    }
}
