/// Tracks simulation time: a monotonic tick counter and elapsed seconds.
///
/// Each tick lasts `1 / fps` seconds, where `fps` is the frame rate passed
/// to that tick, so elapsed time stays correct when the frame rate varies.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed_secs: f64,
    last_fps: Option<f64>,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame at the given rate. Returns the new tick number.
    pub fn advance(&mut self, fps: f64) -> u64 {
        self.tick += 1;
        self.elapsed_secs += 1.0 / fps;
        self.last_fps = Some(fps);
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated seconds since start.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Frame rate of the most recent tick.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}
