//! Deterministic time system
//!
//! Fixed tick rate; every tick advances simulated time by exactly one tick duration.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;

/// Simulation time tracker
#[derive(Debug, Clone)]
pub struct SimulationTime {
    tick_rate_hz: u32,
    tick_duration: Duration,
    tick_count: u64,
    accumulated_time: Duration,
}

impl SimulationTime {
    /// A zero rate is clamped to 1 Hz.
    pub fn new(tick_rate_hz: u32) -> Self {
        let tick_rate_hz = tick_rate_hz.max(1);
        Self {
            tick_rate_hz,
            tick_duration: Duration::from_secs_f64(1.0 / f64::from(tick_rate_hz)),
            tick_count: 0,
            accumulated_time: Duration::ZERO,
        }
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Seconds of simulated time per tick, as handed to `OnUpdate`.
    pub fn delta_seconds(&self) -> f32 {
        self.tick_duration.as_secs_f32()
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
        self.accumulated_time += self.tick_duration;
    }

    pub fn total_time(&self) -> Duration {
        self.accumulated_time
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ)
    }
}
