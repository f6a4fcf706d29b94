//! Wall-clock timing for rebuild measurement and loop reporting

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from a fixed starting instant
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now
    pub fn start_new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Tick counter with wall-clock throughput reporting
///
/// Counts completed simulation ticks and relates them to real time for
/// end-of-run summaries. The fixed timestep itself comes from
/// configuration, not from this type.
#[derive(Debug)]
pub struct Timer {
    started: Instant,
    ticks: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a timer with zero completed ticks
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks: 0,
        }
    }

    /// Record one completed tick
    pub fn update(&mut self) {
        self.ticks += 1;
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Wall-clock time since the timer was created
    pub fn total_time(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average completed ticks per wall-clock second
    ///
    /// Zero before any measurable time has passed.
    pub fn average_tps(&self) -> f32 {
        let secs = self.started.elapsed().as_secs_f32();
        if secs > 0.0 {
            self.ticks as f32 / secs
        } else {
            0.0
        }
    }
}
