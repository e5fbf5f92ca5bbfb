use std::time::{Duration, Instant};

use tracing::debug;

/// Times a named section of work and reports it at DEBUG level.
pub struct Stopwatch {
    start_time: Instant,
    section: &'static str,
}

impl Stopwatch {
    pub fn new(section: &'static str) -> Self {
        Self {
            start_time: Instant::now(),
            section,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn report(&self) {
        debug!(
            section = self.section,
            elapsed_ms = self.elapsed().as_secs_f64() * 1000.0,
            "section finished"
        );
    }

    /// Also reports how many `unit`s the section processed.
    pub fn report_count(&self, count: usize, unit: &'static str) {
        debug!(
            section = self.section,
            elapsed_ms = self.elapsed().as_secs_f64() * 1000.0,
            count,
            unit,
            "section finished"
        );
    }
}
