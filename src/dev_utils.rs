// src/dev_utils.rs

use std::time::{Duration, Instant};

/// A simple RAII timer for profiling blocks of code.
/// When created, it records the start time. When it is dropped, the elapsed
/// time is written to the `trace` log.
#[derive(Debug)]
pub struct BlockTimer {
    name: String,
    start: Instant,
}

impl BlockTimer {
    /// Creates a new timer and starts it immediately.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for BlockTimer {
    fn drop(&mut self) {
        log::trace!("PROFILE [{}]: {} µs", self.name, self.start.elapsed().as_micros());
    }
}
