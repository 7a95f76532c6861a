//! Performance timings, collected only when `InputOptions::perf` is set
//! (`getTimings`, present on the handle only under that flag).

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// One named phase's elapsed wall time, in milliseconds - the unit
/// `getTimings` callers expect from `--perf` output.
#[derive(Debug, Clone)]
pub struct Timing {
    pub label: &'static str,
    pub millis: f64,
}

/// Accumulates phase timings across a handle's lifetime (one build, any
/// number of generates). Cheap to clone-share via `Arc` since it is only
/// ever written from the single-threaded orchestrator between suspensions.
#[derive(Default)]
pub struct Timings {
    entries: Mutex<Vec<Timing>>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &'static str, elapsed: Duration) {
        self.entries.lock().push(Timing { label, millis: elapsed.as_secs_f64() * 1000.0 });
    }

    /// Times a synchronous closure and records it under `label`.
    pub fn time_sync<T>(&self, label: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.record(label, start.elapsed());
        result
    }

    pub fn snapshot(&self) -> Vec<Timing> {
        self.entries.lock().clone()
    }
}
