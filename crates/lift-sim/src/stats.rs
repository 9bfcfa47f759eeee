//! Aggregate challenge statistics.

/// Score-relevant aggregates, updated incrementally by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Simulated seconds since the challenge started.
    pub elapsed:             f64,
    /// Passengers delivered to their destination.
    pub transported:         u64,
    pub transported_per_sec: f64,
    /// Mean of (exit time − spawn time) over all transported passengers.
    pub avg_wait:            f64,
    pub max_wait:            f64,
    /// Completed stops summed over every elevator.
    pub move_count:          u64,
}

impl Statistics {
    /// Fold one delivered passenger's wait into the aggregates.
    ///
    /// The average is a running update, `avg' = (avg·(n−1) + wait) / n`;
    /// no per-passenger history is kept.
    pub fn record_transport(&mut self, wait: f64) {
        self.transported += 1;
        let n = self.transported as f64;
        self.max_wait = self.max_wait.max(wait);
        self.avg_wait = (self.avg_wait * (n - 1.0) + wait) / n;
    }

    /// Recompute the derived fields for the current time and move total.
    pub fn refresh(&mut self, elapsed: f64, move_count: u64) {
        self.elapsed = elapsed;
        self.move_count = move_count;
        self.transported_per_sec = if elapsed > 0.0 {
            self.transported as f64 / elapsed
        } else {
            0.0
        };
    }
}
