//! Rate limit for statistics notifications.

/// Upper bound on statistics notifications per simulated second.
pub const MAX_STATS_PER_SEC: f64 = 30.0;

/// Lets a notification through at most once per `1 / max_per_sec`
/// simulated seconds.  Keyed purely off elapsed simulation time.
#[derive(Debug, Clone)]
pub struct StatsThrottle {
    min_interval: f64,
    last:         Option<f64>,
}

impl StatsThrottle {
    pub fn new(max_per_sec: f64) -> Self {
        Self { min_interval: 1.0 / max_per_sec, last: None }
    }

    /// `true` if a notification may be emitted at `now`; records it if so.
    pub fn allow(&mut self, now: f64) -> bool {
        let ready = match self.last {
            None       => true,
            // Tolerance absorbs rounding in an accumulated clock.
            Some(last) => now - last >= self.min_interval - 1e-9,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

impl Default for StatsThrottle {
    fn default() -> Self {
        Self::new(MAX_STATS_PER_SEC)
    }
}
