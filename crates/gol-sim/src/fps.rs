//! Smoothed frames-per-second estimate.

use std::time::Duration;

/// Each tick folds the instantaneous rate `1000 / dt_ms` into the estimate
/// with weight one half: `fps = 0.5 * (fps + 1000 / dt_ms)`.
#[derive(Debug, Clone, Default)]
pub struct FpsEstimator {
    fps: f64,
    last_tick: Option<Duration>,
}

impl FpsEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference timestamp for the next tick's interval. The
    /// estimate itself is kept.
    pub fn restart(&mut self, now: Duration) {
        self.last_tick = Some(now);
    }

    pub fn record_tick(&mut self, now: Duration) {
        if let Some(prev) = self.last_tick {
            let dt_ms = now.saturating_sub(prev).as_secs_f64() * 1000.0;
            // A zero interval carries no rate information.
            if dt_ms > 0.0 {
                self.fps = 0.5 * (self.fps + 1000.0 / dt_ms);
            }
        }
        self.last_tick = Some(now);
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Estimate rounded to two decimals, as reported
    pub fn rounded(&self) -> f64 {
        (self.fps * 100.0).round() / 100.0
    }
}
