use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// RateMonitor – frames/second over a sliding window
// ---------------------------------------------------------------------------

/// Diagnostic-only frame rate estimate. Not on the data path.
#[derive(Debug, Clone)]
pub struct RateMonitor {
    window: Duration,
    arrivals: VecDeque<Instant>,
}

impl RateMonitor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            arrivals: VecDeque::new(),
        }
    }

    /// Record one frame arriving now.
    pub fn record(&mut self) {
        self.record_at(Instant::now());
    }

    /// Record one frame arriving at `at`. Arrivals must be non-decreasing.
    pub fn record_at(&mut self, at: Instant) {
        self.arrivals.push_back(at);
        self.expire(at);
    }

    /// Frames per second observed over the window ending now.
    pub fn rate(&mut self) -> f64 {
        self.rate_at(Instant::now())
    }

    pub fn rate_at(&mut self, now: Instant) -> f64 {
        self.expire(now);
        let secs = self.window.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.arrivals.len() as f64 / secs
    }

    /// Frames currently inside the window.
    pub fn count(&self) -> usize {
        self.arrivals.len()
    }

    fn expire(&mut self, now: Instant) {
        while let Some(&oldest) = self.arrivals.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.arrivals.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_arrivals_inside_window() {
        let start = Instant::now();
        let mut monitor = RateMonitor::new(Duration::from_secs(1));
        for i in 0..10 {
            monitor.record_at(start + Duration::from_millis(i * 50));
        }
        let rate = monitor.rate_at(start + Duration::from_millis(500));
        assert!((rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn old_arrivals_fall_out() {
        let start = Instant::now();
        let mut monitor = RateMonitor::new(Duration::from_millis(500));
        monitor.record_at(start);
        monitor.record_at(start + Duration::from_millis(100));
        monitor.record_at(start + Duration::from_millis(900));
        assert_eq!(monitor.count(), 1);
        let rate = monitor.rate_at(start + Duration::from_millis(2000));
        assert_eq!(rate, 0.0);
        assert_eq!(monitor.count(), 0);
    }
}
