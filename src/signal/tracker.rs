use std::fmt;

use crate::config::TrackerConfig;

use super::peak::PeakObservation;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A run that had reached the milestone is over.
    RunEnded { anchor_index: usize },
    /// A run just crossed the milestone. Fires once per run.
    Stability { anchor_index: usize },
}

impl TrackerEvent {
    pub fn anchor_index(&self) -> usize {
        match self {
            TrackerEvent::RunEnded { anchor_index } | TrackerEvent::Stability { anchor_index } => {
                *anchor_index
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TrackerEvent::RunEnded { .. } => "run-ended",
            TrackerEvent::Stability { .. } => "stability",
        }
    }
}

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.kind(), self.anchor_index())
    }
}

// ---------------------------------------------------------------------------
// TrackerState – pure transition
// ---------------------------------------------------------------------------

/// `anchor_index == None` is EMPTY; `Some(_)` is TRACKING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackerState {
    pub anchor_index: Option<usize>,
    pub repeat_count: u32,
}

impl TrackerState {
    pub const EMPTY: TrackerState = TrackerState {
        anchor_index: None,
        repeat_count: 0,
    };

    pub fn is_tracking(&self) -> bool {
        self.anchor_index.is_some()
    }

    /// Whether the current run has had more than `milestone_count`
    /// observations, the anchoring one included.
    pub fn past_milestone(&self, config: &TrackerConfig) -> bool {
        self.is_tracking() && self.repeat_count.saturating_add(1) > config.milestone_count
    }

    /// The `RunEnded` diagnostic owed when this run stops, if any.
    fn end_run(&self, config: &TrackerConfig) -> Option<TrackerEvent> {
        match self.anchor_index {
            Some(anchor_index) if self.past_milestone(config) => {
                Some(TrackerEvent::RunEnded { anchor_index })
            }
            _ => None,
        }
    }

    fn anchored_at(index: usize) -> Self {
        TrackerState {
            anchor_index: Some(index),
            repeat_count: 0,
        }
    }

    pub fn step(
        self,
        config: &TrackerConfig,
        peak: PeakObservation,
    ) -> (TrackerState, Option<TrackerEvent>) {
        if peak.value < config.value_threshold || peak.index > config.index_ceiling {
            return (TrackerState::EMPTY, self.end_run(config));
        }

        let Some(anchor_index) = self.anchor_index else {
            return (TrackerState::anchored_at(peak.index), None);
        };

        if peak.index.abs_diff(anchor_index) <= config.tolerance {
            let next = TrackerState {
                anchor_index: Some(anchor_index),
                repeat_count: self.repeat_count.saturating_add(1),
            };
            let crossed = next.past_milestone(config) && !self.past_milestone(config);
            let event = crossed.then_some(TrackerEvent::Stability { anchor_index });
            (next, event)
        } else {
            (TrackerState::anchored_at(peak.index), self.end_run(config))
        }
    }
}

// ---------------------------------------------------------------------------
// NearMaxTracker
// ---------------------------------------------------------------------------

/// Owns the tracker state and the peak diagnostic counter.
pub struct NearMaxTracker {
    config: TrackerConfig,
    state: TrackerState,
    feeds: u64,
}

impl NearMaxTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            config: config.clone(),
            state: TrackerState::EMPTY,
            feeds: 0,
        }
    }

    pub fn feed(&mut self, value: f64, index: usize) -> Option<TrackerEvent> {
        self.feeds += 1;
        if self.config.report_every > 0 && self.feeds % self.config.report_every == 0 {
            log::debug!("peak value={value:.2} index={index}");
        }

        let (next, event) = self.state.step(&self.config, PeakObservation { index, value });
        self.state = next;
        event
    }

    pub fn feed_peak(&mut self, peak: PeakObservation) -> Option<TrackerEvent> {
        self.feed(peak.value, peak.index)
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.state = TrackerState::EMPTY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> NearMaxTracker {
        NearMaxTracker::new(&TrackerConfig::default())
    }

    fn stable_run(t: &mut NearMaxTracker, index: usize) {
        for _ in 0..5 {
            t.feed(20.0, index);
        }
        assert!(t.state().past_milestone(t.config()));
    }

    #[test]
    fn five_near_same_peaks_emit_stability_once() {
        let mut t = tracker();
        let events: Vec<_> = (0..5).map(|_| t.feed(20.0, 5)).collect();
        assert_eq!(
            events,
            vec![
                None,
                None,
                None,
                None,
                Some(TrackerEvent::Stability { anchor_index: 5 })
            ]
        );
        assert_eq!(t.state().repeat_count, 4);
        // Edge triggered: no repeat while the run continues.
        assert_eq!(t.feed(20.0, 5), None);
        assert_eq!(t.feed(20.0, 6), None);
        assert_eq!(t.state().repeat_count, 6);
    }

    #[test]
    fn anchor_stays_pinned_while_within_tolerance() {
        let mut t = tracker();
        t.feed(20.0, 5);
        t.feed(20.0, 7);
        t.feed(20.0, 3);
        assert_eq!(t.state().anchor_index, Some(5));
        assert_eq!(t.state().repeat_count, 2);
    }

    #[test]
    fn drift_past_tolerance_restarts_without_event_for_short_run() {
        let mut t = tracker();
        assert_eq!(t.feed(20.0, 5), None);
        assert_eq!(t.feed(20.0, 9), None);
        assert_eq!(
            t.state(),
            TrackerState {
                anchor_index: Some(9),
                repeat_count: 0
            }
        );
    }

    #[test]
    fn drift_past_tolerance_ends_stable_run() {
        let mut t = tracker();
        stable_run(&mut t, 5);
        assert_eq!(
            t.feed(20.0, 9),
            Some(TrackerEvent::RunEnded { anchor_index: 5 })
        );
        assert_eq!(t.state().anchor_index, Some(9));
        assert_eq!(t.state().repeat_count, 0);
    }

    #[test]
    fn drift_of_exactly_tolerance_is_same_run() {
        let mut t = tracker();
        t.feed(20.0, 5);
        t.feed(20.0, 7);
        assert_eq!(t.state().anchor_index, Some(5));
        t.feed(20.0, 8);
        assert_eq!(t.state().anchor_index, Some(8));
    }

    #[test]
    fn low_value_resets_to_empty() {
        let mut t = tracker();
        t.feed(20.0, 5);
        t.feed(20.0, 5);
        assert_eq!(t.feed(10.0, 5), None);
        assert_eq!(t.state(), TrackerState::EMPTY);

        stable_run(&mut t, 5);
        assert_eq!(
            t.feed(10.0, 5),
            Some(TrackerEvent::RunEnded { anchor_index: 5 })
        );
        assert_eq!(t.state(), TrackerState::EMPTY);
        // Already empty: nothing further to report.
        assert_eq!(t.feed(10.0, 5), None);
    }

    #[test]
    fn threshold_and_ceiling_boundaries() {
        let mut t = tracker();
        // value == threshold counts as a detection
        t.feed(16.0, 5);
        assert!(t.state().is_tracking());
        t.feed(15.999, 5);
        assert!(!t.state().is_tracking());

        // index == ceiling counts, ceiling + 1 does not
        t.feed(20.0, 20);
        assert_eq!(t.state().anchor_index, Some(20));
        t.feed(20.0, 21);
        assert_eq!(t.state(), TrackerState::EMPTY);
    }

    #[test]
    fn index_above_ceiling_ends_stable_run() {
        let mut t = tracker();
        stable_run(&mut t, 19);
        assert_eq!(
            t.feed(200.0, 21),
            Some(TrackerEvent::RunEnded { anchor_index: 19 })
        );
    }

    #[test]
    fn run_after_reset_can_become_stable_again() {
        let mut t = tracker();
        stable_run(&mut t, 5);
        t.feed(0.0, 0);
        let events: Vec<_> = (0..5).filter_map(|_| t.feed(30.0, 12)).collect();
        assert_eq!(events, vec![TrackerEvent::Stability { anchor_index: 12 }]);
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let config = TrackerConfig {
            value_threshold: 1.0,
            index_ceiling: 100,
            tolerance: 0,
            milestone_count: 1,
            report_every: 0,
        };
        let mut t = NearMaxTracker::new(&config);
        assert_eq!(t.feed(2.0, 50), None);
        assert_eq!(
            t.feed(2.0, 50),
            Some(TrackerEvent::Stability { anchor_index: 50 })
        );
        assert_eq!(
            t.feed(2.0, 51),
            Some(TrackerEvent::RunEnded { anchor_index: 50 })
        );
    }

    #[test]
    fn peak_diagnostic_leaves_transitions_alone() {
        let feeds = [
            (20.0, 5),
            (20.0, 6),
            (20.0, 5),
            (20.0, 4),
            (20.0, 5),
            (20.0, 5),
            (20.0, 9),
            (3.0, 9),
            (30.0, 12),
        ];
        let run = |report_every: u64| {
            let mut t = NearMaxTracker::new(&TrackerConfig {
                report_every,
                ..TrackerConfig::default()
            });
            feeds
                .iter()
                .map(|&(value, index)| (t.feed(value, index), t.state()))
                .collect::<Vec<_>>()
        };

        let silent = run(0);
        assert_eq!(run(1), silent);
        assert_eq!(run(3), silent);
        assert_eq!(silent[4].0, Some(TrackerEvent::Stability { anchor_index: 5 }));
        assert_eq!(silent[6].0, Some(TrackerEvent::RunEnded { anchor_index: 5 }));
    }

    #[test]
    fn step_is_pure() {
        let config = TrackerConfig::default();
        let state = TrackerState {
            anchor_index: Some(5),
            repeat_count: 3,
        };
        let peak = PeakObservation {
            index: 6,
            value: 20.0,
        };
        let (a, ea) = state.step(&config, peak);
        let (b, eb) = state.step(&config, peak);
        assert_eq!((a, ea), (b, eb));
        assert_eq!(ea, Some(TrackerEvent::Stability { anchor_index: 5 }));
    }

    #[test]
    fn event_display() {
        let e = TrackerEvent::Stability { anchor_index: 3 };
        assert_eq!(e.to_string(), "stability @ 3");
    }
}
