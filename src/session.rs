use crate::config::PipelineConfig;
use crate::error::{SessionError, TransportError};
use crate::signal::calibrate::{self, Baseline};
use crate::signal::peak::{self, PeakObservation};
use crate::signal::rate::RateMonitor;
use crate::signal::reader::{FrameReader, LineSource};
use crate::signal::smoothing::SmoothingEngine;
use crate::signal::tracker::{NearMaxTracker, TrackerEvent};

// ---------------------------------------------------------------------------
// Tick – everything a renderer needs from one update
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Background-subtracted, clipped signal, one value per bin.
    pub transformed: Vec<f64>,
    pub peak: PeakObservation,
    pub event: Option<TrackerEvent>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One sensor session: calibration followed by per-tick updates.
///
/// Every call that reads blocks on the line source; a silent device blocks
/// the caller indefinitely.
pub struct Session<S> {
    config: PipelineConfig,
    reader: FrameReader<S>,
    baseline: Baseline,
    smoothing: SmoothingEngine,
    tracker: NearMaxTracker,
    rate: RateMonitor,
    ticks: u64,
}

impl<S: LineSource> Session<S> {
    /// Validate `config`, calibrate, then seed the smoothing engine from the
    /// next frame.
    pub fn start(config: PipelineConfig, source: S) -> Result<Self, SessionError> {
        config.validate()?;
        let mut reader = FrameReader::new(&config, source);
        let baseline = calibrate::run(&mut reader, config.calibration_duration())?;
        let first = reader.read_frame()?;
        log::debug!("First frame:\n{first}");

        let smoothing = SmoothingEngine::new(&config, &first);
        let tracker = NearMaxTracker::new(&config.tracker);
        let rate = RateMonitor::new(config.rate_window());

        Ok(Session {
            config,
            reader,
            baseline,
            smoothing,
            tracker,
            rate,
            ticks: 0,
        })
    }

    /// Read one frame and push it through the whole pipeline.
    pub fn tick(&mut self) -> Result<Tick, SessionError> {
        let frame = self.reader.read_frame()?;
        self.rate.record();
        self.ticks += 1;

        let transformed = self.smoothing.update(&frame, &self.baseline);
        let peak = peak::extract(&transformed, self.smoothing.fast_trace()).ok_or(
            SessionError::NoPeak {
                bins: self.config.bins,
            },
        )?;
        let event = self.tracker.feed_peak(peak);
        if let Some(event) = event {
            log::info!("{event} (peak value {:.1})", peak.value);
        }

        Ok(Tick {
            transformed,
            peak,
            event,
        })
    }

    /// Replace the baseline with a fresh calibration. Tracker state is reset.
    pub fn recalibrate(&mut self) -> Result<&Baseline, TransportError> {
        self.baseline = calibrate::run(&mut self.reader, self.config.calibration_duration())?;
        self.tracker.reset();
        Ok(&self.baseline)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn smoothing(&self) -> &SmoothingEngine {
        &self.smoothing
    }

    pub fn tracker(&self) -> &NearMaxTracker {
        &self.tracker
    }

    /// Observed frames per second.
    pub fn rate(&mut self) -> f64 {
        self.rate.rate()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames_read(&self) -> u64 {
        self.reader.frames_read()
    }

    pub fn lines_rejected(&self) -> u64 {
        self.reader.lines_rejected()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::BackgroundMode;
    use crate::error::ConfigError;
    use crate::signal::tracker::TrackerState;

    fn config() -> PipelineConfig {
        PipelineConfig {
            bins: 8,
            calibration_secs: 0.0,
            ..PipelineConfig::default()
        }
    }

    fn line(values: &[u32]) -> String {
        let fields: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!("start,{}\n", fields.join(","))
    }

    #[test]
    fn burst_on_one_bin_becomes_stable_event() {
        let quiet = [10; 8];
        let mut burst = [10; 8];
        burst[5] = 250;

        let mut input = line(&quiet) + &line(&quiet);
        for _ in 0..20 {
            input += &line(&burst);
        }

        let mut session = Session::start(config(), Cursor::new(input)).unwrap();
        assert_eq!(session.baseline().samples, 1);
        assert_eq!(session.frames_read(), 2);

        let mut events = Vec::new();
        for _ in 0..20 {
            let tick = session.tick().unwrap();
            assert_eq!(tick.transformed.len(), 8);
            assert_eq!(tick.peak.index, 5);
            events.extend(tick.event);
        }
        assert!(session.tick().is_err_and(|e| e.is_closed()));
        assert_eq!(events, vec![TrackerEvent::Stability { anchor_index: 5 }]);
        assert_eq!(session.ticks(), 20);
    }

    #[test]
    fn recalibrate_replaces_baseline() {
        let input = line(&[1; 8]) + &line(&[1; 8]) + &line(&[9; 8]);
        let config = PipelineConfig {
            background: BackgroundMode::Calibrated,
            ..config()
        };
        let mut session = Session::start(config, Cursor::new(input)).unwrap();
        assert_eq!(session.baseline().values, vec![1.0; 8]);
        let baseline = session.recalibrate().unwrap();
        assert_eq!(baseline.values, vec![9.0; 8]);
        assert_eq!(session.tracker().state(), TrackerState::EMPTY);
    }

    #[test]
    fn empty_source_fails_to_start() {
        assert!(matches!(
            Session::start(config(), Cursor::new("")),
            Err(SessionError::Transport(TransportError::Closed))
        ));
    }

    #[test]
    fn zero_bins_is_rejected_before_reading() {
        let config = PipelineConfig {
            bins: 0,
            ..config()
        };
        let result = Session::start(config, Cursor::new("start\nstart\nstart\n"));
        assert!(matches!(
            result,
            Err(SessionError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn runaway_smoothing_factor_is_rejected() {
        let config = PipelineConfig {
            alpha_fast: 1.5,
            alpha_slow: 1.6,
            ..config()
        };
        let input = line(&[1; 8]).repeat(3);
        assert!(matches!(
            Session::start(config, Cursor::new(input)),
            Err(SessionError::Config(ConfigError::Invalid(_)))
        ));
    }
}
