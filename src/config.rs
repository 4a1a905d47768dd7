use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Tracker thresholds
// ---------------------------------------------------------------------------

/// Thresholds for the near-max hysteresis machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Peaks with a smoothed amplitude strictly below this are non-detections.
    pub value_threshold: f64,
    /// Peaks at an index strictly above this are non-detections.
    pub index_ceiling: usize,
    /// Maximum drift from the anchor still counted as the same run.
    pub tolerance: usize,
    /// A run whose observation count exceeds this is reported as stable.
    pub milestone_count: u32,
    /// Emit a peak diagnostic every this many feeds (0 disables it).
    pub report_every: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            value_threshold: 16.0,
            index_ceiling: 20,
            tolerance: 2,
            milestone_count: 4,
            report_every: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Background mode
// ---------------------------------------------------------------------------

/// What the fast trace is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Subtract the slow running baseline (tracks ambient drift).
    #[default]
    Running,
    /// Subtract the fixed calibration baseline.
    Calibrated,
}

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// Immutable settings handed to every component at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of bins in every frame.
    pub bins: usize,
    /// Literal token that must open every wire line.
    pub marker: String,
    /// Decay of the fast trace.
    pub alpha_fast: f64,
    /// Decay of the slow baseline; must be closer to 1 than `alpha_fast`.
    pub alpha_slow: f64,
    /// Upper clip of the transformed signal.
    pub clip_max: f64,
    /// How long calibration keeps reading frames.
    pub calibration_secs: f64,
    pub background: BackgroundMode,
    /// Sliding window of the rate monitor.
    pub rate_window_secs: f64,
    /// Log a sample count every this many frames (0 disables it).
    pub sample_log_interval: u64,
    pub tracker: TrackerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bins: 128,
            marker: "start".to_string(),
            alpha_fast: 0.8,
            alpha_slow: 0.99,
            clip_max: 256.0,
            calibration_secs: 2.0,
            background: BackgroundMode::Running,
            rate_window_secs: 1.0,
            sample_log_interval: 100,
            tracker: TrackerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.bins == 0 {
            return invalid("bins must be at least 1".into());
        }
        if self.marker.is_empty() || self.marker.contains(',') {
            return invalid(format!("marker '{}' must be a non-empty field", self.marker));
        }
        for (name, alpha) in [("alpha_fast", self.alpha_fast), ("alpha_slow", self.alpha_slow)] {
            if !(0.0..1.0).contains(&alpha) {
                return invalid(format!("{name} = {alpha} is outside [0, 1)"));
            }
        }
        if self.alpha_slow <= self.alpha_fast {
            return invalid(format!(
                "alpha_slow ({}) must be closer to 1 than alpha_fast ({})",
                self.alpha_slow, self.alpha_fast
            ));
        }
        if self.clip_max.is_nan() || self.clip_max <= 0.0 {
            return invalid(format!("clip_max = {} must be positive", self.clip_max));
        }
        if !self.calibration_secs.is_finite() || self.calibration_secs < 0.0 {
            return invalid(format!(
                "calibration_secs = {} must be a finite non-negative number",
                self.calibration_secs
            ));
        }
        if !self.rate_window_secs.is_finite() || self.rate_window_secs <= 0.0 {
            return invalid(format!(
                "rate_window_secs = {} must be positive",
                self.rate_window_secs
            ));
        }
        if self.tracker.milestone_count == 0 {
            return invalid("tracker.milestone_count must be at least 1".into());
        }
        Ok(())
    }

    pub fn calibration_duration(&self) -> Duration {
        Duration::from_secs_f64(self.calibration_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs_f64(self.rate_window_secs)
    }
}
