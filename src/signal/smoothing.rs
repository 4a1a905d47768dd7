use crate::config::{BackgroundMode, PipelineConfig};

use super::calibrate::Baseline;
use super::frame::Frame;

// ---------------------------------------------------------------------------
// SmoothingState – the two exponential moving averages
// ---------------------------------------------------------------------------

/// Fast trace and slow running baseline, one value per bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingState {
    pub fast_trace: Vec<f64>,
    pub slow_baseline: Vec<f64>,
}

impl SmoothingState {
    /// Both traces start at the first frame, so there is no ramp up from zero.
    pub fn from_frame(first: &Frame) -> Self {
        let values: Vec<f64> = first.iter_f64().collect();
        Self {
            fast_trace: values.clone(),
            slow_baseline: values,
        }
    }

    /// Fold one frame into both averages.
    pub fn advance(&mut self, frame: &Frame, alpha_fast: f64, alpha_slow: f64) {
        for ((fast, slow), x) in self
            .fast_trace
            .iter_mut()
            .zip(self.slow_baseline.iter_mut())
            .zip(frame.iter_f64())
        {
            *fast = *fast * alpha_fast + x * (1.0 - alpha_fast);
            *slow = *slow * alpha_slow + x * (1.0 - alpha_slow);
        }
    }
}

/// `clip(trace - background, 0, clip_max)`, elementwise.
pub fn subtract_clipped(trace: &[f64], background: &[f64], clip_max: f64) -> Vec<f64> {
    trace
        .iter()
        .zip(background)
        .map(|(t, b)| (t - b).clamp(0.0, clip_max))
        .collect()
}

// ---------------------------------------------------------------------------
// SmoothingEngine
// ---------------------------------------------------------------------------

pub struct SmoothingEngine {
    alpha_fast: f64,
    alpha_slow: f64,
    clip_max: f64,
    background: BackgroundMode,
    state: SmoothingState,
}

impl SmoothingEngine {
    pub fn new(config: &PipelineConfig, first: &Frame) -> Self {
        Self {
            alpha_fast: config.alpha_fast,
            alpha_slow: config.alpha_slow,
            clip_max: config.clip_max,
            background: config.background,
            state: SmoothingState::from_frame(first),
        }
    }

    /// Advance both traces and return the background-subtracted signal.
    ///
    /// `calibration` is only consulted in [`BackgroundMode::Calibrated`].
    pub fn update(&mut self, frame: &Frame, calibration: &Baseline) -> Vec<f64> {
        self.state.advance(frame, self.alpha_fast, self.alpha_slow);
        let background = match self.background {
            BackgroundMode::Running => &self.state.slow_baseline,
            BackgroundMode::Calibrated => &calibration.values,
        };
        subtract_clipped(&self.state.fast_trace, background, self.clip_max)
    }

    pub fn fast_trace(&self) -> &[f64] {
        &self.state.fast_trace
    }

    pub fn slow_baseline(&self) -> &[f64] {
        &self.state.slow_baseline
    }
}
