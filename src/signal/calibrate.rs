use std::time::{Duration, Instant};

use crate::error::TransportError;

use super::frame::Frame;
use super::reader::{FrameReader, LineSource};

// ---------------------------------------------------------------------------
// Baseline – calibration result
// ---------------------------------------------------------------------------

/// Elementwise mean of the frames seen during calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub values: Vec<f64>,
    /// Number of frames averaged (always at least 1).
    pub samples: u64,
}

// ---------------------------------------------------------------------------
// Calibration – running sum accumulator
// ---------------------------------------------------------------------------

/// Running elementwise sum, seeded with one mandatory frame so the mean is
/// always defined.
#[derive(Debug, Clone)]
pub struct Calibration {
    sum: Vec<f64>,
    count: u64,
}

impl Calibration {
    pub fn new(first: &Frame) -> Self {
        Self {
            sum: first.iter_f64().collect(),
            count: 1,
        }
    }

    pub fn push(&mut self, frame: &Frame) {
        for (acc, v) in self.sum.iter_mut().zip(frame.iter_f64()) {
            *acc += v;
        }
        self.count += 1;
    }

    pub fn finish(self) -> Baseline {
        let n = self.count as f64;
        Baseline {
            values: self.sum.into_iter().map(|s| s / n).collect(),
            samples: self.count,
        }
    }
}

// ---------------------------------------------------------------------------
// Calibrator – wall-clock driven
// ---------------------------------------------------------------------------

/// Read frames for at least `duration` and average them.
///
/// One frame is always read first, so a zero duration gives a one-sample
/// baseline.
pub fn run<S: LineSource>(
    reader: &mut FrameReader<S>,
    duration: Duration,
) -> Result<Baseline, TransportError> {
    log::info!("Calibrating for {:.2} seconds", duration.as_secs_f64());
    let end = Instant::now() + duration;

    let mut calibration = Calibration::new(&reader.read_frame()?);
    while Instant::now() < end {
        calibration.push(&reader.read_frame()?);
    }

    let baseline = calibration.finish();
    log::info!("Calibrated over {} samples", baseline.samples);
    log::debug!("Average:\n{:?}", baseline.values);
    Ok(baseline)
}
