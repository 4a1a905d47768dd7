// ---------------------------------------------------------------------------
// PeakObservation
// ---------------------------------------------------------------------------

/// The dominant bin of one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakObservation {
    pub index: usize,
    /// Smoothed absolute amplitude at `index` (read from the fast trace).
    pub value: f64,
}

/// Index of the largest element; the lowest index wins ties.
///
/// Returns `None` for an empty slice.
pub fn stable_argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, top)| v > top) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Locate the peak of `transformed` and report its amplitude from `fast_trace`.
pub fn extract(transformed: &[f64], fast_trace: &[f64]) -> Option<PeakObservation> {
    let index = stable_argmax(transformed)?;
    let value = *fast_trace.get(index)?;
    Some(PeakObservation { index, value })
}
