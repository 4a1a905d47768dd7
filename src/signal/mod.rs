/// Signal layer: frame parsing, calibration, smoothing, peak tracking.
///
/// Architecture:
/// ```text
///   "start,12,40,...\n"
///        │
///        ▼
///   ┌─────────────┐
///   │   reader     │  line → Frame (malformed lines skipped)
///   └─────────────┘
///        │
///        ├──────────────► calibrate   (session start) → Baseline
///        ▼
///   ┌─────────────┐
///   │  smoothing   │  fast / slow EMA → clipped difference
///   └─────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │    peak      │  stable argmax → PeakObservation
///   └─────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │   tracker    │  hysteresis → Option<TrackerEvent>
///   └─────────────┘
/// ```
///
/// `rate` sits beside the reader and only feeds diagnostics.

pub mod calibrate;
pub mod frame;
pub mod peak;
pub mod rate;
pub mod reader;
pub mod smoothing;
pub mod tracker;
