use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use binwatch::{PipelineConfig, Session, Tick, TrackerEvent};

/// Events kept for the side panel.
const EVENT_HISTORY: usize = 64;

pub type DynSource = Box<dyn BufRead>;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PipelineConfig,

    /// Running session (None until a source is opened, or after it failed).
    pub session: Option<Session<DynSource>>,

    /// Human-readable name of the current source.
    pub source_label: Option<String>,

    /// Output of the most recent tick.
    pub last_tick: Option<Tick>,

    /// Most recent tracker events, newest first, with their tick number.
    pub events: VecDeque<(u64, TrackerEvent)>,

    /// Frames per second as of the last tick.
    pub rate: f64,

    /// Whether ticking is suspended.
    pub paused: bool,

    /// Also draw fast trace, slow baseline and calibration baseline.
    pub show_traces: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            session: None,
            source_label: None,
            last_tick: None,
            events: VecDeque::with_capacity(EVENT_HISTORY),
            rate: 0.0,
            paused: false,
            show_traces: false,
            status_message: None,
        }
    }

    /// Start a session on an already opened source. Blocks for calibration.
    pub fn set_source(&mut self, label: String, source: DynSource) {
        self.session = None;
        self.last_tick = None;
        self.events.clear();

        match Session::start(self.config.clone(), source) {
            Ok(session) => {
                log::info!(
                    "Session started on {label}, baseline over {} samples",
                    session.baseline().samples
                );
                self.session = Some(session);
                self.source_label = Some(label);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to start session on {label}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.source_label = None;
            }
        }
    }

    /// Open a capture file or device node and start a session on it.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let source = open_source(path)?;
        self.set_source(path.display().to_string(), source);
        Ok(())
    }

    /// Advance the session by one frame. A transport error ends the session.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.tick() {
            Ok(tick) => {
                if let Some(event) = tick.event {
                    if self.events.len() == EVENT_HISTORY {
                        self.events.pop_back();
                    }
                    self.events.push_front((session.ticks(), event));
                }
                self.rate = session.rate();
                self.last_tick = Some(tick);
            }
            Err(e) => {
                log::error!("Session ended: {e}");
                self.status_message = Some(format!("Session ended: {e}"));
                self.session = None;
            }
        }
    }

    pub fn recalibrate(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let result = session.recalibrate().map(|baseline| baseline.samples);
        match result {
            Ok(samples) => {
                log::info!("Recalibrated over {samples} samples");
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Recalibration failed: {e}");
                self.status_message = Some(format!("Recalibration failed: {e}"));
                self.session = None;
            }
        }
    }
}

/// `-` is stdin; anything else is opened as a file (capture or device node).
pub fn open_source(path: &Path) -> Result<DynSource> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening sensor source {}", path.display()))?;
    Ok(Box::new(std::io::BufReader::new(file)))
}
