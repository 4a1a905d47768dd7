use std::path::Path;

use anyhow::{Context, Result};

use binwatch::record::TickRecorder;
use binwatch::{PipelineConfig, Session};

use crate::state::DynSource;

// ---------------------------------------------------------------------------
// Headless loop – no window, events go to the log
// ---------------------------------------------------------------------------

/// Tick until the source closes or `max_ticks` is reached.
///
/// End of stream finishes the run normally; any other session error is
/// returned.
pub fn run(
    config: PipelineConfig,
    source: DynSource,
    record: Option<&Path>,
    max_ticks: Option<u64>,
) -> Result<()> {
    let bins = config.bins;
    let mut session = Session::start(config, source).context("starting session")?;
    let mut recorder = record
        .map(|path| TickRecorder::create(path, bins))
        .transpose()?;

    let mut events = 0u64;
    loop {
        if max_ticks.is_some_and(|max| session.ticks() >= max) {
            break;
        }
        let tick = match session.tick() {
            Ok(tick) => tick,
            Err(e) if e.is_closed() => {
                log::info!("Source closed after {} ticks", session.ticks());
                break;
            }
            Err(e) => return Err(e).context("reading sensor"),
        };
        if tick.event.is_some() {
            events += 1;
        }
        if let Some(recorder) = recorder.as_mut() {
            recorder.record(&tick)?;
        }
    }

    if let Some(recorder) = recorder {
        let rows = recorder.rows();
        recorder.finish()?;
        log::info!("Recorded {rows} ticks");
    }
    log::info!(
        "{} ticks, {} events, {} bad lines, {:.1} frames/s at exit",
        session.ticks(),
        events,
        session.lines_rejected(),
        session.rate()
    );
    Ok(())
}
