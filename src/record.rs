use std::io::Write;

use anyhow::{Context, Result};

use crate::session::Tick;

// ---------------------------------------------------------------------------
// Tick recorder (CSV)
// ---------------------------------------------------------------------------

/// Writes one CSV row per tick:
/// `tick, peak_index, peak_value, event, anchor_index, t0 .. t{bins-1}`.
pub struct TickRecorder<W: Write> {
    writer: csv::Writer<W>,
    bins: usize,
    rows: u64,
}

impl TickRecorder<std::fs::File> {
    pub fn create(path: &std::path::Path, bins: usize) -> Result<Self> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating recording {}", path.display()))?;
        Self::new(file, bins)
    }
}

impl<W: Write> TickRecorder<W> {
    pub fn new(inner: W, bins: usize) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        let mut header: Vec<String> = ["tick", "peak_index", "peak_value", "event", "anchor_index"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        header.extend((0..bins).map(|i| format!("t{i}")));
        writer.write_record(&header).context("writing CSV header")?;
        Ok(Self {
            writer,
            bins,
            rows: 0,
        })
    }

    pub fn record(&mut self, tick: &Tick) -> Result<()> {
        let (event, anchor) = match tick.event {
            Some(e) => (e.kind().to_string(), e.anchor_index().to_string()),
            None => (String::new(), String::new()),
        };
        let mut row = Vec::with_capacity(5 + self.bins);
        row.push(self.rows.to_string());
        row.push(tick.peak.index.to_string());
        row.push(format!("{:.3}", tick.peak.value));
        row.push(event);
        row.push(anchor);
        row.extend(tick.transformed.iter().map(|v| format!("{v:.3}")));

        self.writer
            .write_record(&row)
            .with_context(|| format!("writing CSV row {}", self.rows))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("flushing recording")?;
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("finishing recording: {}", e.error()))
    }
}
