use std::io::BufRead;

use crate::config::PipelineConfig;
use crate::error::TransportError;

use super::frame::{parse_line, Frame};

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// A blocking source of raw text lines.
///
/// Appends the next line (terminator included) to `buf` and returns the
/// number of bytes read; `Ok(0)` means the source is exhausted.
pub trait LineSource {
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

/// Turns a line source into an endless sequence of validated frames.
pub struct FrameReader<S> {
    source: S,
    marker: String,
    bins: usize,
    sample_log_interval: u64,
    line: String,
    frames_read: u64,
    lines_rejected: u64,
}

impl<S: LineSource> FrameReader<S> {
    pub fn new(config: &PipelineConfig, source: S) -> Self {
        Self {
            source,
            marker: config.marker.clone(),
            bins: config.bins,
            sample_log_interval: config.sample_log_interval,
            line: String::new(),
            frames_read: 0,
            lines_rejected: 0,
        }
    }

    /// Block until a well-formed frame arrives.
    ///
    /// Malformed lines are logged and skipped. Only transport failures
    /// (I/O errors, end of stream) are returned.
    pub fn read_frame(&mut self) -> Result<Frame, TransportError> {
        loop {
            self.line.clear();
            let n = match self.source.read_line(&mut self.line) {
                Ok(n) => n,
                // Mid-stream garbage that is not even UTF-8 is a bad line, not a dead link.
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.lines_rejected += 1;
                    log::warn!("Bad line: {e}");
                    continue;
                }
                Err(e) => return Err(TransportError::Io(e)),
            };
            if n == 0 {
                return Err(TransportError::Closed);
            }

            match parse_line(&self.line, &self.marker, self.bins) {
                Ok(frame) => {
                    self.frames_read += 1;
                    if self.sample_log_interval > 0 && self.frames_read % self.sample_log_interval == 0 {
                        log::info!("{} samples returned", self.frames_read);
                    }
                    return Ok(frame);
                }
                Err(reason) => {
                    self.lines_rejected += 1;
                    log::warn!("Bad read: {reason}");
                }
            }
        }
    }

    /// Frames delivered so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Lines discarded as malformed so far.
    pub fn lines_rejected(&self) -> u64 {
        self.lines_rejected
    }
}
