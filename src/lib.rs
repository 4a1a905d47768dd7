//! Peak tracking for multi-bin intensity sensors streaming over a serial link.
//!
//! [`session::Session`] wires the stages in [`signal`] together; binaries
//! only supply a line source and consume [`session::Tick`]s.

pub mod config;
pub mod error;
pub mod record;
pub mod session;
pub mod signal;

pub use config::{BackgroundMode, PipelineConfig, TrackerConfig};
pub use error::{ConfigError, SessionError, TransportError};
pub use session::{Session, Tick};
pub use signal::tracker::TrackerEvent;
