use thiserror::Error;

// ---------------------------------------------------------------------------
// Transport errors – fatal for the session
// ---------------------------------------------------------------------------

/// The line source failed or went away. No reconnect is attempted.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("reading from sensor link: {0}")]
    Io(#[from] std::io::Error),
    #[error("sensor link closed (end of stream)")]
    Closed,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Frame rejection reasons – logged by the reader, never surfaced
// ---------------------------------------------------------------------------

/// Why a raw line was not turned into a [`Frame`](crate::signal::frame::Frame).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("line does not start with marker '{marker}'")]
    MissingMarker { marker: String },
    #[error("field {position}: '{field}' is not a non-negative integer")]
    NotAnInteger { position: usize, field: String },
    #[error("expected {expected} entries, got {found}")]
    WrongLength { expected: usize, found: usize },
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Why a [`Session`](crate::session::Session) could not start or advance.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("update over {bins} bins produced no peak")]
    NoPeak { bins: usize },
}

impl SessionError {
    /// The source reached end of stream.
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionError::Transport(TransportError::Closed))
    }
}
