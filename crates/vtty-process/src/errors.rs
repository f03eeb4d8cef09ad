use thiserror::Error;

/// Failures from spawning or interacting with a child process.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open a pty: {0}")]
    Pty(String),

    #[error("unsupported terminal emulation requested for pty mirror: {0}")]
    UnsupportedEmulation(#[from] vtty_core::UnsupportedEmulation),

    #[error("write to child stdin failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("child process is no longer running")]
    NotRunning,
}
