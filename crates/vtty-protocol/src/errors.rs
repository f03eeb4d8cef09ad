use thiserror::Error;

/// Failures from the length-prefixed stub control channel (spec §4.10).
#[derive(Debug, Error)]
pub enum StubError {
    #[error("stub connection closed by the peer")]
    Closed,

    #[error("message of {0} bytes exceeds the 4-byte length prefix")]
    MessageTooLarge(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
