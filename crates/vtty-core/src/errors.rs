//! Crate-level error types (spec §5, §7).

use thiserror::Error;

/// Returned by [`crate::Vtty::new`] when the requested emulation name
/// doesn't match a known profile.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported terminal emulation: {name:?}")]
pub struct UnsupportedEmulation {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_quotes_the_offending_name() {
        let err = UnsupportedEmulation {
            name: "vt220".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported terminal emulation: \"vt220\"");
    }
}
