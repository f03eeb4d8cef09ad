//! Process-wide debug flag.
//!
//! The original implementation stashed a debug boolean onto the `unittest`
//! module so the test harness could flip it on for a run. Here it's an
//! explicit `AtomicBool` (spec §9): unrecognized escape/CSI bytes, mode
//! codes, and OSC commands all check this flag via [`is_enabled`] before
//! emitting a `tracing::debug!` event. The text-mode framebuffer dump
//! (`dump::render`/`render_styled`) is unrelated to this flag — it's
//! always available, gated only on whether the caller's sink is a
//! terminal.

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable debug-level diagnostics for unknown/malformed emulator input.
pub fn enable() {
    DEBUG.store(true, Ordering::Relaxed);
}

/// Disable debug-level diagnostics.
pub fn disable() {
    DEBUG.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_the_shared_flag() {
        let previous = is_enabled();
        enable();
        assert!(is_enabled());
        disable();
        assert!(!is_enabled());
        if previous {
            enable();
        }
    }
}
