//! Framebuffer snapshot assertions for use inside `#[test]` functions
//! (spec §4.1, §6, grounded in the original `_assertEqual_FrameBuffer`
//! custom equality function registered with `unittest`).
//!
//! Rust has no registration hook equivalent to
//! `addTypeEqualityFunc` — `assert_eq!` dispatches on `PartialEq` alone —
//! so these are free functions called explicitly instead of an overridden
//! `assertEqual`.

use vtty_core::Framebuffer;

/// Assert two framebuffers are identical, panicking with the same
/// per-cell diff message [`Framebuffer::compare`] produces.
#[track_caller]
pub fn assert_framebuffers_eq(actual: &Framebuffer, expected: &Framebuffer) {
    if let Err(err) = actual.compare(expected, false) {
        panic!("{err}");
    }
}

/// Like [`assert_framebuffers_eq`], but a blank cell and a literal space
/// glyph compare equal.
#[track_caller]
pub fn assert_framebuffers_eq_loose(actual: &Framebuffer, expected: &Framebuffer) {
    if let Err(err) = actual.compare(expected, true) {
        panic!("{err}");
    }
}
