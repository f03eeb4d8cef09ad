//! Test-fixture helpers built on top of `vtty-core`: framebuffer snapshot
//! assertions and ordered setup/teardown (spec §4.11).
//!
//! This is deliberately not a custom test runner — `cargo test` and
//! `#[test]` already do what the original's `TestRunner`/`TestResult`
//! pair did, so nothing here replaces them.

pub mod assert;
pub mod fixture;
pub mod logging;

pub use assert::{assert_framebuffers_eq, assert_framebuffers_eq_loose};
pub use fixture::{with_fixture, Fixture};
pub use logging::init_test_logging;
