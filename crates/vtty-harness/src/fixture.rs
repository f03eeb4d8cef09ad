//! Two-level setup/teardown ordering (spec §4.11, grounded in the
//! original `TestCase.setUp1`/`setUp2`/`tearDown1`/`tearDown2`).
//!
//! A test case implementation provides the inner hooks; a shared test
//! utility (e.g. one that spawns a [`vtty_protocol::StubCentral`] or a
//! [`vtty_process::Process`]) provides the outer ones. Outer setup always
//! runs before inner setup; inner teardown always runs before outer
//! teardown, and outer teardown runs even if inner teardown panics.

use std::panic::{self, AssertUnwindSafe};

/// Hooks a fixture-backed test implements. All methods default to doing
/// nothing, matching the original's empty base-class hooks.
pub trait Fixture {
    /// Runs first, before [`Self::setup_inner`]. If this panics, neither
    /// `setup_inner` nor the test body runs.
    fn setup_outer(&mut self) {}

    /// Runs after [`Self::setup_outer`] succeeds, immediately before the
    /// test body.
    fn setup_inner(&mut self) {}

    /// Runs immediately after the test body, before [`Self::teardown_outer`].
    fn teardown_inner(&mut self) {}

    /// Runs last, even if [`Self::teardown_inner`] or the test body panicked.
    fn teardown_outer(&mut self) {}
}

/// Drive a fixture through outer setup, inner setup, `body`, inner
/// teardown, and outer teardown, in that order, re-raising any panic
/// from `body` or `teardown_inner` only after `teardown_outer` has run.
pub fn with_fixture<F: Fixture>(fixture: &mut F, body: impl FnOnce(&mut F)) {
    fixture.setup_outer();
    fixture.setup_inner();

    let body_result = {
        let wrapped = AssertUnwindSafe(&mut *fixture);
        panic::catch_unwind(move || body(wrapped.0))
    };

    let teardown_result = {
        let wrapped = AssertUnwindSafe(&mut *fixture);
        panic::catch_unwind(move || wrapped.0.teardown_inner())
    };
    fixture.teardown_outer();

    if let Err(payload) = body_result {
        panic::resume_unwind(payload);
    }
    if let Err(payload) = teardown_result {
        panic::resume_unwind(payload);
    }
}
