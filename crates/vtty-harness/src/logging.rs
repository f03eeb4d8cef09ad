//! Test-only logging setup (spec ambient stack). The original toggled a
//! module-level debug boolean that `lousy`'s own print statements checked;
//! here the equivalent is turning on `tracing` output for the duration of
//! a test run via `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a `tracing-subscriber` fmt subscriber once per process,
/// respecting `RUST_LOG`. Safe to call from every test that wants
/// output — later calls are no-ops.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
