//! Tracing bootstrap for test processes.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-friendly tracing subscriber (once per process).
///
/// Uses `RUST_LOG` if set, otherwise `log_level`; an unparsable level falls
/// back to `warn`. Output goes through the libtest writer so it is captured
/// per test. Calling this after another global subscriber was installed is a
/// no-op.
pub fn init_tracing(log_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
