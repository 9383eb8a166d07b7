// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Logging

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber at `info`.
///
/// `RUST_LOG` overrides the level, e.g.
/// `RUST_LOG=rotables_engine::allocation=debug`. A second call is a no-op.
pub fn init() {
    init_with("info");
}

/// Same as [`init`] with a caller-chosen fallback directive.
pub fn init_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// Debug-level subscriber writing through the test harness capture.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
