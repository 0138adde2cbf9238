use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber for applications embedding the rewriter.
///
/// Honors `RUST_LOG`; defaults to `tweak_io=info`. Does nothing if a global
/// subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tweak_io=info,tweak_core=info"));

    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

/// Test subscriber writing through the test harness's captured output.
pub fn init_tracing_tests(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer().with_target(true))
        .try_init();
}
