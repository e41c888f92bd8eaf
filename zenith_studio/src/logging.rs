//! Logging configuration using tracing

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ZENITH_LOG";

const DEFAULT_FILTER: &str = "zenith=info,warn";

/// Installs the stderr subscriber. The level is controlled by `ZENITH_LOG`.
///
/// ```bash
/// ZENITH_LOG=debug zenith-studio
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();

    if installed.is_ok() {
        tracing::info!("ZenithOS Studio starting");
    }
}
