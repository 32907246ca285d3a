// Logging module - Logging infrastructure
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

/// Initialize logging.
///
/// Events go to stderr so they never interleave with rendered responses.
/// `RUST_LOG` takes precedence; otherwise `verbose` selects debug and
/// `level` applies. Calling this more than once is harmless.
pub fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("havoc_cli={},warn", level)));

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!("havoc logging initialized at level {}", level);
    }
}
