use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Without `debug` the level is pinned to `info` even if `RUST_LOG` is set;
/// with it, `RUST_LOG` may override the `debug` default.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
