use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter directive: `--verbose` wins over the configured level.
pub fn filter_directive(configured: &str, verbose: bool) -> String {
    if verbose {
        "docchat=debug,info".to_string()
    } else {
        configured.to_string()
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `directive`. Logs go to stderr so that
/// command output on stdout stays clean. Calling this twice is harmless; the
/// second call is ignored.
pub fn init_tracing(directive: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
