use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber, writing to stderr.
///
/// Warnings (skipped rows, sample fallback) are always shown; `verbose`
/// adds debug output. `RUST_LOG` narrows or widens either level.
pub fn init_logging(verbose: bool) {
    let (level_filter, default_directive) = if verbose {
        (LevelFilter::DEBUG, "tourdash=debug")
    } else {
        (LevelFilter::WARN, "tourdash=warn")
    };
    let app_filter = Targets::new().with_target("tourdash", level_filter);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .try_init();
    if result.is_err() {
        tracing::debug!("Logging was already initialized");
    }
}
