use tracing_subscriber::{fmt, EnvFilter};

/// stderr subscriber; `level` is an EnvFilter directive such as `info` or
/// `nlsql_core=debug`.
pub fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // try_init: tests and repeated dispatch may have installed one already
    let _ = if format == "json" {
        builder
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_current_span(false)
            .with_span_list(false)
            .try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };
}
