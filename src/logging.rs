use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `--debug` wins over `RUST_LOG`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
