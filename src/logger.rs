use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity switches. `--quiet` wins over
/// `--verbose`.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "quickpress=error"
    } else if verbose {
        "quickpress=debug"
    } else {
        "quickpress=warn"
    }
}

/// Installs a stderr `tracing` subscriber. `RUST_LOG` overrides the switches.
///
/// Calling it twice is harmless; the second subscriber is dropped.
pub fn init(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
