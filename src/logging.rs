use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "uiu_grades=info,sqlx=warn";

/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("uiu_grades=debug,sqlx=info")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
