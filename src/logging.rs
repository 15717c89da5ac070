use std::io;

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a compact tracing subscriber writing to stderr, keeping stdout
/// for the contact book's own output. An unparsable filter falls back to
/// `warn`. Calling it twice is harmless.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
