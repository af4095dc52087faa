//! Diagnostic tracing to stderr.
//!
//! Stored records are the product output; these events are not.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Output: stderr, compact format.
///
/// ```bash
/// RUST_LOG=grading_runtime=debug grading submit --name Ann --attempts 1 --score 90
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
