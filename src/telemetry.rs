//! Tracing subscriber installation shared by binaries.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a JSON `fmt` subscriber filtered by `RUST_LOG`, writing to
/// stderr so stdout stays free for command output.
///
/// A subscriber that is already installed is left in place.
pub fn init() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
