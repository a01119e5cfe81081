//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "gota_boot=info";

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_directive`.
/// A second call is a no-op.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
