//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set; otherwise the given binary
/// name (with `-` normalized to `_`, as in tracing targets) and `tower_http`
/// are enabled at `default_level`. The normalized binary name matches the
/// binary's own library crate, so each binary only enables its own targets.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={default_level},tower_http={default_level}")
}
