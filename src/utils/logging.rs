//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the resolver probe
///
/// Defaults to `info`; `RUST_LOG` overrides, e.g. `RUST_LOG=uri_path_resolver=debug`
/// to see why individual identifiers stay unresolved.
pub fn setup_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
