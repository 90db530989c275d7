//! Logging setup.

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log level variable consulted when `RUST_LOG` is not set.
pub const ENV_LOG: &str = "MULTIDOC_LOG";

static INIT: OnceCell<()> = OnceCell::new();

/// Filter directive: `RUST_LOG`, then [`ENV_LOG`], then `debug` with `--debug`, else `info`.
pub fn log_filter(debug: bool) -> String {
    let from_env = |key: &str| {
        env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    from_env("RUST_LOG")
        .or_else(|| from_env(ENV_LOG))
        .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string())
}

/// Install the global stderr subscriber once. Later calls are no-ops.
pub fn telemetry_init(debug: bool) {
    if INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_new(log_filter(debug)).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("multidoc: logging init skipped (global subscriber already set)");
    }
    let _ = INIT.set(());
}
