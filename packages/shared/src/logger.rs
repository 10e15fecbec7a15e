//! Logger setup based on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the given crate logs at
/// `default_level` and everything else at `info`.
///
/// # Arguments
///
/// * `crate_name` - Name of the binary or crate, e.g. `env!("CARGO_BIN_NAME")`
/// * `default_level` - Level used for `crate_name` when `RUST_LOG` is unset
pub fn setup_logger(crate_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(crate_name, default_level)));
    let directives = filter.to_string();

    // A subscriber may already be installed (tests).
    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
    {
        tracing::debug!("Logger initialized with filter '{}'", directives);
    }
}

/// Filter used when `RUST_LOG` is unset
fn default_directives(crate_name: &str, default_level: &str) -> String {
    let target = crate_name.replace('-', "_");
    format!("info,{target}={default_level}")
}
