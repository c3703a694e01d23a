mod logging;

pub use logging::init_logging;

use cname_resolver_domain::{CliOverrides, Config};

/// Runs before logging is installed, so failures go straight to stderr.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    Config::load(path, overrides).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!(e)
    })
}
