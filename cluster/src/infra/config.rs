//! Loads [`ClusterConfig`] from `CUTLASS_*` environment variables.

use anyhow::{Context, Result};

use crate::domain::ClusterConfig;

/// Environment variable prefix, e.g. `CUTLASS_CF_BINARY`.
pub const ENV_PREFIX: &str = "CUTLASS_";

/// Load the harness configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a `CUTLASS_*` variable is set to a value of the wrong
/// type (e.g. a non-numeric timeout).
pub fn load() -> Result<ClusterConfig> {
    envy::prefixed(ENV_PREFIX)
        .from_env()
        .context("invalid CUTLASS_* configuration")
}

/// Load the configuration from explicit `(key, value)` pairs.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_from<I>(vars: I) -> Result<ClusterConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .context("invalid CUTLASS_* configuration")
}
