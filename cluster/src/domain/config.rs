//! Harness configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Tunables for talking to the cluster.
///
/// Loaded from `CUTLASS_*` environment variables by
/// [`crate::infra::config::load`]; every field has a default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Name or path of the cf CLI binary.
    #[serde(default = "default_cf_binary")]
    pub cf_binary: String,

    /// Timeout for short commands (curl, set-env, delete, ...).
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Timeout for commands that stage or start an app.
    #[serde(default = "default_staging_timeout_secs")]
    pub staging_timeout_secs: u64,

    /// Timeout for HTTP requests against pushed apps.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Seed for app name generation. A random seed is drawn when unset.
    #[serde(default)]
    pub name_seed: Option<u64>,
}

fn default_cf_binary() -> String {
    "cf".to_string()
}

fn default_command_timeout_secs() -> u64 {
    120
}

fn default_staging_timeout_secs() -> u64 {
    900
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cf_binary: default_cf_binary(),
            command_timeout_secs: default_command_timeout_secs(),
            staging_timeout_secs: default_staging_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            name_seed: None,
        }
    }
}

impl ClusterConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn staging_timeout(&self) -> Duration {
        Duration::from_secs(self.staging_timeout_secs)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
