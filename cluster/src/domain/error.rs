//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers that need to branch on a failure recover the
//! variant with `anyhow::Error::downcast_ref::<ClusterError>()`.

use thiserror::Error;

/// Failures raised while driving the cluster through the `cf` CLI.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("`{command}` exited with {}: {stderr}", exit_label(*code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("cannot parse JSON from `{command}`: {source}")]
    InvalidJson {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cluster reported an invalid API version '{version}': {source}")]
    InvalidApiVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Expected one app named '{name}', found {found}")]
    AppCount { name: String, found: usize },

    #[error("App '{name}' has no routes")]
    NoRoute { name: String },

    #[error("cannot determine cf home: neither CF_HOME nor a home directory is available")]
    HomeNotFound,
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
