//! Cluster context: the state every app handle shares with its cluster.
//!
//! `CfContext` bundles the `cf` adapter, the config file the space GUID is
//! read from, and the HTTP client. A `ClusterClient` builds one and hands an
//! `Arc` of it to every `AppHandle` it creates.

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::ClusterConfig;
use crate::infra::{CfCli, CfConfigFile, ReqwestHttpClient};
use crate::output::OutputSink;

#[derive(Debug)]
pub struct CfContext<R: CommandRunner> {
    /// `cf` CLI adapter.
    pub cf: CfCli<R>,
    /// Source of the targeted space GUID.
    pub target: CfConfigFile,
    /// Client for requests against pushed apps.
    pub http: ReqwestHttpClient,
}

impl<R: CommandRunner> CfContext<R> {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        runner: R,
        config: &ClusterConfig,
        target: CfConfigFile,
        sink: OutputSink,
    ) -> Result<Self> {
        Ok(Self {
            cf: CfCli::new(runner, &config.cf_binary, config.staging_timeout(), sink),
            target,
            http: ReqwestHttpClient::new(config.http_timeout())?,
        })
    }
}
