//! Cutlass cluster harness. Drives the `cf` CLI to push buildpack test
//! fixtures, check that they run, and tear them down again.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use std::time::Duration;
//! use cutlass_cluster::{ClusterClient, OutputSink};
//!
//! let cluster = ClusterClient::new("staticfile", "128M", "256M", OutputSink::stdout())?;
//! let mut app = cluster.new_app("fixtures/staticfile_app");
//! app.set_env("BP_DEBUG", "true");
//! app.push().await?;
//! assert!(app.is_running(Duration::from_secs(60)).await);
//! assert!(app.get_body("/").await?.contains("Hello"));
//! app.destroy().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod application;
pub mod context;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod output;

pub use application::{AppHandle, ClusterClient};
pub use context::CfContext;
pub use domain::{BasicAuth, ClusterConfig, ClusterError, GetOptions, HttpResponse, NameGenerator};
pub use output::{OutputSink, SharedBuffer};
