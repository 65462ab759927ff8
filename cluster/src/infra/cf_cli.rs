//! Infrastructure adapter that routes every `cf` CLI call through a
//! `CommandRunner`.
//!
//! Captured stdout/stderr is forwarded to the cluster's [`OutputSink`] and a
//! non-zero exit becomes [`ClusterError::CommandFailed`].

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::application::ports::CommandRunner;
use crate::domain::ClusterError;
use crate::output::OutputSink;

/// Which streams of a finished command are echoed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    /// stdout and stderr; used for commands run for their side effect.
    Both,
    /// stderr only; stdout is the command's result.
    Stderr,
    /// nothing; the output is only reported on failure.
    Quiet,
}

/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
#[derive(Debug)]
pub struct CfCli<R: CommandRunner> {
    runner: R,
    binary: String,
    staging_timeout: Duration,
    sink: OutputSink,
}

impl<R: CommandRunner> CfCli<R> {
    pub fn new(
        runner: R,
        binary: impl Into<String>,
        staging_timeout: Duration,
        sink: OutputSink,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            staging_timeout,
            sink,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    /// Run a short `cf` command for its side effect.
    pub async fn run(&self, args: &[&str]) -> Result<Output> {
        let output = self.invoke(args, None).await?;
        self.finish(args, output, Echo::Both)
    }

    /// Run a `cf` command that stages or starts an app, under the staging
    /// timeout.
    pub async fn run_staging(&self, args: &[&str]) -> Result<Output> {
        let output = self.invoke(args, Some(self.staging_timeout)).await?;
        self.finish(args, output, Echo::Both)
    }

    /// Run a `cf` command and return its stdout.
    pub async fn stdout(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.invoke(args, None).await?;
        Ok(self.finish(args, output, Echo::Stderr)?.stdout)
    }

    /// Like [`CfCli::stdout`] but under the staging timeout.
    pub async fn stdout_staging(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.invoke(args, Some(self.staging_timeout)).await?;
        Ok(self.finish(args, output, Echo::Stderr)?.stdout)
    }

    /// Run a `cf` command whose output only matters when it fails.
    pub async fn run_quiet(&self, args: &[&str]) -> Result<Output> {
        let output = self.invoke(args, None).await?;
        self.finish(args, output, Echo::Quiet)
    }

    /// `cf curl <path>`, decoded as JSON.
    pub async fn curl<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let args = ["curl", path];
        let stdout = self.stdout(&args).await?;
        serde_json::from_slice(&stdout).map_err(|source| {
            ClusterError::InvalidJson {
                command: self.describe(&args),
                source,
            }
            .into()
        })
    }

    /// Spawn a long-running `cf` command, e.g. `cf logs`.
    pub fn spawn(&self, args: &[&str]) -> Result<tokio::process::Child> {
        tracing::debug!(command = %self.describe(args), "spawning cf");
        self.runner
            .spawn(&self.binary, args)
            .with_context(|| format!("cf {}", verb(args)))
    }

    async fn invoke(&self, args: &[&str], timeout: Option<Duration>) -> Result<Output> {
        tracing::debug!(command = %self.describe(args), "running cf");
        let result = match timeout {
            Some(timeout) => {
                self.runner
                    .run_with_timeout(&self.binary, args, timeout)
                    .await
            }
            None => self.runner.run(&self.binary, args).await,
        };
        result.with_context(|| format!("cf {}", verb(args)))
    }

    fn finish(&self, args: &[&str], output: Output, echo: Echo) -> Result<Output> {
        let success = output.status.success();
        match echo {
            Echo::Both => {
                self.sink.write_bytes(&output.stdout);
                self.sink.write_bytes(&output.stderr);
            }
            Echo::Stderr => self.sink.write_bytes(&output.stderr),
            Echo::Quiet if !success => {
                self.sink.write_bytes(&output.stdout);
                self.sink.write_bytes(&output.stderr);
            }
            Echo::Quiet => {}
        }
        if success {
            return Ok(output);
        }
        Err(ClusterError::CommandFailed {
            command: self.describe(args),
            code: output.status.code(),
            stderr: failure_text(&output),
        }
        .into())
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn verb<'a>(args: &[&'a str]) -> &'a str {
    args.first().copied().unwrap_or_default()
}

/// Prefer stderr; `cf` prints most of its failures to stdout.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    text.trim().to_string()
}
