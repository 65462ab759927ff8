//! Ports the application layer drives. Implementations live in
//! `crate::infra` and in the test suite.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

/// Process execution for the `cf` CLI.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` to completion under the runner's default timeout.
    ///
    /// Used for short `cf` verbs such as `curl`, `set-env` and `delete`.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run `program` to completion under `timeout`.
    ///
    /// `push`, `start`, `v3-push`, `restart` and `run-task` pass the staging
    /// timeout here. A non-zero exit is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, or if it is still
    /// running at `timeout`, in which case it has been killed.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;

    /// Start `program` and hand back the child, e.g. for `cf logs`.
    ///
    /// stdout and stderr are piped; dropping the child kills it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child>;
}
