//! Runs `cf` as a tokio child process.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
///
/// Children are spawned with `kill_on_drop`, so dropping the wait at the
/// deadline also kills the process. `timeout` applies to
/// [`CommandRunner::run`]; staging commands pass their own limit.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

fn command(program: &str, args: &[&str]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = command(program, args)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output.with_context(|| format!("waiting for {program}")),
            Err(_) => bail!(
                "{program} {} timed out after {}s and was killed",
                args.first().copied().unwrap_or_default(),
                timeout.as_secs()
            ),
        }
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child> {
        command(program, args)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))
    }
}
