//! Lifecycle of one test app: push, inspect, tear down.
//!
//! An `AppHandle` moves through Created → Pushed → Running/Failed →
//! Destroyed. Everything it does is a `cf` invocation or an HTTP request;
//! the only background work is the `cf logs` tail started by [`AppHandle::push`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cutlass_common::{AppSearchResults, AppSummary, Instances};
use tokio::sync::OnceCell;

use crate::application::ports::CommandRunner;
use crate::context::CfContext;
use crate::domain::push::{logs_args, push_args, set_env_args, start_args};
use crate::domain::{AppSpec, ClusterError, GetOptions, HttpResponse, single_instance_running};
use crate::infra::LogTail;
use crate::output::SharedBuffer;

/// Interval between instance-state polls in [`AppHandle::is_running`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct AppHandle<R: CommandRunner> {
    spec: AppSpec,
    ctx: Arc<CfContext<R>>,
    guid: OnceCell<String>,
    logs: SharedBuffer,
    log_tail: Option<LogTail>,
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl<R: CommandRunner> AppHandle<R> {
    pub(crate) fn new(spec: AppSpec, ctx: Arc<CfContext<R>>) -> Self {
        Self {
            spec,
            ctx,
            guid: OnceCell::new(),
            logs: SharedBuffer::new(),
            log_tail: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.spec.path
    }

    #[must_use]
    pub fn spec(&self) -> &AppSpec {
        &self.spec
    }

    pub fn set_stack(&mut self, stack: impl Into<String>) {
        self.spec.stack = stack.into();
    }

    pub fn set_buildpacks<I, S>(&mut self, buildpacks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.buildpacks = buildpacks.into_iter().map(Into::into).collect();
    }

    pub fn set_memory(&mut self, memory: impl Into<String>) {
        self.spec.memory = memory.into();
    }

    pub fn set_disk(&mut self, disk: impl Into<String>) {
        self.spec.disk = disk.into();
    }

    /// Set an environment variable to apply on the next push.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.spec.env.insert(key.into(), value.into());
    }

    /// Everything `cf logs` has printed since the last push.
    #[must_use]
    pub fn log_output(&self) -> String {
        self.logs.contents()
    }

    /// `true` while a `cf logs` tail is attached.
    #[must_use]
    pub fn is_tailing_logs(&self) -> bool {
        self.log_tail.is_some()
    }

    /// Push without starting, apply env, attach the log tail, then start.
    ///
    /// Env variables are applied one `cf set-env` at a time; the first
    /// failure aborts the push and variables already set stay set.
    pub async fn push(&mut self) -> Result<()> {
        let manifest = self.manifest().await;
        let args = push_args(&self.spec, manifest.as_deref());
        tracing::info!(app = %self.name(), manifest = manifest.is_some(), "pushing");
        self.ctx.cf.run_staging(&as_strs(&args)).await?;

        for (key, args) in set_env_args(&self.spec) {
            self.ctx
                .cf
                .run(&as_strs(&args))
                .await
                .with_context(|| format!("cannot set {key} on {}", self.name()))?;
        }

        self.start_log_tail().await?;

        let args = start_args(&self.spec);
        tracing::info!(app = %self.name(), verb = %args[0], "starting");
        self.ctx.cf.run_staging(&as_strs(&args)).await?;
        Ok(())
    }

    async fn manifest(&self) -> Option<PathBuf> {
        let path = self.spec.manifest_path();
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    async fn start_log_tail(&mut self) -> Result<()> {
        if let Some(previous) = self.log_tail.take() {
            previous.stop().await?;
        }
        self.logs = SharedBuffer::new();
        let child = self.ctx.cf.spawn(&as_strs(&logs_args(&self.spec)))?;
        self.log_tail = Some(LogTail::attach(
            child,
            self.logs.clone(),
            self.ctx.cf.sink().clone(),
        ));
        Ok(())
    }

    /// `cf restart <name>`.
    pub async fn restart(&self) -> Result<()> {
        self.ctx.cf.run_staging(&["restart", self.name()]).await?;
        Ok(())
    }

    /// `cf run-task <name> <command>`, returning the CLI's stdout.
    pub async fn run_task(&self, command: &str) -> Result<Vec<u8>> {
        self.ctx
            .cf
            .stdout_staging(&["run-task", self.name(), command])
            .await
    }

    /// Poll every [`POLL_INTERVAL`] until exactly one instance is `RUNNING`.
    ///
    /// Returns `false` when `timeout` elapses first. Failed polls count as
    /// not running yet; a poll still in flight at the deadline is abandoned.
    pub async fn is_running(&self, timeout: Duration) -> bool {
        let poll = async {
            let start = tokio::time::Instant::now() + POLL_INTERVAL;
            let mut ticks = tokio::time::interval_at(start, POLL_INTERVAL);
            loop {
                ticks.tick().await;
                match self.instance_states().await {
                    Ok(states) if single_instance_running(&states) => return,
                    Ok(states) => tracing::debug!(app = %self.name(), ?states, "not running yet"),
                    Err(e) => tracing::debug!(app = %self.name(), error = %e, "instance poll failed"),
                }
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }

    /// GUID of the space the cf CLI targets.
    pub fn space_guid(&self) -> Result<String> {
        self.ctx.target.space_guid()
    }

    /// Cluster GUID of this app, looked up once and cached.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::AppCount`] unless exactly one app with this
    /// name exists in the targeted space.
    pub async fn app_guid(&self) -> Result<&str> {
        let guid = self.guid.get_or_try_init(|| self.lookup_guid()).await?;
        Ok(guid.as_str())
    }

    async fn lookup_guid(&self) -> Result<String> {
        let space = self.space_guid()?;
        let query = format!("/v2/apps?q=space_guid:{space}&q=name:{}", self.name());
        let results: AppSearchResults = self.ctx.cf.curl(&query).await?;
        match results.resources.as_slice() {
            [app] => Ok(app.metadata.guid.clone()),
            found => Err(ClusterError::AppCount {
                name: self.name().to_string(),
                found: found.len(),
            }
            .into()),
        }
    }

    /// Reported state of every instance, in no particular order.
    pub async fn instance_states(&self) -> Result<Vec<String>> {
        let guid = self.app_guid().await?;
        let instances: Instances = self
            .ctx
            .cf
            .curl(&format!("/v2/apps/{guid}/instances"))
            .await?;
        Ok(instances.into_values().map(|info| info.state).collect())
    }

    /// `http://<host>.<domain><path>` for the app's first route.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::NoRoute`] if the app has no routes.
    pub async fn get_url(&self, path: &str) -> Result<String> {
        let guid = self.app_guid().await?;
        let summary: AppSummary = self
            .ctx
            .cf
            .curl(&format!("/v2/apps/{guid}/summary"))
            .await?;
        let authority = summary
            .first_route_authority()
            .ok_or_else(|| ClusterError::NoRoute {
                name: self.name().to_string(),
            })?;
        Ok(format!("http://{authority}{path}"))
    }

    /// GET `path` on the app's route.
    pub async fn get(&self, path: &str, opts: &GetOptions) -> Result<HttpResponse> {
        let url = self.get_url(path).await?;
        self.ctx.http.get(&url, opts).await
    }

    /// Body of a plain GET on `path`, whatever the status code.
    pub async fn get_body(&self, path: &str) -> Result<String> {
        Ok(self.get(path, &GetOptions::default()).await?.body)
    }

    /// Paths under `path` inside the running container, via `cf ssh`.
    pub async fn files(&self, path: &str) -> Result<Vec<String>> {
        let find = format!("find {path}");
        let stdout = self.ctx.cf.stdout(&["ssh", self.name(), "-c", &find]).await?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(ToString::to_string)
            .collect())
    }

    /// Stop the log tail, then `cf delete -f <name>`.
    ///
    /// Delete runs even when stopping the tail fails. A delete error takes
    /// precedence; otherwise a tail error is returned.
    pub async fn destroy(&mut self) -> Result<()> {
        let tail_result = match self.log_tail.take() {
            Some(tail) => tail.stop().await,
            None => Ok(()),
        };

        tracing::info!(app = %self.name(), "destroying");
        let delete_result = self.ctx.cf.run(&["delete", "-f", self.name()]).await;

        match (delete_result, tail_result) {
            (Err(delete), Err(tail)) => {
                tracing::warn!(app = %self.name(), error = %tail, "cannot stop cf logs");
                Err(delete)
            }
            (Err(delete), Ok(())) => Err(delete),
            (Ok(_), tail) => tail,
        }
    }
}
