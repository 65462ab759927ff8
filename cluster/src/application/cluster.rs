//! Cluster-wide operations and the factory for app handles.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use cutlass_common::ApiInfo;
use semver::Version;

use crate::application::app::AppHandle;
use crate::application::ports::CommandRunner;
use crate::context::CfContext;
use crate::domain::version::{
    MULTI_BUILDPACK_MIN_API_VERSION, TASK_MIN_API_VERSION, api_version_at_least,
};
use crate::domain::{AppSpec, NameGenerator};
use crate::infra::{CfConfigFile, TokioCommandRunner, config};
use crate::output::OutputSink;

/// Handle on the cluster the cf CLI is currently targeting.
///
/// Read-only after construction apart from the name generator, which is
/// internally locked, so one client can be shared by many app handles.
#[derive(Debug)]
pub struct ClusterClient<R: CommandRunner = TokioCommandRunner> {
    language: String,
    default_memory: String,
    default_disk: String,
    ctx: Arc<CfContext<R>>,
    names: Mutex<NameGenerator>,
}

impl ClusterClient<TokioCommandRunner> {
    /// Build a client for `language` (e.g. `"staticfile"`) that drives the
    /// real cf CLI, configured from `CUTLASS_*` environment variables.
    ///
    /// `memory` and `disk` become the defaults of every app; pass an empty
    /// string to leave a limit to the cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment configuration is invalid or the
    /// HTTP client cannot be built. The cf home is only located when the
    /// space GUID is first needed.
    pub fn new(
        language: impl Into<String>,
        memory: impl Into<String>,
        disk: impl Into<String>,
        sink: OutputSink,
    ) -> Result<Self> {
        let config = config::load()?;
        let runner = TokioCommandRunner::new(config.command_timeout());
        let ctx = CfContext::new(runner, &config, CfConfigFile::from_env(), sink)?;
        let names = match config.name_seed {
            Some(seed) => NameGenerator::seeded(seed),
            None => NameGenerator::from_entropy(),
        };
        Ok(Self::with_context(ctx, language, memory, disk, names))
    }
}

impl<R: CommandRunner> ClusterClient<R> {
    /// Build a client around an existing context, e.g. one wrapping a mock
    /// runner.
    pub fn with_context(
        ctx: CfContext<R>,
        language: impl Into<String>,
        memory: impl Into<String>,
        disk: impl Into<String>,
        names: NameGenerator,
    ) -> Self {
        tracing::info!(seed = names.seed(), "app name generator seeded");
        Self {
            language: language.into(),
            default_memory: memory.into(),
            default_disk: disk.into(),
            ctx: Arc::new(ctx),
            names: Mutex::new(names),
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Buildpack resource name, `<language>_buildpack`.
    #[must_use]
    pub fn buildpack_name(&self) -> String {
        format!("{}_buildpack", self.language)
    }

    /// Seed of the name generator, for reproducing a run.
    #[must_use]
    pub fn name_seed(&self) -> u64 {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .seed()
    }

    /// Create a handle for the fixture at `fixture`. Nothing is pushed yet.
    pub fn new_app(&self, fixture: impl AsRef<Path>) -> AppHandle<R> {
        let fixture = fixture.as_ref();
        let name = self
            .names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .app_name(fixture);
        let spec = AppSpec::new(name, fixture, &self.default_memory, &self.default_disk);
        AppHandle::new(spec, Arc::clone(&self.ctx))
    }

    /// `api_version` reported by `cf curl /v2/info`.
    pub async fn api_version(&self) -> Result<String> {
        let info: ApiInfo = self.ctx.cf.curl("/v2/info").await?;
        Ok(info.api_version)
    }

    /// Whether the cluster supports `cf run-task`.
    pub async fn has_task(&self) -> Result<bool> {
        self.api_version_at_least(&TASK_MIN_API_VERSION).await
    }

    /// Whether the cluster supports pushing with several buildpacks.
    pub async fn has_multi_buildpack(&self) -> Result<bool> {
        self.api_version_at_least(&MULTI_BUILDPACK_MIN_API_VERSION)
            .await
    }

    async fn api_version_at_least(&self, min: &Version) -> Result<bool> {
        let reported = self.api_version().await?;
        Ok(api_version_at_least(&reported, min)?)
    }

    /// Upload `file` as `<language>_buildpack`, updating the existing
    /// buildpack or creating it at position 100 when the update fails.
    pub async fn publish_buildpack(&self, file: impl AsRef<Path>) -> Result<()> {
        let file = file.as_ref().to_string_lossy().into_owned();
        let name = self.buildpack_name();

        let update = self
            .ctx
            .cf
            .run_quiet(&["update-buildpack", &name, "-p", &file, "--enable"])
            .await;
        match update {
            Ok(_) => {
                tracing::info!(buildpack = %name, "buildpack updated");
                return Ok(());
            }
            Err(e) => {
                tracing::info!(buildpack = %name, error = %e, "update failed, creating buildpack");
            }
        }

        self.ctx
            .cf
            .run_quiet(&["create-buildpack", &name, &file, "100", "--enable"])
            .await
            .with_context(|| format!("cannot publish {name}"))?;
        tracing::info!(buildpack = %name, "buildpack created");
        Ok(())
    }

    /// Delete routes left behind by destroyed apps.
    pub async fn cleanup(&self) -> Result<()> {
        self.ctx.cf.run(&["delete-orphaned-routes", "-f"]).await?;
        Ok(())
    }
}
