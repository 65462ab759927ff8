//! Desired shape of a test app, independent of any `cf` invocation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Instance state reported by the cluster for a started app.
pub const RUNNING_STATE: &str = "RUNNING";

/// Everything `cf push` needs to know about one app.
///
/// `name` is fixed at construction and is the cluster's only identity key
/// for the app, so there is no setter for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    name: String,
    /// Fixture directory pushed with `-p`.
    pub path: PathBuf,
    /// Stack passed with `-s`; empty means the cluster default.
    pub stack: String,
    /// Buildpacks in priority order.
    pub buildpacks: Vec<String>,
    /// Memory limit passed with `-m`; empty means the cluster default.
    pub memory: String,
    /// Disk limit passed with `-k`; empty means the cluster default.
    pub disk: String,
    /// Environment applied with `cf set-env` between push and start.
    pub env: BTreeMap<String, String>,
}

impl AppSpec {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        memory: impl Into<String>,
        disk: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            stack: String::new(),
            buildpacks: Vec::new(),
            memory: memory.into(),
            disk: disk.into(),
            env: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the optional manifest that ships with the fixture.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join("manifest.yml")
    }

    #[must_use]
    pub fn path_str(&self) -> String {
        path_arg(&self.path)
    }

    /// `true` when start must go through `cf v3-push`.
    #[must_use]
    pub fn is_multi_buildpack(&self) -> bool {
        self.buildpacks.len() > 1
    }
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `true` only when exactly one instance exists and it reports `RUNNING`.
#[must_use]
pub fn single_instance_running(states: &[String]) -> bool {
    matches!(states, [only] if only == RUNNING_STATE)
}
