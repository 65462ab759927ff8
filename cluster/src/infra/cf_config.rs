//! Reads the cf CLI's own config file to find the targeted space.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cutlass_common::CfConfig;

use crate::domain::ClusterError;

/// `<CF_HOME or HOME>/.cf/config.json`, as written by `cf login` / `cf target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfConfigFile {
    /// `None` resolves from `CF_HOME` / the home directory on every read.
    path: Option<PathBuf>,
}

impl CfConfigFile {
    /// Use an explicit config file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Locate the config file the same way the cf CLI does, each time it is
    /// read.
    #[must_use]
    pub fn from_env() -> Self {
        Self { path: None }
    }

    /// Path the next read will use.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::HomeNotFound`] if neither `CF_HOME` nor a home
    /// directory is available.
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(resolve_path(std::env::var_os("CF_HOME"), dirs::home_dir())
                .ok_or(ClusterError::HomeNotFound)?),
        }
    }

    /// GUID of the space the cf CLI currently targets.
    ///
    /// Read on every call; `cf target` may change it between tests.
    pub fn space_guid(&self) -> Result<String> {
        let path = self.path()?;
        let content =
            std::fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
        let config: CfConfig = serde_json::from_slice(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        Ok(config.space_fields.guid)
    }
}

/// `CF_HOME` wins when set and non-empty, otherwise the home directory.
#[must_use]
pub fn resolve_path(cf_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    let base = cf_home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(home)?;
    Some(base.join(".cf").join("config.json"))
}
