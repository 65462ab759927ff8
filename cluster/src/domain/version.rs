//! Capability gates derived from the cluster's reported API version.

use semver::Version;

use super::error::ClusterError;

/// First API version that supports `cf run-task`.
pub const TASK_MIN_API_VERSION: Version = Version::new(2, 75, 0);

/// First API version that supports pushing with several buildpacks.
pub const MULTI_BUILDPACK_MIN_API_VERSION: Version = Version::new(3, 27, 0);

/// Parse `reported` as semver and compare it against `min`.
///
/// # Errors
///
/// Returns [`ClusterError::InvalidApiVersion`] if `reported` is not a valid
/// semantic version.
pub fn api_version_at_least(reported: &str, min: &Version) -> Result<bool, ClusterError> {
    let version =
        Version::parse(reported.trim()).map_err(|source| ClusterError::InvalidApiVersion {
            version: reported.to_string(),
            source,
        })?;
    Ok(version >= *min)
}
