//! Argument construction for the `cf` commands issued during a push.
//!
//! Pure functions over [`AppSpec`] so the flag rules can be tested without
//! spawning anything.

use std::path::Path;

use super::app::{AppSpec, path_arg};

/// `cf push <name> --no-start -p <path> [-s] [-b] [-f] [-m] [-k]`.
///
/// `manifest` is the manifest path when one exists next to the fixture.
/// A buildpack flag is only added for exactly one buildpack; several
/// buildpacks are applied later by [`start_args`] through `v3-push`.
#[must_use]
pub fn push_args(spec: &AppSpec, manifest: Option<&Path>) -> Vec<String> {
    let mut args = vec![
        "push".to_string(),
        spec.name().to_string(),
        "--no-start".to_string(),
        "-p".to_string(),
        spec.path_str(),
    ];
    if !spec.stack.is_empty() {
        args.push("-s".to_string());
        args.push(spec.stack.clone());
    }
    if let [buildpack] = spec.buildpacks.as_slice() {
        args.push("-b".to_string());
        args.push(buildpack.clone());
    }
    if let Some(manifest) = manifest {
        args.push("-f".to_string());
        args.push(path_arg(manifest));
    }
    if !spec.memory.is_empty() {
        args.push("-m".to_string());
        args.push(spec.memory.clone());
    }
    if !spec.disk.is_empty() {
        args.push("-k".to_string());
        args.push(spec.disk.clone());
    }
    args
}

/// `cf set-env <name> <key> <value>`, one invocation per variable, each
/// paired with the key it sets.
#[must_use]
pub fn set_env_args(spec: &AppSpec) -> Vec<(&str, Vec<String>)> {
    spec.env
        .iter()
        .map(|(key, value)| {
            let args = vec![
                "set-env".to_string(),
                spec.name().to_string(),
                key.clone(),
                value.clone(),
            ];
            (key.as_str(), args)
        })
        .collect()
}

/// Either `cf v3-push <name> -p <path> -b <bp>...` or `cf start <name>`.
#[must_use]
pub fn start_args(spec: &AppSpec) -> Vec<String> {
    if spec.is_multi_buildpack() {
        let mut args = vec![
            "v3-push".to_string(),
            spec.name().to_string(),
            "-p".to_string(),
            spec.path_str(),
        ];
        for buildpack in &spec.buildpacks {
            args.push("-b".to_string());
            args.push(buildpack.clone());
        }
        args
    } else {
        vec!["start".to_string(), spec.name().to_string()]
    }
}

/// `cf logs <name>`, the long-running tail attached during push.
#[must_use]
pub fn logs_args(spec: &AppSpec) -> Vec<String> {
    vec!["logs".to_string(), spec.name().to_string()]
}
