//! Tests for the push sequence and teardown of an `AppHandle`.
//!
//! The runner is scripted, but `cf logs` is a real `sh` child so the tail's
//! kill/reap path is exercised for real.

#![allow(clippy::expect_used)]

use cutlass_cluster::ClusterError;

use crate::helpers::{ScriptedRunner, err_output, eventually, fixture_dir, test_cluster};

fn path_of(dir: &tempfile::TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_push_sequence_without_buildpacks() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    app.push().await.expect("push should succeed");

    let name = app.name().to_string();
    let path = path_of(&fixture);
    assert_eq!(
        runner.calls(),
        [
            vec![
                "push",
                name.as_str(),
                "--no-start",
                "-p",
                path.as_str(),
                "-m",
                "128M",
                "-k",
                "256M",
            ],
            vec!["logs", name.as_str()],
            vec!["start", name.as_str()],
        ]
    );
    assert!(app.is_tailing_logs());

    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_passes_manifest_when_present() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(true);
    let mut app = t.cluster.new_app(fixture.path());

    app.push().await.expect("push should succeed");

    let push = runner.find("push").expect("push call");
    let manifest = fixture.path().join("manifest.yml");
    let pos = push.iter().position(|a| a == "-f").expect("-f flag");
    assert_eq!(push[pos + 1], manifest.to_string_lossy());

    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_omits_manifest_when_absent() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    app.push().await.expect("push should succeed");

    let push = runner.find("push").expect("push call");
    assert!(!push.contains(&"-f".to_string()), "{push:?}");
    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_with_stack_and_single_buildpack() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.set_stack("cflinuxfs4");
    app.set_buildpacks(["staticfile_buildpack"]);
    app.set_memory("");
    app.set_disk("");

    app.push().await.expect("push should succeed");

    let name = app.name().to_string();
    let path = path_of(&fixture);
    assert_eq!(
        runner.find("push").expect("push call"),
        [
            "push",
            name.as_str(),
            "--no-start",
            "-p",
            path.as_str(),
            "-s",
            "cflinuxfs4",
            "-b",
            "staticfile_buildpack",
        ]
    );
    assert_eq!(runner.verbs().last().map(String::as_str), Some("start"));
    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_with_several_buildpacks_uses_v3_push() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.set_buildpacks(["dotnet_core_buildpack", "staticfile_buildpack"]);

    app.push().await.expect("push should succeed");

    let push = runner.find("push").expect("push call");
    assert!(!push.contains(&"-b".to_string()), "{push:?}");

    let name = app.name().to_string();
    let path = path_of(&fixture);
    assert_eq!(
        runner.calls().last().expect("final call"),
        &[
            "v3-push",
            name.as_str(),
            "-p",
            path.as_str(),
            "-b",
            "dotnet_core_buildpack",
            "-b",
            "staticfile_buildpack",
        ]
    );
    assert_eq!(runner.count(&["start"]), 0);
    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_applies_env_between_push_and_start() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.set_env("BP_DEBUG", "true");
    app.set_env("FORCE_HTTPS", "1");

    app.push().await.expect("push should succeed");

    let name = app.name().to_string();
    assert_eq!(runner.verbs(), ["push", "set-env", "set-env", "logs", "start"]);
    assert_eq!(runner.count(&["set-env", &name, "BP_DEBUG", "true"]), 1);
    assert_eq!(runner.count(&["set-env", &name, "FORCE_HTTPS", "1"]), 1);
    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_set_env_failure_aborts_push() {
    let runner = ScriptedRunner::new();
    runner.on(&["set-env"], err_output(1, b"App not found"));
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.set_env("A_KEY", "a");
    app.set_env("B_KEY", "b");

    let err = app.push().await.expect_err("push should fail");

    assert!(format!("{err:#}").contains("A_KEY"), "{err:#}");
    assert_eq!(runner.verbs(), ["push", "set-env"]);
    assert!(!app.is_tailing_logs());
}

#[tokio::test]
async fn test_failed_push_stops_before_env_and_start() {
    let runner = ScriptedRunner::new();
    runner.on(&["push"], err_output(1, b"Staging error"));
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.set_env("KEY", "value");

    let err = app.push().await.expect_err("push should fail");

    assert!(matches!(
        err.downcast_ref::<ClusterError>(),
        Some(ClusterError::CommandFailed { .. })
    ));
    assert_eq!(runner.verbs(), ["push"]);
    assert!(t.sink.contents().contains("Staging error"));
}

#[tokio::test]
async fn test_failed_start_keeps_log_tail_for_inspection() {
    let runner = ScriptedRunner::new();
    runner
        .on(&["start"], err_output(1, b"Start unsuccessful"))
        .logs_script("echo 'ERR Could not detect buildpack'; exec sleep 30");
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    assert!(app.push().await.is_err());
    assert!(app.is_tailing_logs());
    assert!(eventually(|| app.log_output().contains("Could not detect buildpack")).await);

    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_log_tail_captures_cf_logs_stdout() {
    let runner = ScriptedRunner::new();
    runner.logs_script(
        "echo 'Retrieving logs for app'; echo '[APP/PROC/WEB/0] OUT ready'; exec sleep 30",
    );
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    app.push().await.expect("push should succeed");

    assert!(eventually(|| app.log_output().contains("OUT ready")).await);
    assert!(!t.sink.contents().contains("OUT ready"), "logs stay out of the sink");
    app.destroy().await.expect("destroy");
}

#[tokio::test]
async fn test_push_fails_when_log_tail_cannot_spawn() {
    let runner = ScriptedRunner::new();
    runner.spawn_error(&["logs"], "failed to spawn cf");
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    assert!(app.push().await.is_err());
    assert_eq!(runner.count(&["start"]), 0);
}

#[tokio::test]
async fn test_second_push_replaces_log_tail() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());

    app.push().await.expect("first push");
    app.push().await.expect("second push");

    assert_eq!(runner.count(&["logs"]), 2);
    assert!(app.is_tailing_logs());
    app.destroy().await.expect("destroy");
}

/// `false` once `pid` has exited, zombie or reaped.
#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat")).is_ok_and(|stat| {
        stat.rsplit(')')
            .next()
            .and_then(|rest| rest.split_whitespace().next())
            .is_some_and(|state| state != "Z" && state != "X")
    })
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_dropping_handle_kills_log_tail() {
    let runner = ScriptedRunner::new();
    runner.logs_script("echo $$; exec sleep 30");
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.push().await.expect("push");

    assert!(eventually(|| app.log_output().ends_with('\n')).await);
    let pid: u32 = app.log_output().trim().parse().expect("pid from cf logs");
    assert!(process_alive(pid));

    drop(app);

    assert!(
        eventually(|| !process_alive(pid)).await,
        "cf logs ({pid}) survived the handle"
    );
}

// ── Destroy ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_destroy_kills_tail_then_deletes() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.push().await.expect("push");

    tokio::time::timeout(std::time::Duration::from_secs(5), app.destroy())
        .await
        .expect("destroy should not hang")
        .expect("destroy should succeed");

    let name = app.name().to_string();
    assert_eq!(
        runner.calls().last().expect("delete call"),
        &["delete", "-f", name.as_str()]
    );
    assert!(!app.is_tailing_logs());
}

#[tokio::test]
async fn test_destroy_after_tail_exited_is_ok() {
    let runner = ScriptedRunner::new();
    runner.logs_script("echo 'FAILED: app not found'");
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.push().await.expect("push");

    // give `cf logs` time to exit on its own
    assert!(eventually(|| app.log_output().contains("FAILED")).await);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    app.destroy().await.expect("already-exited tail is not an error");
    assert_eq!(runner.count(&["delete", "-f"]), 1);
}

#[tokio::test]
async fn test_destroy_without_push_only_deletes() {
    let runner = ScriptedRunner::new();
    let t = test_cluster(&runner);
    let mut app = t.cluster.new_app("fixtures/never_pushed");

    app.destroy().await.expect("destroy");
    assert_eq!(runner.verbs(), ["delete"]);
}

#[tokio::test]
async fn test_destroy_reports_delete_failure_after_stopping_tail() {
    let runner = ScriptedRunner::new();
    runner.on(&["delete"], err_output(1, b"Server error"));
    let t = test_cluster(&runner);
    let fixture = fixture_dir(false);
    let mut app = t.cluster.new_app(fixture.path());
    app.push().await.expect("push");

    let err = app.destroy().await.expect_err("delete failed");

    assert!(matches!(
        err.downcast_ref::<ClusterError>(),
        Some(ClusterError::CommandFailed { .. })
    ));
    assert!(!app.is_tailing_logs(), "tail must be stopped even when delete fails");
}
