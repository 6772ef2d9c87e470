//! Integration tests for orphan-marker reclamation

use oodproxy_core::tunnel::process::process_exists;
use oodproxy_core::tunnel::reaper::reap_orphans_in;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn marker_in(dir: &std::path::Path, pid_text: &str, pid_for_name: &str) -> PathBuf {
    let path = dir.join(format!("stunnel-rdp-proxy-{}.pid", pid_for_name));
    fs::write(&path, pid_text).expect("write marker");
    path
}

#[test]
fn test_reaper_deletes_marker_with_garbage_content() {
    let dir = tempfile::tempdir().expect("temp dir");
    let marker = marker_in(dir.path(), "not-a-pid", "999999");

    let terminated = reap_orphans_in(dir.path());

    assert_eq!(terminated, 0);
    assert!(!marker.exists());
}

#[test]
fn test_reaper_deletes_marker_for_dead_process() {
    let dir = tempfile::tempdir().expect("temp dir");
    // The expected common case: the prior run exited and only the marker
    // survived.
    let marker = marker_in(dir.path(), "99999999", "99999999");

    let terminated = reap_orphans_in(dir.path());

    assert_eq!(terminated, 0);
    assert!(!marker.exists());
}

#[test]
fn test_reaper_spares_live_process_with_different_name() {
    let dir = tempfile::tempdir().expect("temp dir");

    // A live process whose PID a stale marker happens to reference, but
    // whose executable is not stunnel. PID-reuse defense: the marker goes,
    // the process stays.
    let mut child = Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn sleep");
    let pid = child.id();

    let marker = marker_in(dir.path(), &pid.to_string(), &pid.to_string());

    let terminated = reap_orphans_in(dir.path());

    assert_eq!(terminated, 0);
    assert!(!marker.exists());
    assert!(process_exists(pid), "unrelated process must not be killed");

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn test_reaper_terminates_live_orphaned_tunnel() {
    let dir = tempfile::tempdir().expect("temp dir");

    // A leftover tunnel from a crashed run: a live process whose
    // executable name is stunnel and whose parent is long gone. Spawning
    // through a shell that exits right away reparents the process, so the
    // reaper sees it the way it would see a real orphan instead of an
    // unreaped child of this test.
    let sleep_bin = which::which("sleep").expect("sleep on PATH");
    let fake_tunnel = dir.path().join("stunnel");
    fs::copy(&sleep_bin, &fake_tunnel).expect("copy sleep");

    let output = Command::new("sh")
        .arg("-c")
        .arg(format!(
            "'{}' 30 >/dev/null 2>&1 & echo $!",
            fake_tunnel.display()
        ))
        .output()
        .expect("spawn orphan");
    let pid: u32 = String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .expect("pid from shell");

    // Give the backgrounded process a moment to exec before its name is
    // checked.
    std::thread::sleep(std::time::Duration::from_millis(200));
    assert!(process_exists(pid));

    let marker = marker_in(dir.path(), &pid.to_string(), &pid.to_string());

    let terminated = reap_orphans_in(dir.path());

    assert_eq!(terminated, 1);
    assert!(!marker.exists());
    assert!(!process_exists(pid), "orphaned tunnel must be terminated");
}

#[test]
fn test_reaper_handles_multiple_markers_in_one_pass() {
    let dir = tempfile::tempdir().expect("temp dir");
    let garbage = marker_in(dir.path(), "garbage", "111111");
    let dead = marker_in(dir.path(), "99999998", "99999998");
    let also_dead = marker_in(dir.path(), "99999997", "99999997");

    let terminated = reap_orphans_in(dir.path());

    assert_eq!(terminated, 0);
    assert!(!garbage.exists());
    assert!(!dead.exists());
    assert!(!also_dead.exists());
}

#[test]
fn test_reaper_ignores_files_outside_naming_convention() {
    let dir = tempfile::tempdir().expect("temp dir");
    let unrelated = dir.path().join("some-other-app.pid");
    fs::write(&unrelated, "12345").expect("write file");
    let wrong_suffix = dir.path().join("stunnel-rdp-proxy-123.txt");
    fs::write(&wrong_suffix, "123").expect("write file");

    reap_orphans_in(dir.path());

    assert!(unrelated.exists());
    assert!(wrong_suffix.exists());
}

#[test]
fn test_reaper_on_nonexistent_directory_is_harmless() {
    let terminated = reap_orphans_in(std::path::Path::new("/nonexistent/reaper/dir"));
    assert_eq!(terminated, 0);
}

#[test]
fn test_reaper_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    marker_in(dir.path(), "99999999", "99999999");

    assert_eq!(reap_orphans_in(dir.path()), 0);
    // Second pass over an already-clean directory finds nothing.
    assert_eq!(reap_orphans_in(dir.path()), 0);
}
