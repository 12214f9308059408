//! Bridge tests against stub helpers.
//!
//! The stubs drop the namespace flags up to `--` and run the remaining
//! program on the host, which exercises the full spawn/capture path without
//! needing privileges or a running container.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use criexec_common::error::{CriExecError, ErrorKind};
use criexec_core::nsexec::NsExec;
use nix::unistd::Pid;

const PASSTHROUGH: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ] && [ "$1" != "--" ]; do shift; done
shift
exec "$@"
"#;

const NOISY_TAR: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ] && [ "$1" != "--" ]; do shift; done
shift
if [ "$1" = "tar" ]; then
    echo "tar: Ignoring unknown extended header keyword" 1>&2
    exit 0
fi
exec "$@"
"#;

fn write_helper(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create helper");
    file.write_all(script.as_bytes()).expect("write helper");
    file.sync_all().expect("sync helper");
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

fn recording_helper(dir: &Path) -> (PathBuf, PathBuf) {
    let log = dir.join("args.log");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n",
        log.display()
    );
    (write_helper(dir, "nsexec-record", &script), log)
}

fn write_tarball(path: &Path, entry: &str, content: &[u8]) {
    let file = std::fs::File::create(path).expect("create tarball");
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, entry, content)
        .expect("append entry");
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

// ── RunCommand ───────────────────────────────────────────────────────

#[test]
fn run_command_returns_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let output = bridge.run_command(Pid::this(), "echo hello").expect("run");
    assert_eq!(output, "hello\n");
}

#[test]
fn run_command_returns_stderr_as_output_on_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let output = bridge
        .run_command(Pid::this(), "echo err 1>&2")
        .expect("stderr on success is not a failure");
    assert_eq!(output, "err\n");
}

#[test]
fn run_command_prefers_stderr_over_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let output = bridge
        .run_command(Pid::this(), "echo out; echo warn 1>&2")
        .expect("run");
    assert_eq!(output, "warn\n");
}

#[test]
fn run_command_fails_on_nonzero_exit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let err = bridge
        .run_command(Pid::this(), "echo boom 1>&2; exit 3")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NamespaceExecFailed);
    assert!(matches!(
        &err,
        CriExecError::NamespaceExecFailed { stderr, .. } if stderr == "boom\n"
    ));
    assert!(err.to_string().contains("status 3"));
}

#[test]
fn run_command_passes_namespace_flags_and_shell() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (helper, log) = recording_helper(dir.path());
    let bridge = NsExec::new(helper);

    let _ = bridge
        .run_command(Pid::from_raw(4321), "cat /proc/loadavg")
        .expect("run");

    let args = std::fs::read_to_string(log).expect("read args");
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(
        args,
        ["-t", "4321", "-p", "-m", "-n", "--", "/bin/sh", "-c", "cat /proc/loadavg"]
    );
}

// ── CopyFile ─────────────────────────────────────────────────────────

#[test]
fn copy_file_uploads_and_extracts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let src = dir.path().join("chaos-tools.tar.gz");
    write_tarball(&src, "tools/probe.sh", b"#!/bin/sh\necho probe\n");
    let dst = tempfile::tempdir().expect("dst");

    bridge
        .copy_file(Pid::this(), &src, dst.path())
        .expect("copy");

    assert!(dst.path().join("chaos-tools.tar.gz").exists());
    let extracted = std::fs::read_to_string(dst.path().join("tools/probe.sh")).expect("extracted");
    assert_eq!(extracted, "#!/bin/sh\necho probe\n");
}

#[test]
fn copy_file_fails_when_extract_reports_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", NOISY_TAR));

    let src = dir.path().join("bundle.tar.gz");
    write_tarball(&src, "a.txt", b"a");
    let dst = tempfile::tempdir().expect("dst");

    let err = bridge.copy_file(Pid::this(), &src, dst.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NamespaceExecFailed);
    assert!(err.to_string().contains("extract stage"));
    assert!(err.to_string().contains("Ignoring unknown extended header"));
    // the upload stage itself went through
    assert!(dst.path().join("bundle.tar.gz").exists());
}

#[test]
fn copy_file_fails_on_corrupt_archive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let src = dir.path().join("broken.tar.gz");
    std::fs::write(&src, b"definitely not gzip").expect("write");
    let dst = tempfile::tempdir().expect("dst");

    let err = bridge.copy_file(Pid::this(), &src, dst.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NamespaceExecFailed);
    assert!(err.to_string().contains("extract stage"));
}

#[test]
fn copy_file_handles_spaces_in_destination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let src = dir.path().join("payload.tar.gz");
    write_tarball(&src, "note.txt", b"hi");
    let dst = tempfile::tempdir().expect("dst");
    let spaced = dst.path().join("with space");
    std::fs::create_dir(&spaced).expect("mkdir");

    bridge.copy_file(Pid::this(), &src, &spaced).expect("copy");
    assert_eq!(
        std::fs::read_to_string(spaced.join("note.txt")).expect("read"),
        "hi"
    );
}

#[test]
fn copy_file_reports_missing_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = NsExec::new(write_helper(dir.path(), "nsexec", PASSTHROUGH));

    let err = bridge
        .copy_file(Pid::this(), &dir.path().join("absent.tar.gz"), dir.path())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
