//! Command execution and file transfer inside a target process's namespaces.
//!
//! Each operation spawns the namespace-entry helper, waits for it, and
//! returns its captured output. Stdin/stdout/stderr are wired directly to
//! the helper; no other channel is used.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use criexec_common::config::ClientConfig;
use criexec_common::constants::SHELL;
use criexec_common::error::{CriExecError, Result};
use nix::unistd::Pid;

use crate::namespace::{NamespaceSet, shell_quote};

/// Captured result of one helper invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Standard output of the helper.
    pub stdout: String,
    /// Standard error of the helper.
    pub stderr: String,
    /// Exit code, or `None` when terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ExecOutput {
    /// Returns true if the helper exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    fn describe_exit(&self) -> String {
        self.exit_code.map_or_else(
            || "helper terminated by signal".to_string(),
            |code| format!("helper exited with status {code}"),
        )
    }
}

/// Stateless adapter around the namespace-entry helper binary.
#[derive(Debug, Clone)]
pub struct NsExec {
    helper: PathBuf,
}

impl NsExec {
    /// Creates a bridge invoking the helper at `helper`.
    #[must_use]
    pub fn new(helper: impl Into<PathBuf>) -> Self {
        Self {
            helper: helper.into(),
        }
    }

    /// Creates a bridge from the configured or default helper location.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.helper_path())
    }

    /// Returns the helper path.
    #[must_use]
    pub fn helper(&self) -> &Path {
        &self.helper
    }

    /// Runs `command` through a shell inside the pid, mount and network
    /// namespaces of `pid`.
    ///
    /// On a zero exit the captured error stream is returned as the output
    /// when it is non-empty; many diagnostic commands write informational
    /// text there. Otherwise standard output is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::NamespaceExecFailed`] if the helper cannot be
    /// spawned or exits nonzero.
    pub fn run_command(&self, pid: Pid, command: &str) -> Result<String> {
        tracing::info!(helper = %self.helper.display(), %pid, command, "exec in container namespaces");
        let output = self.invoke(NamespaceSet::COMMAND, pid, &[SHELL, "-c", command], None)?;
        if !output.success() {
            return Err(CriExecError::NamespaceExecFailed {
                message: format!("`{command}`: {}", output.describe_exit()),
                stderr: output.stderr,
            });
        }
        if output.stderr.is_empty() {
            Ok(output.stdout)
        } else {
            Ok(output.stderr)
        }
    }

    /// Copies a gzip tarball into the target's mount namespace and extracts
    /// it under `dst_dir`.
    ///
    /// The file is streamed as stdin to `cat > <dst_dir>/<file name>`, then
    /// `tar -zxf` unpacks it in place. The uploaded archive is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::Io`] if `src_file` cannot be opened, and
    /// [`CriExecError::NamespaceExecFailed`] if either stage cannot be
    /// spawned, exits nonzero, or writes to its error stream.
    pub fn copy_file(&self, pid: Pid, src_file: &Path, dst_dir: &Path) -> Result<()> {
        let file_name = src_file.file_name().ok_or_else(|| CriExecError::Config {
            message: format!("source {} has no file name", src_file.display()),
        })?;
        let remote = dst_dir.join(file_name);
        let remote = remote.to_string_lossy();
        let dst = dst_dir.to_string_lossy();

        let source = File::open(src_file).map_err(|e| CriExecError::Io {
            path: src_file.to_path_buf(),
            source: e,
        })?;
        let upload = format!("cat > {}", shell_quote(&remote));
        tracing::info!(helper = %self.helper.display(), %pid, src = %src_file.display(), command = %upload, "upload into container");
        let output = self.invoke(NamespaceSet::FILES, pid, &[SHELL, "-c", &upload], Some(source))?;
        check_stage("upload", &output)?;

        tracing::info!(helper = %self.helper.display(), %pid, archive = %remote, dst = %dst, "extract in container");
        let output = self.invoke(
            NamespaceSet::FILES,
            pid,
            &["tar", "-zxf", &remote, "-C", &dst],
            None,
        )?;
        check_stage("extract", &output)
    }

    fn invoke(
        &self,
        namespaces: NamespaceSet,
        pid: Pid,
        program: &[&str],
        stdin: Option<File>,
    ) -> Result<ExecOutput> {
        let mut cmd = Command::new(&self.helper);
        let _ = cmd.args(namespaces.helper_args(pid)).args(program);
        if let Some(file) = stdin {
            let _ = cmd.stdin(Stdio::from(file));
        }

        let output = cmd.output().map_err(|e| CriExecError::NamespaceExecFailed {
            message: format!("failed to run {}: {e}", self.helper.display()),
            stderr: String::new(),
        })?;
        let output = ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        tracing::debug!(
            stdout = %output.stdout,
            stderr = %output.stderr,
            exit_code = ?output.exit_code,
            "helper result"
        );
        Ok(output)
    }
}

/// Any error-stream content fails a file-transfer stage, even on a zero exit.
fn check_stage(stage: &str, output: &ExecOutput) -> Result<()> {
    if !output.success() {
        let detail = if output.stderr.is_empty() {
            output.describe_exit()
        } else {
            output.stderr.trim_end().to_string()
        };
        return Err(CriExecError::NamespaceExecFailed {
            message: format!("{stage} stage: {detail}"),
            stderr: output.stderr.clone(),
        });
    }
    if !output.stderr.is_empty() {
        return Err(CriExecError::NamespaceExecFailed {
            message: format!("{stage} stage: {}", output.stderr.trim_end()),
            stderr: output.stderr.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stderr: &str, exit_code: Option<i32>) -> ExecOutput {
        ExecOutput {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    #[test]
    fn clean_stage_passes() {
        assert!(check_stage("upload", &output("", Some(0))).is_ok());
    }

    #[test]
    fn stderr_fails_stage_on_zero_exit() {
        let err = check_stage("extract", &output("gzip: stdin: not in gzip format\n", Some(0)))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "namespace exec failed: extract stage: gzip: stdin: not in gzip format"
        );
    }

    #[test]
    fn silent_nonzero_exit_reports_status() {
        let err = check_stage("upload", &output("", Some(2))).unwrap_err();
        assert!(err.to_string().contains("status 2"));
    }

    #[test]
    fn signal_exit_is_described() {
        let err = check_stage("upload", &output("", None)).unwrap_err();
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn missing_helper_fails_to_spawn() {
        let bridge = NsExec::new("/nonexistent/criexec/bin/nsexec");
        let err = bridge.run_command(Pid::this(), "true").unwrap_err();
        assert!(matches!(
            &err,
            CriExecError::NamespaceExecFailed { stderr, .. } if stderr.is_empty()
        ));
        assert!(err.to_string().contains("failed to run"));
    }
}
