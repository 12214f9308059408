//! System-wide constants and default endpoints.

use std::path::PathBuf;

/// Default CRI-O runtime socket.
pub const DEFAULT_ENDPOINT: &str = "unix:///var/run/crio/crio.sock";

/// Default logical namespace attached to every RPC.
pub const DEFAULT_NAMESPACE: &str = "k8s.io";

/// gRPC metadata key carrying the logical namespace.
pub const NAMESPACE_METADATA_KEY: &str = "containerd-namespace";

/// Deadline for establishing the runtime connection, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Well-known label holding the Kubernetes container name.
pub const CONTAINER_NAME_LABEL: &str = "io.kubernetes.container.name";

/// Graceful stop timeout used by `remove_container`, in seconds.
pub const REMOVE_STOP_TIMEOUT_SECS: i64 = 15;

/// Graceful stop timeout used when tearing down an ephemeral container, in seconds.
pub const EPHEMERAL_STOP_TIMEOUT_SECS: i64 = 10;

/// File name of the namespace-entry helper.
pub const NSEXEC_BIN: &str = "nsexec";

/// Directory under the install root holding helper binaries.
pub const HELPER_DIR: &str = "bin";

/// Shell used for commands run inside a target's namespaces.
pub const SHELL: &str = "/bin/sh";

/// Application name used in CLI output.
pub const APP_NAME: &str = "criexec";

/// Returns the directory containing the running executable.
///
/// Falls back to the current directory when the executable path cannot
/// be determined.
pub fn install_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default location of the namespace-entry helper.
pub fn default_helper_path() -> PathBuf {
    install_root().join(HELPER_DIR).join(NSEXEC_BIN)
}
