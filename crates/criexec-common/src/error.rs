//! Unified error types for the criexec workspace.
//!
//! Variants follow failure conditions rather than call sites: a lookup that
//! fails because the RPC errored and one that fails because nothing matched
//! both surface as [`CriExecError::ContainerLookupFailed`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Stage of a container lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// Image status check or pull.
    Pull,
    /// Container creation RPC.
    Create,
    /// Container start RPC.
    Start,
    /// Synchronous exec RPC transport failure.
    Exec,
    /// The executed command itself exited nonzero.
    CommandExit,
    /// Graceful stop RPC.
    Stop,
    /// Removal RPC.
    Remove,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => write!(f, "image pull"),
            Self::Create => write!(f, "create"),
            Self::Start => write!(f, "start"),
            Self::Exec => write!(f, "exec"),
            Self::CommandExit => write!(f, "command"),
            Self::Stop => write!(f, "stop"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Coarse failure class of a [`CriExecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The runtime connection could not be established.
    ConnectionFailed,
    /// A container could not be found or its status could not be read.
    ContainerLookupFailed,
    /// The container's primary process id could not be resolved.
    PidResolutionFailed,
    /// The namespace-entry helper failed.
    NamespaceExecFailed,
    /// A create/start/exec/stop/remove step failed.
    LifecycleFailed,
    /// A local file could not be accessed.
    Io,
    /// A configuration value is invalid.
    Config,
}

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CriExecError {
    /// Dialing the runtime endpoint failed or timed out.
    #[error("failed to connect to CRI endpoint {endpoint}: {message}")]
    ConnectionFailed {
        /// Endpoint that was dialed.
        endpoint: String,
        /// Description of the transport failure.
        message: String,
        /// Whether the connect deadline was exceeded.
        timed_out: bool,
    },

    /// A list/status RPC failed, returned nothing, or no container matched.
    #[error("container lookup failed for {target}: {message}")]
    ContainerLookupFailed {
        /// Identifier, name or selector that was looked up.
        target: String,
        /// Description of the failure.
        message: String,
    },

    /// The status info blob was absent, undecodable, or had no usable pid.
    #[error("failed to resolve pid of container {container_id}: {message}")]
    PidResolutionFailed {
        /// Container whose pid was requested.
        container_id: String,
        /// Description of the failure.
        message: String,
    },

    /// The namespace-entry helper could not run or reported an error.
    #[error("namespace exec failed: {message}")]
    NamespaceExecFailed {
        /// Description of the failure.
        message: String,
        /// Captured error stream of the helper, possibly empty.
        stderr: String,
    },

    /// A lifecycle RPC failed or the executed command exited nonzero.
    #[error("{stage} failed for {container}: {message}")]
    LifecycleFailed {
        /// Stage that failed.
        stage: LifecycleStage,
        /// Container id, or the requested name when no id exists yet.
        container: String,
        /// Description of the failure.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

impl CriExecError {
    /// Returns the failure class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            Self::ContainerLookupFailed { .. } => ErrorKind::ContainerLookupFailed,
            Self::PidResolutionFailed { .. } => ErrorKind::PidResolutionFailed,
            Self::NamespaceExecFailed { .. } => ErrorKind::NamespaceExecFailed,
            Self::LifecycleFailed { .. } => ErrorKind::LifecycleFailed,
            Self::Io { .. } => ErrorKind::Io,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Shorthand for a [`CriExecError::ContainerLookupFailed`].
    pub fn lookup(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContainerLookupFailed {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`CriExecError::PidResolutionFailed`].
    pub fn pid(container_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PidResolutionFailed {
            container_id: container_id.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`CriExecError::LifecycleFailed`].
    pub fn lifecycle(
        stage: LifecycleStage,
        container: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::LifecycleFailed {
            stage,
            container: container.into(),
            message: message.into(),
        }
    }

    /// Returns the lifecycle stage for [`CriExecError::LifecycleFailed`].
    pub const fn stage(&self) -> Option<LifecycleStage> {
        match self {
            Self::LifecycleFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CriExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        let err = CriExecError::lookup("abc", "not found");
        assert_eq!(err.kind(), ErrorKind::ContainerLookupFailed);
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn lifecycle_message_names_stage_and_container() {
        let err = CriExecError::lifecycle(LifecycleStage::CommandExit, "c1", "exit code 2");
        assert_eq!(err.to_string(), "command failed for c1: exit code 2");
        assert_eq!(err.stage(), Some(LifecycleStage::CommandExit));
    }

    #[test]
    fn timeout_is_visible_in_connection_error() {
        let err = CriExecError::ConnectionFailed {
            endpoint: "unix:///run/x.sock".into(),
            message: "deadline exceeded after 10s".into(),
            timed_out: true,
        };
        assert!(err.to_string().contains("deadline exceeded"));
    }
}
