//! Client configuration model.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{CriExecError, Result};

/// Settings used to connect to the container runtime and reach the helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Runtime RPC endpoint, e.g. `unix:///var/run/crio/crio.sock`.
    pub endpoint: String,
    /// Logical namespace attached to every call.
    pub namespace: String,
    /// Deadline for establishing the connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Explicit namespace-entry helper; defaults to `<install root>/bin/nsexec`.
    pub helper_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::DEFAULT_ENDPOINT.to_string(),
            namespace: constants::DEFAULT_NAMESPACE.to_string(),
            connect_timeout_secs: constants::DEFAULT_CONNECT_TIMEOUT_SECS,
            helper_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads a JSON configuration file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CriExecError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| CriExecError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Returns the endpoint, substituting the default for an empty value.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        if self.endpoint.is_empty() {
            constants::DEFAULT_ENDPOINT
        } else {
            &self.endpoint
        }
    }

    /// Returns the namespace, substituting the default for an empty value.
    #[must_use]
    pub fn namespace(&self) -> &str {
        if self.namespace.is_empty() {
            constants::DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// Returns the connect deadline.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the helper path, resolving the default when unset.
    #[must_use]
    pub fn helper_path(&self) -> PathBuf {
        self.helper_path
            .clone()
            .unwrap_or_else(constants::default_helper_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let config = ClientConfig {
            endpoint: String::new(),
            namespace: String::new(),
            ..ClientConfig::default()
        };
        assert_eq!(config.endpoint(), constants::DEFAULT_ENDPOINT);
        assert_eq!(config.namespace(), constants::DEFAULT_NAMESPACE);
    }

    #[test]
    fn from_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("criexec.json");
        std::fs::write(&path, r#"{"endpoint": "unix:///run/containerd/containerd.sock"}"#)
            .unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.endpoint(), "unix:///run/containerd/containerd.sock");
        assert_eq!(config.namespace(), "k8s.io");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn from_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CriExecError::Config { .. }));
    }

    #[test]
    fn explicit_helper_path_wins() {
        let config = ClientConfig {
            helper_path: Some(PathBuf::from("/opt/chaos/bin/nsexec")),
            ..ClientConfig::default()
        };
        assert_eq!(config.helper_path(), PathBuf::from("/opt/chaos/bin/nsexec"));
    }
}
