//! Domain primitive types used across the criexec workspace.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CriExecError;

/// Opaque container identifier assigned by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle state of a container as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    /// Container has been created but not yet started.
    Created,
    /// Container is actively running.
    Running,
    /// Container's primary process has exited.
    Exited,
    /// The runtime does not know the state.
    Unknown,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Exited => write!(f, "exited"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Read-only projection of a container's current state.
///
/// Always derived from a runtime response; never built by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Runtime-assigned identifier.
    pub id: ContainerId,
    /// Display name from the container metadata.
    pub name: String,
    /// Labels attached to the container.
    pub labels: HashMap<String, String>,
    /// Lifecycle state, when the runtime reported one.
    pub state: Option<ContainerState>,
    /// Image reference, when the runtime reported one.
    pub image: Option<String>,
    /// Runtime-specific specification; never populated by this client.
    pub spec: Option<serde_json::Value>,
}

/// Subset-match filter over container labels.
///
/// A container matches when every selector key is present among its labels
/// with an equal value. The empty selector matches every container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSelector(BTreeMap<String, String>);

impl LabelSelector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required `key=value` pair.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.0.insert(key.into(), value.into());
        self
    }

    /// Returns true if the selector has no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `labels` satisfies every requirement.
    #[must_use]
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(key, value)| labels.get(key).is_some_and(|v| v == value))
    }

    /// Iterates over the required pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl From<HashMap<String, String>> for LabelSelector {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl FromStr for LabelSelector {
    type Err = CriExecError;

    /// Parses `key=value` pairs separated by commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut selector = Self::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| CriExecError::Config {
                message: format!("label selector entry must be key=value, got: {pair}"),
            })?;
            if key.trim().is_empty() {
                return Err(CriExecError::Config {
                    message: format!("label selector entry has an empty key: {pair}"),
                });
            }
            selector = selector.with(key.trim(), value.trim());
        }
        Ok(selector)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", pairs.join(","))
    }
}

/// Generic container configuration supplied by the caller.
///
/// Mirrors the shape of an engine-agnostic create request; the runtime
/// client translates it into the CRI structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Image reference to pull and run.
    pub image: String,
    /// Default command.
    #[serde(default)]
    pub cmd: Vec<String>,
    /// Entrypoint.
    #[serde(default)]
    pub entrypoint: Vec<String>,
    /// Environment as `KEY=value` strings.
    #[serde(default)]
    pub env: Vec<String>,
    /// Labels applied to the new container.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Working directory inside the container.
    #[serde(default)]
    pub working_dir: String,
}

/// Host-side resource configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Memory limit in bytes; zero means unlimited.
    #[serde(default)]
    pub memory: i64,
}

/// Network attachment request.
///
/// Accepted for interface compatibility; the runtime client creates
/// containers with an empty sandbox configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkingConfig {
    /// Names of networks the caller would like to attach.
    #[serde(default)]
    pub networks: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn selector_is_subset_match() {
        let selector = LabelSelector::new().with("app", "web");
        assert!(selector.matches(&labels(&[("app", "web"), ("tier", "front")])));
        assert!(!selector.matches(&labels(&[("app", "db")])));
        assert!(!selector.matches(&labels(&[("tier", "front")])));
    }

    #[test]
    fn empty_selector_matches_everything() {
        let selector = LabelSelector::new();
        assert!(selector.matches(&HashMap::new()));
        assert!(selector.matches(&labels(&[("a", "b")])));
    }

    #[test]
    fn selector_parses_comma_separated_pairs() {
        let selector: LabelSelector = "app=web, tier=front".parse().unwrap();
        assert_eq!(selector.to_string(), "app=web,tier=front");
    }

    #[test]
    fn selector_rejects_missing_equals() {
        let err = "app".parse::<LabelSelector>().unwrap_err();
        assert!(err.to_string().contains("key=value"));
    }

    #[test]
    fn container_state_serializes_lowercase() {
        let json = serde_json::to_string(&ContainerState::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }
}
