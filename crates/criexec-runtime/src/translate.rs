//! Conversions between CRI messages and the workspace's generic types.

use criexec_common::types::{
    ContainerConfig, ContainerId, ContainerInfo, ContainerState, HostConfig,
};

use crate::cri::v1;

fn state_from_raw(raw: i32) -> ContainerState {
    match v1::ContainerState::try_from(raw) {
        Ok(v1::ContainerState::ContainerCreated) => ContainerState::Created,
        Ok(v1::ContainerState::ContainerRunning) => ContainerState::Running,
        Ok(v1::ContainerState::ContainerExited) => ContainerState::Exited,
        Ok(v1::ContainerState::ContainerUnknown) | Err(_) => ContainerState::Unknown,
    }
}

fn image_name(image: Option<&v1::ImageSpec>) -> Option<String> {
    image
        .map(|spec| spec.image.clone())
        .filter(|name| !name.is_empty())
}

/// Projects a full container status.
#[must_use]
pub fn info_from_status(status: &v1::ContainerStatus) -> ContainerInfo {
    ContainerInfo {
        id: ContainerId::new(&status.id),
        name: status
            .metadata
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default(),
        labels: status.labels.clone(),
        state: Some(state_from_raw(status.state)),
        image: image_name(status.image.as_ref()),
        spec: None,
    }
}

/// Projects a listing entry.
#[must_use]
pub fn info_from_listing(container: &v1::Container) -> ContainerInfo {
    ContainerInfo {
        id: ContainerId::new(&container.id),
        name: container
            .metadata
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default(),
        labels: container.labels.clone(),
        state: Some(state_from_raw(container.state)),
        image: image_name(container.image.as_ref()),
        spec: None,
    }
}

/// Builds the image reference for `config`.
#[must_use]
pub fn image_spec(config: &ContainerConfig) -> v1::ImageSpec {
    v1::ImageSpec {
        image: config.image.clone(),
        ..v1::ImageSpec::default()
    }
}

/// Translates a generic create configuration into the CRI structure.
///
/// `cmd` becomes the CRI command and `entrypoint` its arguments. `env`
/// entries without `=` are passed with an empty value.
#[must_use]
pub fn container_config(
    name: &str,
    config: &ContainerConfig,
    host_config: &HostConfig,
) -> v1::ContainerConfig {
    let envs = config
        .env
        .iter()
        .map(|entry| {
            let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
            v1::KeyValue {
                key: key.to_string(),
                value: value.to_string(),
            }
        })
        .collect();

    v1::ContainerConfig {
        metadata: Some(v1::ContainerMetadata {
            name: name.to_string(),
            attempt: 0,
        }),
        image: Some(image_spec(config)),
        command: config.cmd.clone(),
        args: config.entrypoint.clone(),
        working_dir: config.working_dir.clone(),
        envs,
        labels: config.labels.clone(),
        linux: Some(v1::LinuxContainerConfig {
            resources: Some(v1::LinuxContainerResources {
                memory_limit_in_bytes: host_config.memory,
                ..v1::LinuxContainerResources::default()
            }),
        }),
        ..v1::ContainerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn status_projection_keeps_id_name_and_labels() {
        let status = v1::ContainerStatus {
            id: "4f1c".into(),
            metadata: Some(v1::ContainerMetadata {
                name: "nginx".into(),
                attempt: 1,
            }),
            state: v1::ContainerState::ContainerRunning as i32,
            labels: HashMap::from([("app".into(), "web".into())]),
            image: Some(v1::ImageSpec {
                image: "docker.io/library/nginx:1.25".into(),
                ..v1::ImageSpec::default()
            }),
            ..v1::ContainerStatus::default()
        };

        let info = info_from_status(&status);
        assert_eq!(info.id.as_str(), "4f1c");
        assert_eq!(info.name, "nginx");
        assert_eq!(info.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(info.state, Some(ContainerState::Running));
        assert_eq!(info.image.as_deref(), Some("docker.io/library/nginx:1.25"));
        assert!(info.spec.is_none());
    }

    #[test]
    fn unknown_state_values_map_to_unknown() {
        let container = v1::Container {
            id: "x".into(),
            state: 42,
            ..v1::Container::default()
        };
        assert_eq!(info_from_listing(&container).state, Some(ContainerState::Unknown));
    }

    #[test]
    fn missing_metadata_yields_empty_name() {
        let info = info_from_listing(&v1::Container::default());
        assert!(info.name.is_empty());
        assert!(info.image.is_none());
    }

    #[test]
    fn config_translation_maps_fields() {
        let config = ContainerConfig {
            image: "busybox:1.36".into(),
            cmd: vec!["sleep".into(), "3600".into()],
            entrypoint: vec!["/bin/sh".into()],
            env: vec!["MODE=chaos".into(), "FLAG".into()],
            labels: HashMap::from([("owner".into(), "chaos".into())]),
            working_dir: "/work".into(),
        };
        let host = HostConfig {
            memory: 64 * 1024 * 1024,
        };

        let cri = container_config("probe", &config, &host);
        assert_eq!(cri.metadata.as_ref().unwrap().name, "probe");
        assert_eq!(cri.image.as_ref().unwrap().image, "busybox:1.36");
        assert_eq!(cri.command, ["sleep", "3600"]);
        assert_eq!(cri.args, ["/bin/sh"]);
        assert_eq!(cri.working_dir, "/work");
        assert_eq!(cri.labels.get("owner").map(String::as_str), Some("chaos"));
        assert_eq!(cri.envs.len(), 2);
        assert_eq!(cri.envs[0].key, "MODE");
        assert_eq!(cri.envs[0].value, "chaos");
        assert_eq!(cri.envs[1].key, "FLAG");
        assert!(cri.envs[1].value.is_empty());
        let memory = cri
            .linux
            .as_ref()
            .and_then(|l| l.resources.as_ref())
            .map(|r| r.memory_limit_in_bytes);
        assert_eq!(memory, Some(64 * 1024 * 1024));
    }
}
