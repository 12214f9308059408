//! One-shot command execution in a disposable container.
//!
//! Composes create, start, exec, stop and remove. A failing stage
//! short-circuits the rest; nothing is rolled back, so a container created
//! before the failure stays behind and its id is handed back to the caller.

use std::time::Duration;

use criexec_common::constants::EPHEMERAL_STOP_TIMEOUT_SECS;
use criexec_common::error::{CriExecError, LifecycleStage, Result};
use criexec_common::types::{
    ContainerConfig, ContainerId, ContainerInfo, HostConfig, NetworkingConfig,
};
use thiserror::Error;

use crate::client::RuntimeClient;
use crate::cri::v1::{
    CreateContainerRequest, ExecSyncRequest, ImageStatusRequest, PodSandboxConfig,
    PullImageRequest, StartContainerRequest,
};
use crate::service::CriService;
use crate::translate;

/// Everything needed to run one command in a fresh container.
#[derive(Debug, Clone)]
pub struct EphemeralSpec {
    /// Generic container configuration; `image` is required.
    pub config: ContainerConfig,
    /// Host resource configuration.
    pub host_config: HostConfig,
    /// Network attachment; accepted but not mapped.
    pub networking_config: NetworkingConfig,
    /// Name given to the new container.
    pub name: String,
    /// Exec timeout, truncated to whole seconds.
    pub timeout: Duration,
    /// Command run when `config.cmd` is empty.
    pub command: String,
    /// Container the experiment targets, recorded for tracing.
    pub target: Option<ContainerInfo>,
}

impl EphemeralSpec {
    /// Command line passed to the exec call: `config.cmd`, or the single
    /// `command` string when no cmd is configured.
    #[must_use]
    pub fn exec_command(&self) -> Vec<String> {
        if self.config.cmd.is_empty() {
            vec![self.command.clone()]
        } else {
            self.config.cmd.clone()
        }
    }

    fn timeout_secs(&self) -> i64 {
        i64::try_from(self.timeout.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Result of a successful ephemeral run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Id of the container that ran the command (already removed).
    pub container_id: ContainerId,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code of the command; always zero on success.
    pub exit_code: i32,
}

/// Failure of an ephemeral run.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct EphemeralError {
    /// Id of the container created before the failure, if any.
    pub container_id: Option<ContainerId>,
    /// Underlying failure.
    #[source]
    pub source: CriExecError,
}

impl EphemeralError {
    fn before_create(source: CriExecError) -> Self {
        Self {
            container_id: None,
            source,
        }
    }

    fn after_create(id: &ContainerId, source: CriExecError) -> Self {
        Self {
            container_id: Some(id.clone()),
            source,
        }
    }
}

impl<S: CriService> RuntimeClient<S> {
    /// Pulls the image and creates a container named `name`.
    ///
    /// The image status is queried first, but the pull happens regardless of
    /// the answer. `networking_config` is accepted and not mapped; the
    /// container is created with an empty sandbox configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::LifecycleFailed`] if the pull or create RPC
    /// fails.
    pub fn create_container(
        &self,
        name: &str,
        config: &ContainerConfig,
        host_config: &HostConfig,
        networking_config: &NetworkingConfig,
    ) -> Result<ContainerId> {
        let image = translate::image_spec(config);
        tracing::info!(name, image = %image.image, networks = ?networking_config.networks, "creating container");

        match self.service().image_status(ImageStatusRequest {
            image: Some(image.clone()),
            verbose: false,
        }) {
            Ok(status) => {
                tracing::debug!(image = %image.image, present = status.image.is_some(), "image status");
            }
            Err(status) => {
                tracing::warn!(image = %image.image, error = %status.message(), "image status check failed");
            }
        }

        let pulled = self
            .service()
            .pull_image(PullImageRequest {
                image: Some(image.clone()),
            })
            .map_err(|status| {
                CriExecError::lifecycle(
                    LifecycleStage::Pull,
                    name,
                    format!("failed to pull image {}: {}", image.image, status.message()),
                )
            })?;
        tracing::debug!(image_ref = %pulled.image_ref, "image pulled");

        let response = self
            .service()
            .create_container(CreateContainerRequest {
                pod_sandbox_id: String::new(),
                config: Some(translate::container_config(name, config, host_config)),
                sandbox_config: Some(PodSandboxConfig::default()),
            })
            .map_err(|status| {
                CriExecError::lifecycle(LifecycleStage::Create, name, status.message())
            })?;

        let id = ContainerId::new(response.container_id);
        tracing::info!(name, id = %id, "container created");
        Ok(id)
    }

    /// Creates a container, runs one command in it, then stops and removes
    /// it.
    ///
    /// A nonzero exit code of the command is a failure of stage
    /// [`LifecycleStage::CommandExit`] even though every RPC succeeded.
    ///
    /// # Errors
    ///
    /// Returns an [`EphemeralError`] naming the failed stage; its
    /// `container_id` is set for every failure after creation.
    pub fn execute_and_remove(
        &self,
        spec: &EphemeralSpec,
    ) -> std::result::Result<ExecOutcome, EphemeralError> {
        if let Some(target) = &spec.target {
            tracing::info!(target = %target.id, name = %spec.name, "ephemeral run for target");
        }

        let id = self
            .create_container(
                &spec.name,
                &spec.config,
                &spec.host_config,
                &spec.networking_config,
            )
            .map_err(EphemeralError::before_create)?;

        self.service()
            .start_container(StartContainerRequest {
                container_id: id.to_string(),
            })
            .map_err(|status| {
                EphemeralError::after_create(
                    &id,
                    CriExecError::lifecycle(LifecycleStage::Start, id.as_str(), status.message()),
                )
            })?;

        let cmd = spec.exec_command();
        tracing::info!(id = %id, cmd = ?cmd, timeout_secs = spec.timeout_secs(), "exec in ephemeral container");
        let response = self
            .service()
            .exec_sync(ExecSyncRequest {
                container_id: id.to_string(),
                cmd,
                timeout: spec.timeout_secs(),
            })
            .map_err(|status| {
                EphemeralError::after_create(
                    &id,
                    CriExecError::lifecycle(LifecycleStage::Exec, id.as_str(), status.message()),
                )
            })?;

        let stdout = String::from_utf8_lossy(&response.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&response.stderr).into_owned();
        if response.exit_code != 0 {
            let detail = if stderr.trim().is_empty() {
                format!("exit code {}", response.exit_code)
            } else {
                format!("exit code {}: {}", response.exit_code, stderr.trim_end())
            };
            return Err(EphemeralError::after_create(
                &id,
                CriExecError::lifecycle(LifecycleStage::CommandExit, id.as_str(), detail),
            ));
        }

        self.stop_and_remove(&id, EPHEMERAL_STOP_TIMEOUT_SECS)
            .map_err(|e| EphemeralError::after_create(&id, e))?;

        Ok(ExecOutcome {
            container_id: id,
            stdout,
            stderr,
            exit_code: response.exit_code,
        })
    }
}
