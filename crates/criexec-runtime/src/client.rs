//! Runtime client: container discovery, pid resolution and namespace exec.
//!
//! Nothing is cached between calls. Every exec or copy resolves the target
//! pid immediately before invoking the namespace-entry helper, which narrows
//! but cannot close the window in which the container's primary process may
//! exit or be replaced.

use std::path::Path;

use criexec_common::config::ClientConfig;
use criexec_common::constants::{CONTAINER_NAME_LABEL, REMOVE_STOP_TIMEOUT_SECS};
use criexec_common::error::{CriExecError, LifecycleStage, Result};
use criexec_common::types::{ContainerId, ContainerInfo, LabelSelector};
use criexec_core::nsexec::NsExec;
use nix::unistd::Pid;
use tokio_util::sync::CancellationToken;

use crate::cri::v1::{
    Container, ContainerFilter, ContainerStatusRequest, ContainerStatusResponse,
    ListContainersRequest, RemoveContainerRequest, StopContainerRequest, VersionRequest,
    VersionResponse,
};
use crate::pid::pid_from_info;
use crate::service::CriService;
use crate::transport::GrpcTransport;
use crate::translate;

/// Client for one container runtime.
///
/// Owns the RPC service handle and the namespace-entry bridge. All methods
/// block until the runtime (or helper) answers.
#[derive(Debug)]
pub struct RuntimeClient<S = GrpcTransport> {
    service: S,
    bridge: NsExec,
}

impl RuntimeClient<GrpcTransport> {
    /// Connects to the runtime described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ConnectionFailed`] if the endpoint cannot be
    /// reached before the connect deadline.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let service = GrpcTransport::connect(config)?;
        Ok(Self::with_service(service, NsExec::from_config(config)))
    }

    /// Returns a handle that cancels this client from any thread.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.service.cancellation_token()
    }

    /// Cancels the client; in-flight and future calls fail.
    pub fn cancel(&self) {
        self.service.cancel();
    }

    /// Releases the runtime connection.
    pub fn close(self) {
        self.service.close();
    }
}

impl<S: CriService> RuntimeClient<S> {
    /// Builds a client over an existing service handle.
    #[must_use]
    pub const fn with_service(service: S, bridge: NsExec) -> Self {
        Self { service, bridge }
    }

    /// Returns the underlying RPC service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Returns the namespace-entry bridge.
    pub const fn bridge(&self) -> &NsExec {
        &self.bridge
    }

    /// Queries the runtime name and version.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ConnectionFailed`] if the RPC fails; the
    /// message starts with the gRPC code, so a cancelled client reads
    /// `Cancelled: ...`.
    pub fn version(&self) -> Result<VersionResponse> {
        self.service
            .version(VersionRequest {
                version: "v1".into(),
            })
            .map_err(|status| CriExecError::ConnectionFailed {
                endpoint: self.service.endpoint().to_string(),
                message: format!("Version RPC failed: {:?}: {}", status.code(), status.message()),
                timed_out: false,
            })
    }

    /// Looks up a container by its runtime id.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ContainerLookupFailed`] if the status RPC fails
    /// or returns no status.
    pub fn container_by_id(&self, id: &ContainerId) -> Result<ContainerInfo> {
        let response = self.status(id, true)?;
        let status = response
            .status
            .ok_or_else(|| CriExecError::lookup(id.as_str(), "runtime returned no status"))?;
        Ok(translate::info_from_status(&status))
    }

    /// Looks up the first container whose Kubernetes container-name label
    /// equals `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ContainerLookupFailed`] if listing fails, no
    /// container carries the name, or its status cannot be read.
    pub fn container_by_name(&self, name: &str) -> Result<ContainerInfo> {
        let containers = self.list(name)?;
        let id = containers
            .iter()
            .find(|c| c.labels.get(CONTAINER_NAME_LABEL).is_some_and(|n| n == name))
            .map(|c| ContainerId::new(&c.id))
            .ok_or_else(|| CriExecError::lookup(name, "no container carries this name"))?;
        tracing::debug!(name, id = %id, "container name resolved");

        let response = self.status(&id, false).map_err(|e| match e {
            CriExecError::ContainerLookupFailed { message, .. } => {
                CriExecError::lookup(name, message)
            }
            other => other,
        })?;
        let status = response
            .status
            .ok_or_else(|| CriExecError::lookup(name, "runtime returned no status"))?;
        Ok(translate::info_from_status(&status))
    }

    /// Returns the first listed container matching `selector`.
    ///
    /// Listing order is defined by the runtime and not guaranteed stable.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ContainerLookupFailed`] if listing fails or no
    /// container matches.
    pub fn container_by_selector(&self, selector: &LabelSelector) -> Result<ContainerInfo> {
        let target = format!("selector {{{selector}}}");
        self.list(&target)?
            .iter()
            .find(|c| selector.matches(&c.labels))
            .map(translate::info_from_listing)
            .ok_or_else(|| CriExecError::lookup(target, "no container matches"))
    }

    /// Lists all containers matching `selector`, in runtime order.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::ContainerLookupFailed`] if listing fails.
    pub fn containers(&self, selector: &LabelSelector) -> Result<Vec<ContainerInfo>> {
        Ok(self
            .list("containers")?
            .iter()
            .filter(|c| selector.matches(&c.labels))
            .map(translate::info_from_listing)
            .collect())
    }

    /// Resolves the operating-system pid of the container's primary process.
    ///
    /// The value is only valid until that process exits; resolve it again
    /// for every use.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::PidResolutionFailed`] if the status RPC fails
    /// or the info blob does not carry a usable pid.
    pub fn pid_by_id(&self, id: &ContainerId) -> Result<Pid> {
        let response = self
            .service
            .container_status(ContainerStatusRequest {
                container_id: id.to_string(),
                verbose: true,
            })
            .map_err(|status| {
                CriExecError::pid(id.as_str(), format!("status RPC failed: {}", status.message()))
            })?;
        let pid = pid_from_info(id.as_str(), &response.info)?;
        tracing::debug!(id = %id, %pid, "container pid resolved");
        Ok(pid)
    }

    /// Stops the container with a 15 second grace period, then removes it.
    ///
    /// `force` is accepted for interface compatibility and does not change
    /// the stop/remove sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::LifecycleFailed`] if either RPC fails.
    pub fn remove_container(&self, id: &ContainerId, force: bool) -> Result<()> {
        tracing::info!(id = %id, force, "removing container");
        self.stop_and_remove(id, REMOVE_STOP_TIMEOUT_SECS)
    }

    /// Runs `command` through a shell inside the container's namespaces.
    ///
    /// See [`NsExec::run_command`] for the output contract: error-stream
    /// text from a successful run is returned as output, not as a failure.
    ///
    /// # Errors
    ///
    /// Returns the pid resolution error, or
    /// [`CriExecError::NamespaceExecFailed`] from the helper.
    pub fn exec_container(&self, id: &ContainerId, command: &str) -> Result<String> {
        let pid = self.pid_by_id(id)?;
        self.bridge.run_command(pid, command)
    }

    /// Uploads `src_file` (a gzip tarball) into the container and extracts it
    /// under `dst_path`.
    ///
    /// `extract_dir_name` and `overwrite` are accepted for interface
    /// compatibility; the extraction step alone decides the resulting layout
    /// and existing files are overwritten by `tar`.
    ///
    /// # Errors
    ///
    /// Returns the pid resolution error, [`CriExecError::Io`] for an
    /// unreadable source, or [`CriExecError::NamespaceExecFailed`] if either
    /// stage fails.
    pub fn copy_to_container(
        &self,
        id: &ContainerId,
        src_file: &Path,
        dst_path: &Path,
        extract_dir_name: &str,
        overwrite: bool,
    ) -> Result<()> {
        tracing::debug!(id = %id, extract_dir_name, overwrite, "copy options accepted");
        let pid = self.pid_by_id(id)?;
        self.bridge.copy_file(pid, src_file, dst_path)
    }

    pub(crate) fn stop_and_remove(&self, id: &ContainerId, timeout_secs: i64) -> Result<()> {
        self.service
            .stop_container(StopContainerRequest {
                container_id: id.to_string(),
                timeout: timeout_secs,
            })
            .map_err(|status| {
                CriExecError::lifecycle(LifecycleStage::Stop, id.as_str(), status.message())
            })?;
        self.service
            .remove_container(RemoveContainerRequest {
                container_id: id.to_string(),
            })
            .map_err(|status| {
                CriExecError::lifecycle(LifecycleStage::Remove, id.as_str(), status.message())
            })?;
        tracing::info!(id = %id, "container stopped and removed");
        Ok(())
    }

    fn status(&self, id: &ContainerId, verbose: bool) -> Result<ContainerStatusResponse> {
        self.service
            .container_status(ContainerStatusRequest {
                container_id: id.to_string(),
                verbose,
            })
            .map_err(|status| {
                CriExecError::lookup(id.as_str(), format!("status RPC failed: {}", status.message()))
            })
    }

    fn list(&self, target: &str) -> Result<Vec<Container>> {
        let response = self
            .service
            .list_containers(ListContainersRequest {
                filter: Some(ContainerFilter::default()),
            })
            .map_err(|status| {
                CriExecError::lookup(target, format!("list RPC failed: {}", status.message()))
            })?;
        tracing::debug!(count = response.containers.len(), "containers listed");
        Ok(response.containers)
    }
}
