//! RPC surface consumed by the runtime client.

use tonic::Status;

use crate::cri::v1::{
    ContainerStatusRequest, ContainerStatusResponse, CreateContainerRequest,
    CreateContainerResponse, ExecSyncRequest, ExecSyncResponse, ImageStatusRequest,
    ImageStatusResponse, ListContainersRequest, ListContainersResponse, PullImageRequest,
    PullImageResponse, RemoveContainerRequest, StartContainerRequest, StopContainerRequest,
    VersionRequest, VersionResponse,
};

/// Blocking view of the CRI runtime and image services.
///
/// [`crate::transport::GrpcTransport`] is the production implementation;
/// anything else implementing this trait can stand in for the runtime.
/// Each call either returns the decoded response or the gRPC status, with no
/// retry.
pub trait CriService: Send + Sync {
    /// Endpoint the service talks to, for error reporting.
    fn endpoint(&self) -> &str;

    /// `RuntimeService/Version`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn version(&self, request: VersionRequest) -> Result<VersionResponse, Status>;

    /// `RuntimeService/ContainerStatus`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn container_status(
        &self,
        request: ContainerStatusRequest,
    ) -> Result<ContainerStatusResponse, Status>;

    /// `RuntimeService/ListContainers`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn list_containers(
        &self,
        request: ListContainersRequest,
    ) -> Result<ListContainersResponse, Status>;

    /// `RuntimeService/CreateContainer`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn create_container(
        &self,
        request: CreateContainerRequest,
    ) -> Result<CreateContainerResponse, Status>;

    /// `RuntimeService/StartContainer`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn start_container(&self, request: StartContainerRequest) -> Result<(), Status>;

    /// `RuntimeService/StopContainer`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn stop_container(&self, request: StopContainerRequest) -> Result<(), Status>;

    /// `RuntimeService/RemoveContainer`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn remove_container(&self, request: RemoveContainerRequest) -> Result<(), Status>;

    /// `RuntimeService/ExecSync`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn exec_sync(&self, request: ExecSyncRequest) -> Result<ExecSyncResponse, Status>;

    /// `ImageService/ImageStatus`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn image_status(&self, request: ImageStatusRequest) -> Result<ImageStatusResponse, Status>;

    /// `ImageService/PullImage`.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the runtime or transport.
    fn pull_image(&self, request: PullImageRequest) -> Result<PullImageResponse, Status>;
}
