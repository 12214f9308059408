//! Unary gRPC clients for the `runtime.v1` services.
//!
//! Written against `tonic::client::Grpc` the same way `tonic-build` emits
//! clients, restricted to the calls this crate makes.

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

use super::v1::{
    ContainerStatusRequest, ContainerStatusResponse, CreateContainerRequest,
    CreateContainerResponse, ExecSyncRequest, ExecSyncResponse, ImageStatusRequest,
    ImageStatusResponse, ListContainersRequest, ListContainersResponse, PullImageRequest,
    PullImageResponse, RemoveContainerRequest, RemoveContainerResponse, StartContainerRequest,
    StartContainerResponse, StopContainerRequest, StopContainerResponse, VersionRequest,
    VersionResponse,
};

async fn unary<Req, Resp>(
    inner: &mut tonic::client::Grpc<Channel>,
    request: Request<Req>,
    path: &'static str,
) -> Result<Response<Resp>, Status>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    inner
        .ready()
        .await
        .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))?;
    let codec = tonic::codec::ProstCodec::default();
    inner
        .unary(request, PathAndQuery::from_static(path), codec)
        .await
}

macro_rules! rpc {
    ($(#[$doc:meta])* $name:ident, $req:ty, $resp:ty, $path:literal) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns the gRPC status reported by the runtime or the transport.
        pub async fn $name(
            &mut self,
            request: impl tonic::IntoRequest<$req>,
        ) -> Result<Response<$resp>, Status> {
            unary(&mut self.inner, request.into_request(), $path).await
        }
    };
}

/// Client for `runtime.v1.RuntimeService`.
#[derive(Debug, Clone)]
pub struct RuntimeServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl RuntimeServiceClient {
    /// Wraps an established channel.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    rpc!(
        /// Reports runtime name and version.
        version,
        VersionRequest,
        VersionResponse,
        "/runtime.v1.RuntimeService/Version"
    );
    rpc!(
        /// Returns the status of one container.
        container_status,
        ContainerStatusRequest,
        ContainerStatusResponse,
        "/runtime.v1.RuntimeService/ContainerStatus"
    );
    rpc!(
        /// Lists containers.
        list_containers,
        ListContainersRequest,
        ListContainersResponse,
        "/runtime.v1.RuntimeService/ListContainers"
    );
    rpc!(
        /// Creates a container.
        create_container,
        CreateContainerRequest,
        CreateContainerResponse,
        "/runtime.v1.RuntimeService/CreateContainer"
    );
    rpc!(
        /// Starts a created container.
        start_container,
        StartContainerRequest,
        StartContainerResponse,
        "/runtime.v1.RuntimeService/StartContainer"
    );
    rpc!(
        /// Stops a running container.
        stop_container,
        StopContainerRequest,
        StopContainerResponse,
        "/runtime.v1.RuntimeService/StopContainer"
    );
    rpc!(
        /// Removes a container.
        remove_container,
        RemoveContainerRequest,
        RemoveContainerResponse,
        "/runtime.v1.RuntimeService/RemoveContainer"
    );
    rpc!(
        /// Runs a command synchronously inside a container.
        exec_sync,
        ExecSyncRequest,
        ExecSyncResponse,
        "/runtime.v1.RuntimeService/ExecSync"
    );
}

/// Client for `runtime.v1.ImageService`.
#[derive(Debug, Clone)]
pub struct ImageServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl ImageServiceClient {
    /// Wraps an established channel.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    rpc!(
        /// Returns the status of an image.
        image_status,
        ImageStatusRequest,
        ImageStatusResponse,
        "/runtime.v1.ImageService/ImageStatus"
    );
    rpc!(
        /// Pulls an image.
        pull_image,
        PullImageRequest,
        PullImageResponse,
        "/runtime.v1.ImageService/PullImage"
    );
}
