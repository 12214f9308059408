//! Blocking gRPC transport to the container runtime.
//!
//! Owns a private tokio runtime and exposes the async tonic clients as
//! blocking calls. The connection is multiplexed, so one transport can be
//! shared by reference across threads. Do not drop a transport from inside
//! another async runtime.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use criexec_common::config::ClientConfig;
use criexec_common::constants::NAMESPACE_METADATA_KEY;
use criexec_common::error::{CriExecError, Result};
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint, Uri};
use tonic::{Request, Response, Status};
use tower::service_fn;

use crate::cri::v1::{
    ContainerStatusRequest, ContainerStatusResponse, CreateContainerRequest,
    CreateContainerResponse, ExecSyncRequest, ExecSyncResponse, ImageStatusRequest,
    ImageStatusResponse, ListContainersRequest, ListContainersResponse, PullImageRequest,
    PullImageResponse, RemoveContainerRequest, StartContainerRequest, StopContainerRequest,
    VersionRequest, VersionResponse,
};
use crate::cri::{ImageServiceClient, RuntimeServiceClient};
use crate::service::CriService;

/// Live connection to a CRI endpoint.
pub struct GrpcTransport {
    runtime: tokio::runtime::Runtime,
    runtime_service: RuntimeServiceClient,
    image_service: ImageServiceClient,
    namespace: MetadataValue<Ascii>,
    cancel: CancellationToken,
    endpoint: String,
}

impl std::fmt::Debug for GrpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcTransport")
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl GrpcTransport {
    /// Dials the configured endpoint, blocking until the connection is up
    /// or the connect deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`CriExecError::Config`] for a namespace that cannot be sent
    /// as gRPC metadata, and [`CriExecError::ConnectionFailed`] when the dial
    /// fails or times out.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Self::connect_with(config, |endpoint| async move { dial(&endpoint).await })
    }

    /// Like [`GrpcTransport::connect`], but establishes the channel through
    /// `dialer`, which receives the normalised endpoint.
    fn connect_with<D, Fut>(config: &ClientConfig, dialer: D) -> Result<Self>
    where
        D: FnOnce(String) -> Fut,
        Fut: Future<Output = std::result::Result<Channel, tonic::transport::Error>>,
    {
        let endpoint = config.endpoint().to_string();
        let namespace: MetadataValue<Ascii> =
            config.namespace().parse().map_err(|e| CriExecError::Config {
                message: format!("invalid namespace {:?}: {e}", config.namespace()),
            })?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("criexec-rpc")
            .enable_all()
            .build()
            .map_err(|e| CriExecError::ConnectionFailed {
                endpoint: endpoint.clone(),
                message: format!("failed to start RPC runtime: {e}"),
                timed_out: false,
            })?;

        let deadline = config.connect_timeout();
        tracing::info!(endpoint = %endpoint, namespace = config.namespace(), "connecting to container runtime");
        let dialed = runtime
            .block_on(async { tokio::time::timeout(deadline, dialer(endpoint.clone())).await });
        let channel = match dialed {
            Err(_) => {
                return Err(CriExecError::ConnectionFailed {
                    endpoint,
                    message: format!("deadline exceeded after {}s", deadline.as_secs()),
                    timed_out: true,
                });
            }
            Ok(Err(e)) => {
                return Err(CriExecError::ConnectionFailed {
                    endpoint,
                    message: error_chain(&e),
                    timed_out: false,
                });
            }
            Ok(Ok(channel)) => channel,
        };
        tracing::debug!(endpoint = %endpoint, "runtime connection established");

        Ok(Self {
            runtime,
            runtime_service: RuntimeServiceClient::new(channel.clone()),
            image_service: ImageServiceClient::new(channel),
            namespace,
            cancel: CancellationToken::new(),
            endpoint,
        })
    }

    /// Returns the endpoint this transport is connected to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns a handle that cancels this transport from any thread.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fails every in-flight and future call with `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Releases the connection and the private runtime.
    pub fn close(self) {
        tracing::debug!(endpoint = %self.endpoint, "closing runtime connection");
        let Self {
            runtime,
            runtime_service,
            image_service,
            cancel,
            ..
        } = self;
        cancel.cancel();
        drop(runtime_service);
        drop(image_service);
        runtime.shutdown_timeout(Duration::from_secs(1));
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        let _ = request
            .metadata_mut()
            .insert(NAMESPACE_METADATA_KEY, self.namespace.clone());
        request
    }

    fn call<T, F>(&self, rpc: &'static str, fut: F) -> std::result::Result<T, Status>
    where
        F: Future<Output = std::result::Result<Response<T>, Status>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Status::cancelled(format!("{rpc}: client context cancelled")));
        }
        tracing::trace!(rpc, "issuing CRI call");
        self.runtime.block_on(async {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    Err(Status::cancelled(format!("{rpc}: client context cancelled")))
                }
                result = fut => result.map(Response::into_inner),
            }
        })
    }
}

impl CriService for GrpcTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn version(&self, request: VersionRequest) -> std::result::Result<VersionResponse, Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("Version", async move { client.version(request).await })
    }

    fn container_status(
        &self,
        request: ContainerStatusRequest,
    ) -> std::result::Result<ContainerStatusResponse, Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("ContainerStatus", async move {
            client.container_status(request).await
        })
    }

    fn list_containers(
        &self,
        request: ListContainersRequest,
    ) -> std::result::Result<ListContainersResponse, Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("ListContainers", async move {
            client.list_containers(request).await
        })
    }

    fn create_container(
        &self,
        request: CreateContainerRequest,
    ) -> std::result::Result<CreateContainerResponse, Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("CreateContainer", async move {
            client.create_container(request).await
        })
    }

    fn start_container(&self, request: StartContainerRequest) -> std::result::Result<(), Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("StartContainer", async move {
            client.start_container(request).await
        })
        .map(|_| ())
    }

    fn stop_container(&self, request: StopContainerRequest) -> std::result::Result<(), Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("StopContainer", async move {
            client.stop_container(request).await
        })
        .map(|_| ())
    }

    fn remove_container(&self, request: RemoveContainerRequest) -> std::result::Result<(), Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("RemoveContainer", async move {
            client.remove_container(request).await
        })
        .map(|_| ())
    }

    fn exec_sync(&self, request: ExecSyncRequest) -> std::result::Result<ExecSyncResponse, Status> {
        let mut client = self.runtime_service.clone();
        let request = self.request(request);
        self.call("ExecSync", async move { client.exec_sync(request).await })
    }

    fn image_status(
        &self,
        request: ImageStatusRequest,
    ) -> std::result::Result<ImageStatusResponse, Status> {
        let mut client = self.image_service.clone();
        let request = self.request(request);
        self.call("ImageStatus", async move { client.image_status(request).await })
    }

    fn pull_image(&self, request: PullImageRequest) -> std::result::Result<PullImageResponse, Status> {
        let mut client = self.image_service.clone();
        let request = self.request(request);
        self.call("PullImage", async move { client.pull_image(request).await })
    }
}

/// Returns the socket path for `unix://` or absolute-path endpoints.
#[must_use]
pub fn socket_path(endpoint: &str) -> Option<PathBuf> {
    if let Some(path) = endpoint.strip_prefix("unix://") {
        return Some(PathBuf::from(path));
    }
    endpoint.starts_with('/').then(|| PathBuf::from(endpoint))
}

async fn dial(endpoint: &str) -> std::result::Result<Channel, tonic::transport::Error> {
    match socket_path(endpoint) {
        Some(path) => {
            // The URI is ignored by the connector; tonic only needs a valid authority.
            Endpoint::from_static("http://[::]:50051")
                .connect_with_connector(service_fn(move |_: Uri| {
                    let path = path.clone();
                    async move {
                        let stream = UnixStream::connect(path).await?;
                        Ok::<_, std::io::Error>(TokioIo::new(stream))
                    }
                }))
                .await
        }
        None => Endpoint::from_shared(endpoint.to_string())?.connect().await,
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::os::unix::net::UnixListener;
    use std::thread;
    use std::time::Instant;

    use super::*;

    /// Binds a socket that accepts connections and never answers.
    fn silent_socket(dir: &std::path::Path) -> ClientConfig {
        let path = dir.join("silent.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let _ = thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        ClientConfig {
            endpoint: format!("unix://{}", path.display()),
            connect_timeout_secs: 5,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn unix_scheme_yields_socket_path() {
        assert_eq!(
            socket_path("unix:///var/run/crio/crio.sock"),
            Some(PathBuf::from("/var/run/crio/crio.sock"))
        );
    }

    #[test]
    fn absolute_path_is_a_socket() {
        assert_eq!(
            socket_path("/run/containerd/containerd.sock"),
            Some(PathBuf::from("/run/containerd/containerd.sock"))
        );
    }

    #[test]
    fn http_endpoint_is_not_a_socket() {
        assert_eq!(socket_path("http://127.0.0.1:10010"), None);
    }

    #[test]
    fn connect_to_missing_socket_fails_without_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            endpoint: format!("unix://{}", dir.path().join("absent.sock").display()),
            connect_timeout_secs: 2,
            ..ClientConfig::default()
        };

        let err = GrpcTransport::connect(&config).unwrap_err();
        assert!(matches!(
            err,
            CriExecError::ConnectionFailed {
                timed_out: false,
                ..
            }
        ));
    }

    #[test]
    fn namespace_must_be_valid_metadata() {
        let config = ClientConfig {
            namespace: "bad\nnamespace".into(),
            ..ClientConfig::default()
        };

        let err = GrpcTransport::connect(&config).unwrap_err();
        assert!(matches!(err, CriExecError::Config { .. }));
    }

    #[test]
    fn dial_past_deadline_is_reported_as_timeout() {
        let config = ClientConfig {
            connect_timeout_secs: 1,
            ..ClientConfig::default()
        };

        let err = GrpcTransport::connect_with(&config, |_| {
            std::future::pending::<std::result::Result<Channel, tonic::transport::Error>>()
        })
        .unwrap_err();
        match err {
            CriExecError::ConnectionFailed {
                timed_out, message, ..
            } => {
                assert!(timed_out);
                assert!(message.contains("deadline exceeded"));
            }
            other => unreachable!("expected connection failure, got {other}"),
        }
    }

    #[test]
    fn cancel_fails_in_flight_and_later_calls() {
        let dir = tempfile::tempdir().unwrap();
        let transport = GrpcTransport::connect(&silent_socket(dir.path())).unwrap();
        let token = transport.cancellation_token();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            token.cancel();
        });

        let started = Instant::now();
        let in_flight = transport
            .version(VersionRequest::default())
            .unwrap_err();
        assert_eq!(in_flight.code(), tonic::Code::Cancelled);
        assert!(in_flight.message().contains("Version"));
        assert!(started.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();

        let later = transport
            .list_containers(ListContainersRequest::default())
            .unwrap_err();
        assert_eq!(later.code(), tonic::Code::Cancelled);
    }

    #[test]
    fn close_cancels_outstanding_handles() {
        let dir = tempfile::tempdir().unwrap();
        let transport = GrpcTransport::connect(&silent_socket(dir.path())).unwrap();
        let token = transport.cancellation_token();
        assert!(!token.is_cancelled());

        transport.close();
        assert!(token.is_cancelled());
    }
}
