//! `runtime.v1` message types.
//!
//! Field numbers follow the upstream CRI `api.proto`. Only the fields this
//! client reads or writes are declared; unknown fields on the wire are
//! skipped by the decoder.

use std::collections::HashMap;

/// Lifecycle state of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ContainerState {
    /// Created but not started.
    ContainerCreated = 0,
    /// Running.
    ContainerRunning = 1,
    /// Primary process exited.
    ContainerExited = 2,
    /// State unknown to the runtime.
    ContainerUnknown = 3,
}

/// Request for `RuntimeService/Version`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionRequest {
    /// Version of the kubelet runtime API.
    #[prost(string, tag = "1")]
    pub version: String,
}

/// Response of `RuntimeService/Version`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionResponse {
    /// Version of the kubelet runtime API.
    #[prost(string, tag = "1")]
    pub version: String,
    /// Name of the container runtime.
    #[prost(string, tag = "2")]
    pub runtime_name: String,
    /// Version of the container runtime.
    #[prost(string, tag = "3")]
    pub runtime_version: String,
    /// API version of the container runtime.
    #[prost(string, tag = "4")]
    pub runtime_api_version: String,
}

/// Name and attempt of a container.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerMetadata {
    /// Container name.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Restart attempt.
    #[prost(uint32, tag = "2")]
    pub attempt: u32,
}

/// Image reference.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageSpec {
    /// Image name, tag or digest.
    #[prost(string, tag = "1")]
    pub image: String,
    /// Unstructured image annotations.
    #[prost(map = "string, string", tag = "2")]
    pub annotations: HashMap<String, String>,
}

/// Request for `RuntimeService/ContainerStatus`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerStatusRequest {
    /// Container to inspect.
    #[prost(string, tag = "1")]
    pub container_id: String,
    /// Request the runtime-specific `info` map.
    #[prost(bool, tag = "2")]
    pub verbose: bool,
}

/// Status of one container.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerStatus {
    /// Container id.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Container metadata.
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<ContainerMetadata>,
    /// Lifecycle state.
    #[prost(enumeration = "ContainerState", tag = "3")]
    pub state: i32,
    /// Creation time in nanoseconds.
    #[prost(int64, tag = "4")]
    pub created_at: i64,
    /// Start time in nanoseconds.
    #[prost(int64, tag = "5")]
    pub started_at: i64,
    /// Finish time in nanoseconds.
    #[prost(int64, tag = "6")]
    pub finished_at: i64,
    /// Exit code of the primary process.
    #[prost(int32, tag = "7")]
    pub exit_code: i32,
    /// Image spec.
    #[prost(message, optional, tag = "8")]
    pub image: Option<ImageSpec>,
    /// Resolved image reference.
    #[prost(string, tag = "9")]
    pub image_ref: String,
    /// Short reason for the current state.
    #[prost(string, tag = "10")]
    pub reason: String,
    /// Human-readable state message.
    #[prost(string, tag = "11")]
    pub message: String,
    /// Container labels.
    #[prost(map = "string, string", tag = "12")]
    pub labels: HashMap<String, String>,
    /// Container annotations.
    #[prost(map = "string, string", tag = "13")]
    pub annotations: HashMap<String, String>,
    /// Log file path.
    #[prost(string, tag = "15")]
    pub log_path: String,
}

/// Response of `RuntimeService/ContainerStatus`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerStatusResponse {
    /// Container status.
    #[prost(message, optional, tag = "1")]
    pub status: Option<ContainerStatus>,
    /// Runtime-specific verbose information; CRI-O stores a JSON blob under `info`.
    #[prost(map = "string, string", tag = "2")]
    pub info: HashMap<String, String>,
}

/// Wrapper for filtering by state.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ContainerStateValue {
    /// Required state.
    #[prost(enumeration = "ContainerState", tag = "1")]
    pub state: i32,
}

/// Server-side container filter; every set field must match.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerFilter {
    /// Container id.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Container state.
    #[prost(message, optional, tag = "2")]
    pub state: Option<ContainerStateValue>,
    /// Owning sandbox id.
    #[prost(string, tag = "3")]
    pub pod_sandbox_id: String,
    /// Labels that must match exactly.
    #[prost(map = "string, string", tag = "4")]
    pub label_selector: HashMap<String, String>,
}

/// Request for `RuntimeService/ListContainers`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListContainersRequest {
    /// Optional filter.
    #[prost(message, optional, tag = "1")]
    pub filter: Option<ContainerFilter>,
}

/// Summary of one container in a listing.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Container {
    /// Container id.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Owning sandbox id.
    #[prost(string, tag = "2")]
    pub pod_sandbox_id: String,
    /// Container metadata.
    #[prost(message, optional, tag = "3")]
    pub metadata: Option<ContainerMetadata>,
    /// Image spec.
    #[prost(message, optional, tag = "4")]
    pub image: Option<ImageSpec>,
    /// Resolved image reference.
    #[prost(string, tag = "5")]
    pub image_ref: String,
    /// Lifecycle state.
    #[prost(enumeration = "ContainerState", tag = "6")]
    pub state: i32,
    /// Creation time in nanoseconds.
    #[prost(int64, tag = "7")]
    pub created_at: i64,
    /// Container labels.
    #[prost(map = "string, string", tag = "8")]
    pub labels: HashMap<String, String>,
    /// Container annotations.
    #[prost(map = "string, string", tag = "9")]
    pub annotations: HashMap<String, String>,
}

/// Response of `RuntimeService/ListContainers`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListContainersResponse {
    /// Containers in runtime-defined order.
    #[prost(message, repeated, tag = "1")]
    pub containers: Vec<Container>,
}

/// Request for `RuntimeService/StartContainer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StartContainerRequest {
    /// Container to start.
    #[prost(string, tag = "1")]
    pub container_id: String,
}

/// Response of `RuntimeService/StartContainer`.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StartContainerResponse {}

/// Request for `RuntimeService/StopContainer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StopContainerRequest {
    /// Container to stop.
    #[prost(string, tag = "1")]
    pub container_id: String,
    /// Seconds to wait before forcibly killing.
    #[prost(int64, tag = "2")]
    pub timeout: i64,
}

/// Response of `RuntimeService/StopContainer`.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StopContainerResponse {}

/// Request for `RuntimeService/RemoveContainer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveContainerRequest {
    /// Container to remove.
    #[prost(string, tag = "1")]
    pub container_id: String,
}

/// Response of `RuntimeService/RemoveContainer`.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RemoveContainerResponse {}

/// Environment variable.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyValue {
    /// Variable name.
    #[prost(string, tag = "1")]
    pub key: String,
    /// Variable value.
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Linux cgroup resources.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LinuxContainerResources {
    /// CFS period.
    #[prost(int64, tag = "1")]
    pub cpu_period: i64,
    /// CFS quota.
    #[prost(int64, tag = "2")]
    pub cpu_quota: i64,
    /// CPU shares.
    #[prost(int64, tag = "3")]
    pub cpu_shares: i64,
    /// Memory limit in bytes.
    #[prost(int64, tag = "4")]
    pub memory_limit_in_bytes: i64,
}

/// Linux-specific container configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LinuxContainerConfig {
    /// Resource limits.
    #[prost(message, optional, tag = "1")]
    pub resources: Option<LinuxContainerResources>,
}

/// Container creation configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerConfig {
    /// Container metadata.
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<ContainerMetadata>,
    /// Image to run.
    #[prost(message, optional, tag = "2")]
    pub image: Option<ImageSpec>,
    /// Command (entrypoint override).
    #[prost(string, repeated, tag = "3")]
    pub command: Vec<String>,
    /// Arguments to the command.
    #[prost(string, repeated, tag = "4")]
    pub args: Vec<String>,
    /// Working directory.
    #[prost(string, tag = "5")]
    pub working_dir: String,
    /// Environment variables.
    #[prost(message, repeated, tag = "6")]
    pub envs: Vec<KeyValue>,
    /// Labels.
    #[prost(map = "string, string", tag = "9")]
    pub labels: HashMap<String, String>,
    /// Annotations.
    #[prost(map = "string, string", tag = "10")]
    pub annotations: HashMap<String, String>,
    /// Linux-specific configuration.
    #[prost(message, optional, tag = "15")]
    pub linux: Option<LinuxContainerConfig>,
}

/// Sandbox metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PodSandboxMetadata {
    /// Sandbox name.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Sandbox uid.
    #[prost(string, tag = "2")]
    pub uid: String,
    /// Sandbox namespace.
    #[prost(string, tag = "3")]
    pub namespace: String,
    /// Restart attempt.
    #[prost(uint32, tag = "4")]
    pub attempt: u32,
}

/// Sandbox configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PodSandboxConfig {
    /// Sandbox metadata.
    #[prost(message, optional, tag = "1")]
    pub metadata: Option<PodSandboxMetadata>,
    /// Hostname.
    #[prost(string, tag = "2")]
    pub hostname: String,
    /// Labels.
    #[prost(map = "string, string", tag = "6")]
    pub labels: HashMap<String, String>,
}

/// Request for `RuntimeService/CreateContainer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateContainerRequest {
    /// Sandbox to create the container in.
    #[prost(string, tag = "1")]
    pub pod_sandbox_id: String,
    /// Container configuration.
    #[prost(message, optional, tag = "2")]
    pub config: Option<ContainerConfig>,
    /// Configuration of the owning sandbox.
    #[prost(message, optional, tag = "3")]
    pub sandbox_config: Option<PodSandboxConfig>,
}

/// Response of `RuntimeService/CreateContainer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateContainerResponse {
    /// Id of the created container.
    #[prost(string, tag = "1")]
    pub container_id: String,
}

/// Request for `RuntimeService/ExecSync`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecSyncRequest {
    /// Container to exec in.
    #[prost(string, tag = "1")]
    pub container_id: String,
    /// Command line.
    #[prost(string, repeated, tag = "2")]
    pub cmd: Vec<String>,
    /// Timeout in seconds; zero means no timeout.
    #[prost(int64, tag = "3")]
    pub timeout: i64,
}

/// Response of `RuntimeService/ExecSync`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecSyncResponse {
    /// Captured standard output.
    #[prost(bytes = "vec", tag = "1")]
    pub stdout: Vec<u8>,
    /// Captured standard error.
    #[prost(bytes = "vec", tag = "2")]
    pub stderr: Vec<u8>,
    /// Exit code of the command.
    #[prost(int32, tag = "3")]
    pub exit_code: i32,
}

/// Request for `ImageService/ImageStatus`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageStatusRequest {
    /// Image to inspect.
    #[prost(message, optional, tag = "1")]
    pub image: Option<ImageSpec>,
    /// Request verbose information.
    #[prost(bool, tag = "2")]
    pub verbose: bool,
}

/// Image known to the runtime.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Image {
    /// Image id.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Tags.
    #[prost(string, repeated, tag = "2")]
    pub repo_tags: Vec<String>,
    /// Digests.
    #[prost(string, repeated, tag = "3")]
    pub repo_digests: Vec<String>,
    /// Size in bytes.
    #[prost(uint64, tag = "4")]
    pub size: u64,
}

/// Response of `ImageService/ImageStatus`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageStatusResponse {
    /// The image, absent when not present locally.
    #[prost(message, optional, tag = "1")]
    pub image: Option<Image>,
    /// Verbose information.
    #[prost(map = "string, string", tag = "2")]
    pub info: HashMap<String, String>,
}

/// Request for `ImageService/PullImage`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PullImageRequest {
    /// Image to pull.
    #[prost(message, optional, tag = "1")]
    pub image: Option<ImageSpec>,
}

/// Response of `ImageService/PullImage`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PullImageResponse {
    /// Reference of the pulled image.
    #[prost(string, tag = "1")]
    pub image_ref: String,
}
