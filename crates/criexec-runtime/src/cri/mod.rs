//! Container Runtime Interface (`runtime.v1`) protocol.
//!
//! Message types mirror the upstream protobuf definitions and are encoded
//! with `prost`; the service clients drive them over a tonic channel.

pub mod client;
pub mod v1;

pub use client::{ImageServiceClient, RuntimeServiceClient};
