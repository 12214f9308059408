//! CRI runtime client for the criexec workspace.
//!
//! Bridges the structured container-runtime RPC interface and raw namespace
//! entry: containers are located and managed over CRI, while commands and
//! file uploads go through the namespace-entry helper using the pid the
//! runtime reports.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod client;
pub mod cri;
pub mod ephemeral;
pub mod pid;
pub mod service;
pub mod translate;
pub mod transport;

pub use client::RuntimeClient;
pub use ephemeral::{EphemeralError, EphemeralSpec, ExecOutcome};
pub use service::CriService;
pub use transport::GrpcTransport;
