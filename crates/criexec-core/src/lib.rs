//! # criexec-core
//!
//! OS-level half of criexec: entering a running container's namespaces
//! through an external helper program.
//!
//! - **Namespaces**: which namespaces of the target process to join and
//!   how that translates to helper arguments.
//! - **Bridge**: running a shell command, or streaming a file and
//!   extracting it, inside those namespaces.
//!
//! The helper is spawned fresh for every call and fully reaped before the
//! call returns.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod namespace;
pub mod nsexec;
