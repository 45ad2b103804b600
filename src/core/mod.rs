//! Core library components.
//!
//! The idempotent primitives (line appends, secret persistence, tool
//! provisioning), the host and multiplexer boundaries, and the orchestrator
//! that sequences them.

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod host;
pub mod lines;
pub mod platform;
pub mod secrets;
pub mod session;
pub mod tmux;
pub mod tools;
pub mod validation;
