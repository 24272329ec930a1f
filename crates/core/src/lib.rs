//! Shared building blocks for the analytics operations tools.
//!
//! Primitive type aliases, the configuration error type, env-var parsing
//! helpers and tracing setup used by every binary in the workspace.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;
