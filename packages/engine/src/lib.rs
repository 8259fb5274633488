//! Code execution and judging engine.
//!
//! Takes a submission, a language, and an ordered list of test cases bound
//! to resource limits, and produces a verified verdict with timing and
//! memory metrics. Untrusted code runs in per-attempt workspaces behind a
//! wall-clock deadline; there is no OS-level isolation here, so production
//! deployments must wrap child processes in a container/cgroup sandbox.

pub mod compare;
pub mod config;
pub mod error;
pub mod judge;
pub mod languages;
pub mod sandbox;
pub mod workspace;

pub use config::{EngineConfig, ToolchainConfig};
pub use error::{EngineError, Result};
pub use judge::Judge;
