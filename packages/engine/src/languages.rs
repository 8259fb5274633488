//! Per-language compile/run strategies.
//!
//! One algorithm drives every language; the adapters only supply the
//! compile command (if any) and the run command. Each `run` spawns a fresh
//! process per test case instead of reusing a long-lived one, a deliberate
//! simplicity/isolation tradeoff that guarantees no state leaks between
//! test cases.

pub mod cpp;
pub mod java;
pub mod python;

use std::time::Duration;

use async_trait::async_trait;
use common::{Language, ProblemLimits};

use crate::config::ToolchainConfig;
use crate::error::Result;
use crate::sandbox::SandboxReport;
use crate::workspace::Workspace;

/// Outcome of the (at most one) compile step for a submission.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub success: bool,
    /// Compiler output, preserved verbatim for the end user.
    pub diagnostics: String,
}

impl CompileOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            diagnostics: String::new(),
        }
    }

    pub fn failed(diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Strategy object providing per-language compile and run behavior.
#[async_trait]
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Filename the source is written under inside the workspace.
    fn source_filename(&self) -> &'static str;

    /// Build the submission. A no-op that always succeeds for
    /// interpreted languages.
    async fn compile(&self, workspace: &Workspace) -> Result<CompileOutcome>;

    /// Execute the built submission against one test case's input,
    /// bounded by the problem's limits.
    async fn run(
        &self,
        workspace: &Workspace,
        input: &str,
        limits: &ProblemLimits,
    ) -> Result<SandboxReport>;
}

/// Resolve the adapter for a language.
pub fn adapter_for(language: Language, toolchain: &ToolchainConfig) -> Box<dyn LanguageAdapter> {
    match language {
        Language::Cpp => Box::new(cpp::CppAdapter::new(toolchain)),
        Language::Java => Box::new(java::JavaAdapter::new(toolchain)),
        Language::Python => Box::new(python::PythonAdapter::new(toolchain)),
    }
}

/// Per-test-case wall-clock deadline from the problem's time limit.
pub(crate) fn wall_limit(limits: &ProblemLimits) -> Duration {
    Duration::from_secs(u64::from(limits.time_limit_secs))
}
