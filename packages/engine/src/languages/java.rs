use async_trait::async_trait;
use common::{Language, ProblemLimits};
use tokio::process::Command;

use super::{CompileOutcome, LanguageAdapter, wall_limit};
use crate::error::{EngineError, Result};
use crate::sandbox::{self, ProcessSpec, SandboxReport};
use crate::workspace::Workspace;

const SOURCE_FILE: &str = "Main.java";
const MAIN_CLASS: &str = "Main";

/// Compiled language B: javac produces class files in the workspace, the
/// JVM runs them with the workspace on the class path.
pub struct JavaAdapter {
    compiler: String,
    runtime: String,
}

impl JavaAdapter {
    pub fn new(toolchain: &crate::config::ToolchainConfig) -> Self {
        Self {
            compiler: toolchain.java_compiler.clone(),
            runtime: toolchain.java_runtime.clone(),
        }
    }
}

#[async_trait]
impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn source_filename(&self) -> &'static str {
        SOURCE_FILE
    }

    async fn compile(&self, workspace: &Workspace) -> Result<CompileOutcome> {
        let output = Command::new(&self.compiler)
            .arg(SOURCE_FILE)
            .current_dir(workspace.path())
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.compiler.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(CompileOutcome::ok())
        } else {
            Ok(CompileOutcome::failed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }

    async fn run(
        &self,
        workspace: &Workspace,
        input: &str,
        limits: &ProblemLimits,
    ) -> Result<SandboxReport> {
        // Twice the problem's cap as JVM heap headroom: the verdict still
        // comes from the engine's memory check, not from the JVM dying
        // at exactly the limit.
        let heap = limits.memory_limit_mb.saturating_mul(2);
        let spec = ProcessSpec {
            program: self.runtime.clone(),
            args: vec![
                format!("-Xmx{heap}m"),
                "-cp".into(),
                workspace.path().to_string_lossy().into_owned(),
                MAIN_CLASS.into(),
            ],
            cwd: workspace.path().to_path_buf(),
        };
        sandbox::execute(&spec, input, wall_limit(limits)).await
    }
}
