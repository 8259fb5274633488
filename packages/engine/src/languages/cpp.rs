use async_trait::async_trait;
use common::{Language, ProblemLimits};
use tokio::process::Command;

use super::{CompileOutcome, LanguageAdapter, wall_limit};
use crate::error::{EngineError, Result};
use crate::sandbox::{self, ProcessSpec, SandboxReport};
use crate::workspace::Workspace;

const SOURCE_FILE: &str = "solution.cpp";
const BINARY_NAME: &str = "solution";

/// Compiled language A: builds a native binary with g++, runs it directly.
pub struct CppAdapter {
    compiler: String,
}

impl CppAdapter {
    pub fn new(toolchain: &crate::config::ToolchainConfig) -> Self {
        Self {
            compiler: toolchain.cpp_compiler.clone(),
        }
    }
}

#[async_trait]
impl LanguageAdapter for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn source_filename(&self) -> &'static str {
        SOURCE_FILE
    }

    async fn compile(&self, workspace: &Workspace) -> Result<CompileOutcome> {
        let output = Command::new(&self.compiler)
            .args(["-O2", "-std=c++17", "-o", BINARY_NAME, SOURCE_FILE])
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
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(CompileOutcome::failed(format!("{stderr}{stdout}")))
        }
    }

    async fn run(
        &self,
        workspace: &Workspace,
        input: &str,
        limits: &ProblemLimits,
    ) -> Result<SandboxReport> {
        let spec = ProcessSpec {
            program: workspace
                .path()
                .join(BINARY_NAME)
                .to_string_lossy()
                .into_owned(),
            args: vec![],
            cwd: workspace.path().to_path_buf(),
        };
        sandbox::execute(&spec, input, wall_limit(limits)).await
    }
}
