use async_trait::async_trait;
use common::{Language, ProblemLimits};

use super::{CompileOutcome, LanguageAdapter, wall_limit};
use crate::error::Result;
use crate::sandbox::{self, ProcessSpec, SandboxReport};
use crate::workspace::Workspace;

const SOURCE_FILE: &str = "solution.py";

/// Interpreted language A: no build step, the interpreter runs the source
/// directly. Syntax errors therefore surface as runtime errors.
pub struct PythonAdapter {
    interpreter: String,
}

impl PythonAdapter {
    pub fn new(toolchain: &crate::config::ToolchainConfig) -> Self {
        Self {
            interpreter: toolchain.python.clone(),
        }
    }
}

#[async_trait]
impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn source_filename(&self) -> &'static str {
        SOURCE_FILE
    }

    async fn compile(&self, _workspace: &Workspace) -> Result<CompileOutcome> {
        Ok(CompileOutcome::ok())
    }

    async fn run(
        &self,
        workspace: &Workspace,
        input: &str,
        limits: &ProblemLimits,
    ) -> Result<SandboxReport> {
        let spec = ProcessSpec {
            program: self.interpreter.clone(),
            args: vec![workspace
                .path()
                .join(SOURCE_FILE)
                .to_string_lossy()
                .into_owned()],
            cwd: workspace.path().to_path_buf(),
        };
        sandbox::execute(&spec, input, wall_limit(limits)).await
    }
}
