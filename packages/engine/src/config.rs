use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Compiler and interpreter binaries the language adapters shell out to.
#[derive(Debug, Deserialize, Clone)]
pub struct ToolchainConfig {
    /// C++ compiler. Default: "g++".
    #[serde(default = "default_cpp_compiler")]
    pub cpp_compiler: String,
    /// Java compiler. Default: "javac".
    #[serde(default = "default_java_compiler")]
    pub java_compiler: String,
    /// Java runtime. Default: "java".
    #[serde(default = "default_java_runtime")]
    pub java_runtime: String,
    /// Python interpreter. Default: "python3".
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_cpp_compiler() -> String {
    "g++".into()
}
fn default_java_compiler() -> String {
    "javac".into()
}
fn default_java_runtime() -> String {
    "java".into()
}
fn default_python() -> String {
    "python3".into()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cpp_compiler: default_cpp_compiler(),
            java_compiler: default_java_compiler(),
            java_runtime: default_java_runtime(),
            python: default_python(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Directory under which per-attempt workspaces are created.
    /// Default: the system temp directory.
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
    /// Cap on concurrently judged submissions, and therefore on
    /// concurrent child processes. Default: 4.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_submissions: usize,
    /// Stop at the first fatal verdict (timeout, memory limit, runtime
    /// error) instead of running every test case. Default: true.
    #[serde(default = "default_stop_on_first_failure")]
    pub stop_on_first_failure: bool,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir()
}
fn default_max_concurrent() -> usize {
    4
}
fn default_stop_on_first_failure() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            max_concurrent_submissions: default_max_concurrent(),
            stop_on_first_failure: default_stop_on_first_failure(),
            toolchain: ToolchainConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("GAVEL_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default(
                "workspace_root",
                default_workspace_root().to_string_lossy().to_string(),
            )?
            .set_default("max_concurrent_submissions", default_max_concurrent() as i64)?
            .set_default("stop_on_first_failure", true)?
            .set_default("toolchain.cpp_compiler", default_cpp_compiler())?
            .set_default("toolchain.java_compiler", default_java_compiler())?
            .set_default("toolchain.java_runtime", default_java_runtime())?
            .set_default("toolchain.python", default_python())?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("GAVEL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
