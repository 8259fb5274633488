use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{EngineError, Result};

/// Filesystem arena for one judging attempt.
///
/// Every attempt gets its own uniquely named directory (derived from the
/// submission id, which is a UUID), so concurrent attempts never share a
/// path or a fixed filename. The directory and everything the compiler or
/// the program wrote into it are removed when the handle is dropped,
/// whichever way the attempt ended.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create the attempt's directory under `root`.
    ///
    /// The submission id becomes part of the directory name, so ids are
    /// restricted to `[A-Za-z0-9_-]`. Anything else (path separators,
    /// `..`, empty ids) is rejected before it can name, create, or later
    /// delete a path outside `root`.
    pub fn create(root: &Path, submission_id: &str) -> Result<Self> {
        if submission_id.is_empty()
            || !submission_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(EngineError::Workspace(format!(
                "invalid submission id {submission_id:?}: expected [A-Za-z0-9_-]"
            )));
        }
        let path = root.join(format!("gavel-{submission_id}"));
        fs::create_dir_all(&path).map_err(|e| {
            EngineError::Workspace(format!("failed to create {}: {e}", path.display()))
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the submission's source file inside the workspace.
    pub fn write_source(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        let file = self.path.join(filename);
        fs::write(&file, contents)?;
        Ok(file)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Removal failure is logged, never fatal: a leaked directory must
        // not turn a finished judging run into an error.
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to clean up workspace");
            }
        }
    }
}
