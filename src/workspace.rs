//! Per-job private staging directory.
//!
//! A [`Workspace`] is created inside the destination directory and removed,
//! with everything still in it, when the guard goes out of scope. Early
//! returns through `?` therefore never leak a staging directory.

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{DetachError, Result};
use crate::model::job::Job;

/// Owner-only permissions for the staging directory.
#[cfg(unix)]
const WORKSPACE_MODE: u32 = 0o700;

/// Guard owning the job's staging directory.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create `job.work_dir` as a new, owner-only directory.
    ///
    /// The destination directory must already exist, and the work directory
    /// must not.
    pub fn create(job: &Job) -> Result<Self> {
        let path = job.work_dir.clone();

        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(WORKSPACE_MODE);
        }

        builder
            .create(&path)
            .map_err(|source| DetachError::Workspace {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Created workspace");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `file_name` inside the workspace.
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Remove the workspace now instead of at end of scope.
    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed workspace"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove workspace"
            ),
        }
    }
}
