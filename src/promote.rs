//! Promotion of staged files into the shared destination directory.
//!
//! A hard link makes the file appear under its final name in one step, with
//! its content already complete. The workspace copy is then unlinked.
//! Workspace and destination must live on the same filesystem.

use crate::error::{DetachError, Result};
use crate::model::staged::StagedFile;

/// Promote `staged` files in order, stopping at the first failure.
///
/// There is no rollback: files promoted before a failure stay delivered.
pub fn promote(staged: &[StagedFile]) -> Result<()> {
    for file in staged {
        promote_one(file)?;
    }
    Ok(())
}

fn promote_one(file: &StagedFile) -> Result<()> {
    std::fs::hard_link(&file.staged_path, &file.final_path).map_err(|source| {
        DetachError::Link {
            from: file.staged_path.clone(),
            to: file.final_path.clone(),
            source,
        }
    })?;
    tracing::debug!(path = %file.final_path.display(), size = file.size, "Promoted");

    // The delivered copy is already visible; a leftover staged copy is
    // swept away with the workspace.
    std::fs::remove_file(&file.staged_path).map_err(|source| DetachError::Unlink {
        path: file.staged_path.clone(),
        source,
    })
}
