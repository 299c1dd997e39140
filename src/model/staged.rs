//! Files materialized in the workspace.

use std::path::PathBuf;

/// An attachment fully written and closed inside the workspace,
/// waiting to be promoted into the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Name shared by the staged and the delivered copy.
    pub file_name: String,

    /// `work_dir/file_name`.
    pub staged_path: PathBuf,

    /// `dest_dir/file_name`.
    pub final_path: PathBuf,

    /// Content length in bytes.
    pub size: u64,
}
