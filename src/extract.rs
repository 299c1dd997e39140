//! Write a message's attachments into the job workspace.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{DetachError, Result};
use crate::model::attachment::Attachment;
use crate::model::job::Job;
use crate::model::staged::StagedFile;
use crate::sanitize::sanitize;
use crate::workspace::Workspace;

/// Options for materializing attachments.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageOptions {
    /// Permission bits for staged files. `None` leaves it to the umask.
    pub file_mode: Option<u32>,
}

/// Write every attachment into `workspace`, in message order.
///
/// File names are `{job_id}-{index:04}` plus `-{sanitized name}` when the
/// attachment has a usable name. The first failure aborts the whole run;
/// files already written stay in the workspace until it is torn down.
pub fn extract(
    job: &Job,
    workspace: &Workspace,
    attachments: &[Attachment],
    options: StageOptions,
) -> Result<Vec<StagedFile>> {
    let mut staged = Vec::with_capacity(attachments.len());

    for attachment in attachments {
        let file_name = job.file_name(attachment.index, &sanitize(&attachment.original_name));
        let staged_path = workspace.join(&file_name);

        write_staged(&staged_path, &attachment.content, options)?;

        tracing::info!(
            file = %file_name,
            size = %humansize::format_size(attachment.content.len(), humansize::BINARY),
            sha256 = %format!("{:x}", Sha256::digest(&attachment.content)),
            "File"
        );

        staged.push(StagedFile {
            final_path: job.dest_dir.join(&file_name),
            file_name,
            staged_path,
            size: attachment.content.len() as u64,
        });
    }

    Ok(staged)
}

/// Create `path`, write `content` and flush it to disk. The handle is closed
/// on return, whichever way it returns.
fn write_staged(path: &Path, content: &[u8], options: StageOptions) -> Result<()> {
    let stage_err = |source: std::io::Error| DetachError::Stage {
        path: path.to_path_buf(),
        source,
    };

    let mut open = OpenOptions::new();
    open.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = options.file_mode {
            open.mode(mode);
        }
    }
    #[cfg(not(unix))]
    let _ = options;

    let mut file = open.open(path).map_err(stage_err)?;
    file.write_all(content).map_err(stage_err)?;
    file.sync_all().map_err(stage_err)?;
    Ok(())
}
