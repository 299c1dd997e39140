//! Job identity and paths.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

/// Timestamp layout used in job ids (second resolution, local time).
const JOB_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Identifier of one invocation, unique within the destination tree.
///
/// Format: `{YYYYmmdd-HHMMSS}-{pid}`. Two processes never share a pid at the
/// same time, and one pid is only reused after the second has moved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Id for a job starting now in the current process.
    pub fn now() -> Self {
        Self::new(&Local::now(), std::process::id())
    }

    /// Id for a job started at `started` by process `pid`.
    pub fn new<Tz: TimeZone>(started: &DateTime<Tz>, pid: u32) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(format!("{}-{pid}", started.format(JOB_TIMESTAMP_FORMAT)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for JobId {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// One execution of the tool processing one message.
#[derive(Debug, Clone)]
pub struct Job {
    /// Unique job identifier, also the prefix of every delivered file.
    pub id: JobId,

    /// Shared destination directory (must exist beforehand).
    pub dest_dir: PathBuf,

    /// Private staging directory: `dest_dir/id`.
    pub work_dir: PathBuf,
}

impl Job {
    pub fn new(id: JobId, dest_dir: impl Into<PathBuf>) -> Self {
        let dest_dir = dest_dir.into();
        let work_dir = dest_dir.join(&id);
        Self {
            id,
            dest_dir,
            work_dir,
        }
    }

    /// File name of the attachment at `index`, with the sanitized original
    /// name appended when there is one.
    pub fn file_name(&self, index: usize, sanitized: &str) -> String {
        if sanitized.is_empty() {
            format!("{}-{index:04}", self.id)
        } else {
            format!("{}-{index:04}-{sanitized}", self.id)
        }
    }
}
