//! Centralized error types for maildetach.
//!
//! Every failure a job can hit is reported to the invoking MTA the same way:
//! as a temporary failure that asks for the delivery to be retried later.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the maildetach library.
#[derive(Error, Debug)]
pub enum DetachError {
    /// The per-job workspace directory could not be created.
    #[error("Cannot create workspace '{path}': {source}")]
    Workspace {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Reading the message from the input stream failed.
    #[error("Cannot read message: {0}")]
    Read(std::io::Error),

    /// The message exceeds the configured size limit.
    #[error("Message is larger than {limit} bytes (read {size})")]
    MessageTooLarge { size: u64, limit: u64 },

    /// The input could not be parsed as an RFC 822 message.
    #[error("Message parse error: {0}")]
    Parse(String),

    /// An attachment could not be written into the workspace.
    #[error("Cannot stage attachment '{path}': {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A staged file could not be linked into the destination.
    #[error("Cannot link '{from}' to '{to}': {source}")]
    Link {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// The workspace copy of a promoted file could not be removed.
    #[error("Cannot remove staged file '{path}': {source}")]
    Unlink {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The logging facility selector is not recognised.
    #[error("Unknown logging facility: {0}")]
    Facility(String),

    /// The configuration file is unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `Result<T, DetachError>`.
pub type Result<T> = std::result::Result<T, DetachError>;

impl DetachError {
    /// Exit status the process reports for this error.
    ///
    /// There is no permanent-failure status: everything is retryable.
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::TempFail
    }
}

/// Process exit statuses understood by mail transfer agents (sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// `EX_OK`: every attachment was delivered.
    Ok,
    /// `EX_TEMPFAIL`: the MTA should retry the delivery later.
    TempFail,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::TempFail => 75,
        }
    }
}

impl<T> From<&Result<T>> for ExitStatus {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ExitStatus::Ok,
            Err(e) => e.exit_status(),
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        // Both codes fit in a u8.
        std::process::ExitCode::from(status.code() as u8)
    }
}
