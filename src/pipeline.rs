//! One job end to end: workspace, parse, extract, promote, teardown.

use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::extract::{extract, StageOptions};
use crate::model::job::{Job, JobId};
use crate::parser::mime::{parse_message, read_message};
use crate::promote::promote;
use crate::workspace::Workspace;

/// Tunables for a job, usually taken from [`crate::config::DeliveryConfig`].
#[derive(Debug, Clone, Copy)]
pub struct JobOptions {
    /// Largest accepted input, in bytes.
    pub max_message_size: u64,
    /// How staged files are written.
    pub stage: StageOptions,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            max_message_size: crate::config::DEFAULT_MAX_MESSAGE_SIZE,
            stage: StageOptions::default(),
        }
    }
}

/// Summary of a successful job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: JobId,
    pub message_id: Option<String>,
    /// Delivered file names, in message order.
    pub files: Vec<String>,
}

/// Process one message from `input` into `dest_dir` under a fresh job id.
pub fn process(input: impl Read, dest_dir: &Path, options: &JobOptions) -> Result<JobReport> {
    run_job(Job::new(JobId::now(), dest_dir), input, options)
}

/// Process one message for an already identified `job`.
///
/// Errors are logged here before being returned; the workspace is gone by
/// the time this returns, whatever the outcome.
pub fn run_job(job: Job, input: impl Read, options: &JobOptions) -> Result<JobReport> {
    let span = tracing::info_span!("job", job_id = %job.id);
    let _enter = span.enter();

    tracing::info!(job_id = %job.id, "Job ID");

    let result = stage_and_commit(&job, input, options);
    match &result {
        Ok(report) => tracing::info!(files = report.files.len(), "Delivered"),
        Err(e) => tracing::error!(error = %e, "Job failed"),
    }
    result
}

fn stage_and_commit(job: &Job, input: impl Read, options: &JobOptions) -> Result<JobReport> {
    let workspace = Workspace::create(job)?;

    let raw = read_message(input, options.max_message_size)?;
    let message = parse_message(&raw)?;
    drop(raw);

    tracing::info!(
        message_id = message.message_id.as_deref().unwrap_or(""),
        "Message-Id"
    );

    let staged = extract(job, &workspace, &message.attachments, options.stage)?;
    promote(&staged)?;
    workspace.teardown();

    Ok(JobReport {
        job_id: job.id.clone(),
        message_id: message.message_id,
        files: staged.into_iter().map(|f| f.file_name).collect(),
    })
}
