//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use chrono::{TimeZone, Utc};
use maildetach::model::job::{Job, JobId};

const BOUNDARY: &str = "=_detach_test_boundary";

/// Build a multipart/mixed message with one 7bit part per attachment.
/// An empty name produces a part without a `filename` parameter.
pub fn message(attachments: &[(&str, &[u8])]) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(
        format!(
            "From: sender@example.com\r\n\
             To: drop@example.com\r\n\
             Subject: attachments\r\n\
             Message-ID: <test-1@example.com>\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: multipart/mixed; boundary=\"{BOUNDARY}\"\r\n\
             \r\n\
             --{BOUNDARY}\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             body text\r\n"
        )
        .as_bytes(),
    );

    for (name, content) in attachments {
        raw.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        raw.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
        if name.is_empty() {
            raw.extend_from_slice(b"Content-Disposition: attachment\r\n");
        } else {
            raw.extend_from_slice(
                format!("Content-Disposition: attachment; filename=\"{name}\"\r\n").as_bytes(),
            );
        }
        raw.extend_from_slice(b"Content-Transfer-Encoding: 7bit\r\n\r\n");
        raw.extend_from_slice(content);
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    raw
}

/// A job with a fixed id so tests can predict file names.
pub fn job(dest: &Path, pid: u32) -> Job {
    let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap();
    Job::new(JobId::new(&at, pid), dest)
}

/// Sorted names of the entries directly under `dir`.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
