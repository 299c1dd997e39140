//! Core data model types: jobs, attachments, and staged files.

pub mod attachment;
pub mod job;
pub mod staged;
