//! `maildetach`: a mail pipe helper that detaches attachments.
//!
//! One invocation reads one RFC 822 message, stages its attachments in a
//! private per-job directory, and hard-links each finished file into a
//! shared destination directory. Every failure maps to `EX_TEMPFAIL` so the
//! MTA retries the delivery.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod promote;
pub mod sanitize;
pub mod workspace;
