//! Message input: bounded stdin reading and MIME attachment extraction.

pub mod mime;
pub mod transfer;
