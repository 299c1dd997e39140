//! Attachments handed over by the MIME collaborator.

/// One attachment of the incoming message.
///
/// Immutable once produced by [`crate::parser::mime::parse_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// 0-based position within the message, as returned by the parser.
    pub index: usize,

    /// Untrusted file name from the MIME headers. Empty when missing.
    pub original_name: String,

    /// Decoded content.
    pub content: Vec<u8>,
}

/// The parts of a parsed message this tool cares about.
#[derive(Debug, Clone, Default)]
pub struct ParsedMessage {
    /// `Message-ID` header, if present.
    pub message_id: Option<String>,

    /// Attachments in message order.
    pub attachments: Vec<Attachment>,
}
