//! MIME parsing: turns a raw RFC 822 message into its list of attachments.
//!
//! Parsing is delegated to `mail-parser`; the rest of the crate only sees
//! [`ParsedMessage`].

use std::io::Read;

use mail_parser::{MessageParser, MessagePart, MimeHeaders};

use crate::error::{DetachError, Result};
use crate::model::attachment::{Attachment, ParsedMessage};
use crate::parser::transfer;

/// Read a whole message from `reader`, refusing anything over `limit` bytes.
pub fn read_message(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    // One extra byte tells "exactly at the limit" apart from "over it".
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(DetachError::Read)?;

    let size = raw.len() as u64;
    if size > limit {
        return Err(DetachError::MessageTooLarge { size, limit });
    }
    Ok(raw)
}

/// Parse a raw message and collect its attachments in message order.
pub fn parse_message(raw_message: &[u8]) -> Result<ParsedMessage> {
    let message_bytes = skip_from_line(raw_message);

    let parser = MessageParser::default();
    let msg = parser
        .parse(message_bytes)
        .ok_or_else(|| DetachError::Parse("no RFC 822 headers found".into()))?;

    let attachments = msg
        .attachments()
        .enumerate()
        .map(|(index, part)| Attachment {
            index,
            original_name: part.attachment_name().unwrap_or_default().to_string(),
            content: attachment_content(message_bytes, part),
        })
        .collect();

    Ok(ParsedMessage {
        message_id: msg.message_id().map(String::from),
        attachments,
    })
}

/// The attachment's bytes as sent: transfer-decoded, never charset-converted.
///
/// `mail-parser` converts text parts to UTF-8, so those are decoded again
/// from the raw body. Binary and message parts are taken as parsed.
fn attachment_content(message_bytes: &[u8], part: &MessagePart<'_>) -> Vec<u8> {
    if !part.is_text() {
        return part.contents().to_vec();
    }
    let (start, end) = (part.raw_body_offset(), part.raw_end_offset());
    let Some(mut raw_body) = message_bytes.get(start..end) else {
        return part.contents().to_vec();
    };
    // The line break before a boundary delimiter belongs to the delimiter.
    if message_bytes[end..].starts_with(b"--") {
        raw_body = strip_line_break(raw_body);
    }

    let encoding = part.content_transfer_encoding().unwrap_or_default();
    match transfer::decode(encoding, raw_body) {
        Some(content) => content,
        None => {
            tracing::warn!(encoding, "Undecodable text attachment, keeping parsed content");
            part.contents().to_vec()
        }
    }
}

fn strip_line_break(body: &[u8]) -> &[u8] {
    match body.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => body,
    }
}

/// Skip a UTF-8 BOM and the mbox `From ` envelope line some MTAs prepend.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
