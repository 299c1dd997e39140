//! Content-Transfer-Encoding decoders.
//!
//! These undo the transfer encoding only. Bytes come out exactly as the
//! sender attached them, whatever charset they are in.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Standard alphabet, lenient about padding and trailing bits as MIME
/// bodies often are.
const MIME_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode `body` according to the `Content-Transfer-Encoding` value.
///
/// Returns `None` when the body is not valid for its declared encoding.
/// `7bit`, `8bit`, `binary` and unknown encodings pass through.
pub fn decode(encoding: &str, body: &[u8]) -> Option<Vec<u8>> {
    let encoding = encoding.trim();
    if encoding.eq_ignore_ascii_case("base64") {
        decode_base64(body)
    } else if encoding.eq_ignore_ascii_case("quoted-printable") {
        Some(decode_quoted_printable(body))
    } else {
        Some(body.to_vec())
    }
}

fn decode_base64(body: &[u8]) -> Option<Vec<u8>> {
    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    MIME_BASE64.decode(compact).ok()
}

/// RFC 2045 quoted-printable. Malformed `=` escapes are kept literally.
fn decode_quoted_printable(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;

    while i < body.len() {
        if body[i] != b'=' {
            out.push(body[i]);
            i += 1;
            continue;
        }

        // Soft line break, possibly with transport padding before it.
        let mut j = i + 1;
        while matches!(body.get(j), Some(b' ' | b'\t')) {
            j += 1;
        }
        match body.get(j..) {
            Some([b'\r', b'\n', ..]) => {
                i = j + 2;
                continue;
            }
            Some([b'\n', ..]) => {
                i = j + 1;
                continue;
            }
            _ => {}
        }

        match (hex_value(body.get(i + 1)), hex_value(body.get(i + 2))) {
            (Some(hi), Some(lo)) => {
                out.push(hi << 4 | lo);
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }
    out
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
