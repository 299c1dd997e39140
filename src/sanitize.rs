//! Safe file names from untrusted attachment names.

/// Longest original file name kept verbatim, in bytes.
pub const MAX_NAME_LENGTH: usize = 64;

/// Marker inserted where an over-long name was shortened.
const ELLIPSIS: &str = "..";

/// Derive a safe, bounded file name from an attachment's original name.
///
/// Only the last path segment survives (`../../etc/passwd` becomes `passwd`),
/// both `/` and `\` counting as separators. Names longer than
/// [`MAX_NAME_LENGTH`] bytes keep at most 31 bytes from each end around a
/// `..` marker, cut on character boundaries. An empty input gives an empty
/// output.
pub fn sanitize(original: &str) -> String {
    let trimmed = original.trim_end_matches(is_separator);
    let base = match trimmed.rfind(is_separator) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };
    let base = base.replace('\0', "_");

    if base.len() <= MAX_NAME_LENGTH {
        return base;
    }

    let keep = MAX_NAME_LENGTH / 2 - 1;
    let head = floor_char_boundary(&base, keep);
    let tail = ceil_char_boundary(&base, base.len() - keep);

    let mut name = String::with_capacity(MAX_NAME_LENGTH);
    name.push_str(&base[..head]);
    name.push_str(ELLIPSIS);
    name.push_str(&base[tail..]);
    name
}

/// Largest char boundary not after `index`.
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary not before `index`.
fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}
