use super::WireCursor;
use crate::DomainError;
use std::fmt::Write as _;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_DEPTH: usize = 16;

const POINTER_MASK: u8 = 0xC0;

/// Encodes a dotted name as length-prefixed labels. No compression.
pub fn encode_name(name: &str) -> Result<Vec<u8>, DomainError> {
    let mut out = Vec::with_capacity(name.len() + 2);
    write_name(&mut out, name)?;
    Ok(out)
}

/// Writes `name` in wire form. `\DDD` and `\c` escapes, as produced by
/// [`decode_name`], are turned back into the bytes they stand for.
pub fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), DomainError> {
    if !name.is_ascii() {
        return Err(DomainError::NonAsciiName);
    }

    let start = out.len();
    let result = write_labels(out, name);
    if result.is_err() {
        out.truncate(start);
    }
    result
}

fn write_labels(out: &mut Vec<u8>, name: &str) -> Result<(), DomainError> {
    let start = out.len();
    let bytes = name.as_bytes();
    let invalid = || DomainError::InvalidDomainName(name.to_string());

    if bytes != b"." && !bytes.is_empty() {
        let mut i = 0;
        loop {
            let len_at = out.len();
            out.push(0);

            while i < bytes.len() && bytes[i] != b'.' {
                let b = if bytes[i] == b'\\' {
                    let (b, used) = unescape(&bytes[i + 1..]).ok_or_else(invalid)?;
                    i += 1 + used;
                    b
                } else {
                    i += 1;
                    bytes[i - 1]
                };
                out.push(b);
            }

            let label_len = out.len() - len_at - 1;
            if label_len == 0 {
                return Err(invalid());
            }
            if label_len > MAX_LABEL_LEN {
                return Err(DomainError::LabelTooLong(label_len));
            }
            out[len_at] = label_len as u8;

            // Skip the separator; a dot as the last byte is the root.
            i += 1;
            if i >= bytes.len() {
                break;
            }
        }
    }
    out.push(0);

    let encoded_len = out.len() - start;
    if encoded_len > MAX_NAME_LEN {
        return Err(DomainError::NameTooLong(encoded_len));
    }
    Ok(())
}

/// Reads the escape following a backslash: three decimal digits or one
/// literal character. Returns the byte and how many input bytes it took.
fn unescape(rest: &[u8]) -> Option<(u8, usize)> {
    match rest {
        [a, b, c, ..] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            let value = (a - b'0') as u16 * 100 + (b - b'0') as u16 * 10 + (c - b'0') as u16;
            u8::try_from(value).ok().map(|v| (v, 3))
        }
        [d, ..] if d.is_ascii_digit() => None,
        [c, ..] => Some((*c, 1)),
        [] => None,
    }
}

/// Decodes a possibly compressed name starting at the cursor.
///
/// On return the cursor sits right after the name as it appears at the
/// starting position: after the terminating zero byte, or after the two
/// pointer bytes when the name ends in a pointer.
pub fn decode_name(cursor: &mut WireCursor<'_>) -> Result<String, DomainError> {
    let mut name = String::new();
    // Starts at 1 for the root byte.
    let mut wire_len = 1;
    decode_labels(cursor, &mut name, &mut wire_len, 0)?;
    Ok(name)
}

fn decode_labels(
    cursor: &mut WireCursor<'_>,
    name: &mut String,
    wire_len: &mut usize,
    depth: usize,
) -> Result<(), DomainError> {
    loop {
        let len = cursor.read_u8()?;
        match len & POINTER_MASK {
            0x00 if len == 0 => return Ok(()),
            0x00 => {
                let label = cursor.read_bytes(len as usize)?;
                if !name.is_empty() {
                    name.push('.');
                }
                push_label(name, label);
                *wire_len += 1 + label.len();
                if *wire_len > MAX_NAME_LEN {
                    return Err(DomainError::NameTooLong(*wire_len));
                }
            }
            POINTER_MASK => {
                if depth >= MAX_POINTER_DEPTH {
                    return Err(DomainError::PointerChainTooLong);
                }
                let low = cursor.read_u8()?;
                let offset = (((len & !POINTER_MASK) as usize) << 8) | low as usize;
                let resume = cursor.position();
                cursor.seek(offset)?;
                let result = decode_labels(cursor, name, wire_len, depth + 1);
                cursor.seek(resume)?;
                return result;
            }
            _ => return Err(DomainError::InvalidLabelType(len)),
        }
    }
}

fn push_label(name: &mut String, label: &[u8]) {
    for &b in label {
        if b.is_ascii_graphic() && b != b'.' && b != b'\\' {
            name.push(b as char);
        } else {
            let _ = write!(name, "\\{:03}", b);
        }
    }
}

/// Compares two dotted names the way DNS does: ASCII case-insensitive and
/// ignoring a trailing root dot.
pub fn names_equal(a: &str, b: &str) -> bool {
    let a = a.strip_suffix('.').unwrap_or(a);
    let b = b.strip_suffix('.').unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}
