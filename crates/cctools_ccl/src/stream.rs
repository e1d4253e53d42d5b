//! String primitives of the levelset format.
//!
//! Integers are handled by [`cctools_utils::packed`] and `byteorder`, always little endian.

use crate::LevelsetError;
use cctools_utils::{latin1, ok, AnyResult};
use std::io::{Read, Write};

/// Key used for obfuscating level passwords.
pub const PASSWORD_KEY: u8 = 0x99;

/// XORs every byte with [`PASSWORD_KEY`]. Applying it twice restores the input.
pub fn obfuscate(bytes: &mut [u8]) {
    for byte in bytes {
        *byte ^= PASSWORD_KEY;
    }
}

/// Reads a string field of exactly `length` bytes. The last byte is the terminator, so the
/// content is at most `length - 1` bytes long, and ends early at the first NUL byte.
///
/// A zero length field is read as an empty string.
pub fn read_string<R: Read>(r: &mut R, length: usize, obfuscated: bool) -> AnyResult<String> {
    let mut buffer = vec![0; length];
    r.read_exact(&mut buffer)?;

    let content = match buffer.split_last_mut() {
        Some((_, content)) => content,
        None => return Ok(String::new()),
    };

    if obfuscated {
        obfuscate(content);
    }

    let end = content
        .iter()
        .position(|&byte| byte == 0)
        .unwrap_or(content.len());
    Ok(latin1::decode(&content[..end]))
}

/// Writes the string followed by its terminator. The caller declares `text.len() + 1` as the
/// field length.
pub fn write_string<W: Write>(w: &mut W, text: &str, obfuscated: bool) -> AnyResult {
    let mut bytes = latin1::encode(text)?;
    if obfuscated {
        obfuscate(&mut bytes);
    }
    w.write_all(&bytes)?;
    w.write_all(&[0])?;
    ok()
}

/// Encodes a string field's content, checking it fits in a tagged field.
pub(crate) fn encode_field(field: &'static str, text: &str) -> AnyResult<Vec<u8>> {
    let bytes = latin1::encode(text)?;
    if bytes.len() > crate::MAX_STRING_LENGTH {
        Err(LevelsetError::FieldTooLong {
            field,
            length: bytes.len(),
        })?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn obfuscation_is_an_involution() {
        let printable: Vec<u8> = (0x20..0x7F).collect();

        let mut once = printable.clone();
        obfuscate(&mut once);
        assert_ne!(once, printable);

        let mut twice = once.clone();
        obfuscate(&mut twice);
        assert_eq!(twice, printable);
    }

    #[test]
    fn password_round_trip() {
        let mut buffer = Vec::new();
        write_string(&mut buffer, "BDHP", true).unwrap();
        assert_eq!(buffer, [b'B' ^ 0x99, b'D' ^ 0x99, b'H' ^ 0x99, b'P' ^ 0x99, 0]);

        let text = read_string(&mut Cursor::new(&buffer), buffer.len(), true).unwrap();
        assert_eq!(text, "BDHP");
    }

    #[test]
    fn content_stops_at_terminator() {
        let data = b"LESSON 1\0junk\0";
        let text = read_string(&mut Cursor::new(data), data.len(), false).unwrap();
        assert_eq!(text, "LESSON 1");

        // The final byte is always dropped, even when it isn't NUL
        let text = read_string(&mut Cursor::new(b"ABCD"), 4, false).unwrap();
        assert_eq!(text, "ABC");

        assert_eq!(read_string(&mut Cursor::new(b""), 0, false).unwrap(), "");
    }

    #[test]
    fn short_field_fails() {
        assert!(read_string(&mut Cursor::new(b"AB"), 5, false).is_err());
    }

    #[test]
    fn latin1_bytes_survive() {
        let mut buffer = Vec::new();
        write_string(&mut buffer, "Caf\u{e9}", false).unwrap();
        assert_eq!(buffer, [b'C', b'a', b'f', 0xE9, 0]);
        let text = read_string(&mut Cursor::new(&buffer), buffer.len(), false).unwrap();
        assert_eq!(text, "Caf\u{e9}");
    }
}
