//! Conversions between Rust strings and the single byte text used by CC1 data files.
//!
//! Level names, hints and passwords are stored as raw bytes, which the editors have always treated
//! as Latin-1. Mapping each byte to the code point of the same value keeps every stored byte
//! intact through a read and write cycle.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Latin1Error {
    #[error("character `{0}` can't be stored as a single byte")]
    Unrepresentable(char),
}

/// Decodes a byte string, mapping every byte to the character with the same code point.
///
/// ```
/// # use cctools_utils::latin1::decode;
/// assert_eq!(decode(b"LESSON 1"), "LESSON 1");
/// assert_eq!(decode(&[0x43, 0xE9]), "C\u{e9}");
/// ```
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}

/// Encodes a string, failing on characters outside of `U+0000..=U+00FF`.
///
/// ```
/// # use cctools_utils::latin1::{encode, Latin1Error};
/// assert_eq!(encode("C\u{e9}").unwrap(), vec![0x43, 0xE9]);
/// assert_eq!(encode("\u{263a}"), Err(Latin1Error::Unrepresentable('\u{263a}')));
/// ```
pub fn encode(text: &str) -> Result<Vec<u8>, Latin1Error> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| Latin1Error::Unrepresentable(c)))
        .collect()
}
