use std::fmt::{self, Display, Write};

/// Shows raw script or descriptor bytes as printable text, for log and error messages.
///
/// Printable ASCII (space included) is kept as is, `\` becomes `\\` and anything else is
/// escaped as `\xNN`.
///
/// ```
/// # use cctools_utils::AsciiDisplay;
/// let a = AsciiDisplay(b"map \"level1.c2m\"");
/// assert_eq!(a.to_string(), "map \"level1.c2m\"");
///
/// let b = AsciiDisplay(b"a\x99b\t\\");
/// assert_eq!(b.to_string(), "a\\x99b\\x09\\\\");
/// ```
pub struct AsciiDisplay<'a>(pub &'a [u8]);

impl Display for AsciiDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|&byte| match byte {
            b'\\' => f.write_str(r"\\"),
            b' '..=b'~' => f.write_char(byte as char),
            _ => write!(f, r"\x{byte:02X}"),
        })
    }
}
