use crate::AnyResult;
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{Read, Write};

/// Special trait for reading fixed layout records, always assumed to be little endian.
///
/// Every multi-byte value in the CC1 file formats is little endian, so the host byte order never
/// leaks into the encoded data.
pub trait PackedData: Sized + Clone {
    fn read_packed<R: Read>(r: &mut R) -> AnyResult<Self>;
    fn write_packed<W: Write>(&self, w: &mut W) -> AnyResult;

    /// Amount of bytes a single encoded value takes.
    const PACKED_SIZE: usize;
}

macro_rules! impl_data {
    ($type:ty, $size:expr, $r:ident, $reader:expr, $w:ident, $self:ident, $writer:expr) => {
        impl PackedData for $type {
            const PACKED_SIZE: usize = $size;

            fn read_packed<R: Read>($r: &mut R) -> AnyResult<Self> {
                Ok($reader)
            }

            fn write_packed<W: Write>(&self, $w: &mut W) -> AnyResult {
                let $self = self;
                $writer;
                Ok(())
            }
        }
    };
}

impl_data!(u8, 1, r, r.read_u8()?, w, value, w.write_u8(*value)?);
impl_data!(
    u16,
    2,
    r,
    r.read_u16::<LE>()?,
    w,
    value,
    w.write_u16::<LE>(*value)?
);
impl_data!(
    u32,
    4,
    r,
    r.read_u32::<LE>()?,
    w,
    value,
    w.write_u32::<LE>(*value)?
);

/// Trait with a `write_packed` wrapper method for any [`Write`] type, purely for clarity.
pub trait PackedWriteExt {
    /// Writes the specified [`PackedData`] object into this stream.
    fn write_packed(&mut self, t: impl PackedData) -> AnyResult;
}

impl<T: Write> PackedWriteExt for T {
    fn write_packed(&mut self, t: impl PackedData) -> AnyResult {
        t.write_packed(self)
    }
}

/// Trait with a `read_packed` wrapper method for any [`Read`] type, purely for clarity.
pub trait PackedReadExt {
    /// Reads the specified [`PackedData`] type from this stream.
    fn read_packed<T: PackedData>(&mut self) -> AnyResult<T>;
}

impl<T: Read> PackedReadExt for T {
    fn read_packed<R: PackedData>(&mut self) -> AnyResult<R> {
        R::read_packed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{PackedReadExt, PackedWriteExt};
    use std::io::Cursor;

    #[test]
    fn little_endian_layout() {
        let mut buffer = Vec::new();
        buffer.write_packed(0x0102AAACu32).unwrap();
        buffer.write_packed(0x1234u16).unwrap();
        buffer.write_packed(0x99u8).unwrap();
        assert_eq!(buffer, [0xAC, 0xAA, 0x02, 0x01, 0x34, 0x12, 0x99]);

        let mut r = Cursor::new(buffer);
        assert_eq!(r.read_packed::<u32>().unwrap(), 0x0102AAAC);
        assert_eq!(r.read_packed::<u16>().unwrap(), 0x1234);
        assert_eq!(r.read_packed::<u8>().unwrap(), 0x99);
    }

    #[test]
    fn short_read_fails() {
        let mut r = Cursor::new([0x01u8]);
        let error = r.read_packed::<u16>().unwrap_err();
        let io_error = error.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_error.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
