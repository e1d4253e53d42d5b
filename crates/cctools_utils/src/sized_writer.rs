use crate::AnyResult;
use anyhow::ensure;
use byteorder::{WriteBytesExt, LE};
use std::io::{self, Seek, SeekFrom, Write};

/// A writer for sections prefixed with their own 16-bit little endian byte size.
///
/// A placeholder size is written on creation. Everything written afterwards is counted towards
/// the section, and [`SizedWriter::finish`] seeks back to patch the placeholder with the real
/// size. Sections can be nested, since the writer itself implements [`Write`] and [`Seek`].
///
/// Once the section is written, either call [`SizedWriter::finish`] manually or drop the writer.
/// Errors from a finish performed by drop are only logged, so prefer calling it.
pub struct SizedWriter<'w, W: Write + Seek> {
    w: &'w mut W,
    size_position: u64,
    finished: bool,
}

impl<'w, W: Write + Seek> SizedWriter<'w, W> {
    pub fn new(w: &'w mut W) -> AnyResult<Self> {
        let size_position = w.stream_position()?;
        w.write_u16::<LE>(0)?;

        Ok(Self {
            w,
            size_position,
            finished: false,
        })
    }

    /// Finishes writing the section, by marking its final size in the stream. The size doesn't
    /// include the size field itself.
    pub fn finish(&mut self) -> AnyResult<u16> {
        let data_end = self.w.stream_position()?;
        let data_size = data_end - self.size_position - 2;
        ensure!(data_size <= u16::MAX.into(), "section too large ({data_size} bytes)");

        if !self.finished {
            self.w.seek(SeekFrom::Start(self.size_position))?;
            self.w.write_u16::<LE>(data_size as u16)?;
            self.w.seek(SeekFrom::Start(data_end))?;
            self.finished = true;
        }

        Ok(data_size as u16)
    }
}

impl<'w, W: Write + Seek> Write for SizedWriter<'w, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.w.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.w.flush()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.w.write_all(buf)
    }
}

impl<'w, W: Write + Seek> Seek for SizedWriter<'w, W> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.w.seek(pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        self.w.stream_position()
    }
}

impl<'w, W: Write + Seek> Drop for SizedWriter<'w, W> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(error) = self.finish() {
                log::error!("Couldn't finish a sized section: {error:#}");
            }
        }
    }
}
