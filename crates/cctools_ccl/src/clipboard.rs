use crate::{LevelData, LevelsetError, RecordMode};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use cctools_utils::{ok, AnyResult};
use std::io::{Read, Seek, SeekFrom, Write};

/// Size of the clipboard header, up to where the level record starts.
const HEADER_SIZE: u64 = 14;

/// A rectangular selection of a level, as exchanged through the clipboard.
///
/// ## Layout
/// ```c
/// struct ClipboardData {
///     u32 width;
///     u32 height;
///     u16 data_size;  // bytes following the header
///     u32 reserved;   // always 0
///     LevelRecord level;  // without its record size
/// }
/// ```
///
/// The level holds the selected tiles starting at `(0, 0)`, along with any traps, cloners and
/// monsters inside of the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub width: u32,
    pub height: u32,
    pub level: LevelData,
}

impl ClipboardData {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            level: LevelData::default(),
        }
    }

    pub fn read<R: Read>(r: &mut R) -> AnyResult<Self> {
        let width = r.read_u32::<LE>()?;
        let height = r.read_u32::<LE>()?;
        r.read_u16::<LE>()?;
        r.read_u32::<LE>()?;

        let level = LevelData::read_record(r, RecordMode::Clipboard)?;
        Ok(Self {
            width,
            height,
            level,
        })
    }

    pub fn write<W: Write + Seek>(&self, w: &mut W) -> AnyResult {
        let start = w.stream_position()?;
        w.write_u32::<LE>(self.width)?;
        w.write_u32::<LE>(self.height)?;
        w.write_u16::<LE>(0)?;
        w.write_u32::<LE>(0)?;
        self.level.write_record(w, RecordMode::Clipboard)?;

        let end = w.stream_position()?;
        let size = match u16::try_from(end - start - HEADER_SIZE) {
            Ok(size) => size,
            Err(_) => Err(LevelsetError::CorruptClipboardData)?,
        };
        w.seek(SeekFrom::Start(start + 8))?;
        w.write_u16::<LE>(size)?;
        w.seek(SeekFrom::Start(end))?;

        ok()
    }
}
