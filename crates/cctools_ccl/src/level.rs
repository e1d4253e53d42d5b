//! Level records.
//!
//! ## Record layout
//! ```c
//! struct LevelRecord {
//!     u16 record_size;    // bytes following this field, up to the end of the record
//!     u16 level_number;
//!     u16 timer;
//!     u16 chips;
//!     u16 map_version;    // always 1
//!     u8  map[];          // two RLE layers, see `rle`
//!     u16 fields_size;    // bytes of all following fields
//!     Field fields[];
//! }
//!
//! struct Field {
//!     u8 tag;
//!     u8 length;
//!     u8 payload[length];
//! }
//! ```
//!
//! Every field is optional, and empty ones are never written. String fields (name, hint and
//! password) are NUL terminated, with the terminator counted in the field length. The password
//! is obfuscated, see [`crate::stream::obfuscate`].
//!
//! Trap fields hold 10 byte entries: button and trap positions, followed by a trap state which
//! the games use internally and which is always written as 0. Clone fields hold 8 byte entries
//! with button and cloner positions. The move list holds 2 byte `(x, y)` entries, in the order
//! the monsters get to move.

use crate::{
    stream::{self, encode_field},
    LevelMap, LevelsetError, TileKind, MAX_CLONERS, MAX_MOVERS, MAX_TRAPS,
};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use cctools_proc::{ext_repr, PackedData};
use cctools_utils::{
    ok,
    packed::{PackedData, PackedReadExt, PackedWriteExt},
    AnyResult, SizedWriter,
};
use log::debug;
use std::io::{Read, Seek, Write};

/// Version marker of the map data, the only one in existence.
const MAP_VERSION: u16 = 1;

#[ext_repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    Name = 3,
    Traps = 4,
    Clones = 5,
    Password = 6,
    Hint = 7,
    MoveList = 10,
}

/// Grid position, as stored in trap and clone fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PackedData)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A trap button connected to a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trap {
    pub button: Point,
    pub trap: Point,
}

/// Trap as stored in a file. The state is only meaningful to a running game.
#[derive(Debug, Clone, PackedData)]
struct TrapRecord {
    button: Point,
    trap: Point,
    state: u16,
}

/// A clone button connected to a cloner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PackedData)]
pub struct Cloner {
    pub button: Point,
    pub cloner: Point,
}

/// How a record is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordMode {
    /// Regular levelset record, starting with its own size.
    #[default]
    Standard,
    /// Record without the leading size, as used by editor clipboard data. The fields size is taken
    /// at face value.
    Clipboard,
}

/// A single level, with all of its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelData {
    /// Level number. Reassigned on every levelset write.
    pub number: u16,
    /// Amount of chips needed to open the chip socket.
    pub chips: u16,
    /// Time limit in seconds, `0` meaning no limit.
    pub timer: u16,
    pub name: String,
    pub hint: String,
    /// Password, stored unobfuscated. Normally four uppercase letters.
    pub password: String,
    pub map: LevelMap,
    pub traps: Vec<Trap>,
    pub clones: Vec<Cloner>,
    /// Monster positions, in the order they move.
    pub move_list: Vec<Point>,
}

impl LevelData {
    /// Creates an empty level with given name and password.
    pub fn with_name(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Connects a trap button to a trap, unless that exact connection exists already.
    pub fn trap_connect(&mut self, button: Point, trap: Point) {
        let connection = Trap { button, trap };
        if !self.traps.contains(&connection) {
            self.traps.push(connection);
        }
    }

    /// Connects a clone button to a cloner, unless that exact connection exists already.
    pub fn clone_connect(&mut self, button: Point, cloner: Point) {
        let connection = Cloner { button, cloner };
        if !self.clones.contains(&connection) {
            self.clones.push(connection);
        }
    }

    /// Appends a position to the move list, unless it's listed already.
    pub fn add_mover(&mut self, position: Point) {
        if !self.move_list.contains(&position) {
            self.move_list.push(position);
        }
    }

    /// Checks whether a position is listed in the move list.
    pub fn is_mover(&self, position: Point) -> bool {
        self.move_list.contains(&position)
    }

    /// Traps released by the button at given position.
    pub fn linked_traps(&self, button: Point) -> Vec<Point> {
        self.traps
            .iter()
            .filter(|t| t.button == button)
            .map(|t| t.trap)
            .collect()
    }

    /// Buttons releasing the trap at given position.
    pub fn linked_trap_buttons(&self, trap: Point) -> Vec<Point> {
        self.traps
            .iter()
            .filter(|t| t.trap == trap)
            .map(|t| t.button)
            .collect()
    }

    /// Cloners activated by the button at given position.
    pub fn linked_cloners(&self, button: Point) -> Vec<Point> {
        self.clones
            .iter()
            .filter(|c| c.button == button)
            .map(|c| c.cloner)
            .collect()
    }

    /// Buttons activating the cloner at given position.
    pub fn linked_clone_buttons(&self, cloner: Point) -> Vec<Point> {
        self.clones
            .iter()
            .filter(|c| c.cloner == cloner)
            .map(|c| c.button)
            .collect()
    }

    /// Move list entries which don't point at a monster or a directional block.
    pub fn stray_movers(&self) -> Vec<Point> {
        self.move_list
            .iter()
            .copied()
            .filter(|p| {
                let (x, y) = (p.x as usize, p.y as usize);
                x >= self.map.width()
                    || y >= self.map.height()
                    || !TileKind::is_mover(self.map.fg(x, y))
            })
            .collect()
    }

    /// Reads a standard level record.
    pub fn read<R: Read>(r: &mut R) -> AnyResult<Self> {
        Self::read_record(r, RecordMode::Standard)
    }

    /// Writes a standard level record. Returns the amount of bytes written.
    pub fn write<W: Write + Seek>(&self, w: &mut W) -> AnyResult<usize> {
        self.write_record(w, RecordMode::Standard)
    }

    pub fn read_record<R: Read>(r: &mut R, mode: RecordMode) -> AnyResult<Self> {
        let mut level = LevelData::default();

        // Bytes of the record left to read. Kept signed, so corrupted sizes can go below zero.
        let mut remaining = match mode {
            RecordMode::Standard => r.read_u16::<LE>()? as i64,
            RecordMode::Clipboard => 0,
        };

        level.number = r.read_u16::<LE>()?;
        level.timer = r.read_u16::<LE>()?;
        level.chips = r.read_u16::<LE>()?;
        remaining -= 6;

        if r.read_u16::<LE>()? != MAP_VERSION {
            Err(LevelsetError::InvalidMapVersion)?;
        }
        remaining -= level.map.read(r)? as i64 + 2;

        remaining -= 2;
        let fields_size = r.read_u16::<LE>()? as i64;
        match mode {
            RecordMode::Standard if fields_size != remaining => {
                debug!("Fields size {fields_size} doesn't match the expected {remaining}");
                Err(LevelsetError::CorruptMapData)?;
            }
            RecordMode::Standard => {}
            RecordMode::Clipboard => remaining = fields_size,
        }

        while remaining > 0 {
            let tag = r.read_u8()?;
            let length = r.read_u8()? as usize;
            remaining -= length as i64 + 2;
            if remaining < 0 {
                Err(LevelsetError::CorruptLevelData)?;
            }

            match FieldTag::try_from(tag) {
                Ok(FieldTag::Name) => level.name = stream::read_string(r, length, false)?,
                Ok(FieldTag::Hint) => level.hint = stream::read_string(r, length, false)?,
                Ok(FieldTag::Password) => level.password = stream::read_string(r, length, true)?,
                Ok(FieldTag::Traps) => {
                    if length % TrapRecord::PACKED_SIZE != 0 {
                        Err(LevelsetError::InvalidTrapField)?;
                    }
                    for _ in 0..length / TrapRecord::PACKED_SIZE {
                        let record: TrapRecord = r.read_packed()?;
                        level.traps.push(Trap {
                            button: record.button,
                            trap: record.trap,
                        });
                    }
                }
                Ok(FieldTag::Clones) => {
                    if length % Cloner::PACKED_SIZE != 0 {
                        Err(LevelsetError::InvalidCloneField)?;
                    }
                    for _ in 0..length / Cloner::PACKED_SIZE {
                        level.clones.push(r.read_packed()?);
                    }
                }
                Ok(FieldTag::MoveList) => {
                    if length % 2 != 0 {
                        Err(LevelsetError::InvalidMoveListField)?;
                    }
                    for _ in 0..length / 2 {
                        let x = r.read_u8()? as u16;
                        let y = r.read_u8()? as u16;
                        level.move_list.push(Point { x, y });
                    }
                }
                Err(_) => Err(LevelsetError::UnknownField(tag))?,
            }
        }

        if remaining != 0 {
            Err(match mode {
                RecordMode::Standard => LevelsetError::InvalidChecksum,
                RecordMode::Clipboard => LevelsetError::CorruptClipboardData,
            })?;
        }

        Ok(level)
    }

    /// Writes a level record. Returns the amount of bytes written.
    ///
    /// Everything is validated before writing, so a level that doesn't fit in the format leaves
    /// the stream untouched.
    pub fn write_record<W: Write + Seek>(&self, w: &mut W, mode: RecordMode) -> AnyResult<usize> {
        let fields = self.encode_fields()?;
        let start = w.stream_position()?;

        match mode {
            RecordMode::Standard => {
                let mut record = SizedWriter::new(w)?;
                self.write_body(&mut record, &fields)?;
                record.finish()?;
            }
            RecordMode::Clipboard => self.write_body(w, &fields)?,
        }

        Ok((w.stream_position()? - start) as usize)
    }

    fn write_body<W: Write + Seek>(&self, w: &mut W, fields: &[u8]) -> AnyResult {
        w.write_u16::<LE>(self.number)?;
        w.write_u16::<LE>(self.timer)?;
        w.write_u16::<LE>(self.chips)?;
        w.write_u16::<LE>(MAP_VERSION)?;
        self.map.write(w)?;

        let mut section = SizedWriter::new(w)?;
        section.write_all(fields)?;
        section.finish()?;
        ok()
    }

    /// Encodes all non-empty fields.
    fn encode_fields(&self) -> AnyResult<Vec<u8>> {
        let mut fields = Vec::new();

        for (tag, text, obfuscated) in [
            (FieldTag::Name, &self.name, false),
            (FieldTag::Hint, &self.hint, false),
            (FieldTag::Password, &self.password, true),
        ] {
            if text.is_empty() {
                continue;
            }
            let content = encode_field(tag.into(), text)?;
            fields.write_u8(tag.into())?;
            fields.write_u8(content.len() as u8 + 1)?;
            stream::write_string(&mut fields, text, obfuscated)?;
        }

        if !self.traps.is_empty() {
            if self.traps.len() > MAX_TRAPS {
                Err(LevelsetError::TooManyTraps(self.traps.len()))?;
            }
            fields.write_u8(FieldTag::Traps.into())?;
            fields.write_u8((self.traps.len() * TrapRecord::PACKED_SIZE) as u8)?;
            for trap in &self.traps {
                fields.write_packed(TrapRecord {
                    button: trap.button,
                    trap: trap.trap,
                    state: 0,
                })?;
            }
        }

        if !self.clones.is_empty() {
            if self.clones.len() > MAX_CLONERS {
                Err(LevelsetError::TooManyCloners(self.clones.len()))?;
            }
            fields.write_u8(FieldTag::Clones.into())?;
            fields.write_u8((self.clones.len() * Cloner::PACKED_SIZE) as u8)?;
            for cloner in &self.clones {
                fields.write_packed(*cloner)?;
            }
        }

        if !self.move_list.is_empty() {
            if self.move_list.len() > MAX_MOVERS {
                Err(LevelsetError::TooManyMovers(self.move_list.len()))?;
            }
            fields.write_u8(FieldTag::MoveList.into())?;
            fields.write_u8((self.move_list.len() * 2) as u8)?;
            for mover in &self.move_list {
                match (u8::try_from(mover.x), u8::try_from(mover.y)) {
                    (Ok(x), Ok(y)) => fields.write_all(&[x, y])?,
                    _ => Err(LevelsetError::MoverOutOfRange(mover.x, mover.y))?,
                }
            }
        }

        Ok(fields)
    }
}
