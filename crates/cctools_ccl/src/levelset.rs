use crate::{DacFile, LevelData, LevelsetError};
use anyhow::Context;
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use cctools_proc::ext_repr;
use cctools_utils::{ok, AnyResult, AnyhowResultExt};
use log::debug;
use rand::Rng;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, Write},
    path::Path,
};

/// Ruleset of a levelset, stored as the file's magic number.
#[ext_repr(u32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Ruleset {
    #[default]
    Ms = 0x0002AAAC,
    Lynx = 0x0102AAAC,
}

/// Kind of a file holding levels, as told by its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A binary levelset.
    Levelset,
    /// Anything else, presumably a text `.dac` descriptor.
    Dac,
    /// A file too short to tell.
    Unknown,
}

/// An ordered collection of levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levelset {
    pub ruleset: Ruleset,
    pub levels: Vec<LevelData>,
}

impl Levelset {
    /// Creates a levelset with `count` empty levels, named `Level N` and given random passwords.
    pub fn new(count: usize) -> Self {
        let mut levelset = Self::default();
        for _ in 0..count {
            levelset.add_level();
        }
        levelset
    }

    /// Generates a random password of four uppercase letters.
    pub fn random_password() -> String {
        let mut rng = rand::thread_rng();
        (0..4).map(|_| rng.gen_range('A'..='Z')).collect()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Appends a new empty level, named after its position and given a random password.
    pub fn add_level(&mut self) -> &mut LevelData {
        let name = format!("Level {}", self.levels.len() + 1);
        self.push_level(LevelData::with_name(name, Self::random_password()))
    }

    /// Appends an existing level.
    pub fn push_level(&mut self, level: LevelData) -> &mut LevelData {
        self.levels.push(level);
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    /// Inserts a level at given position.
    ///
    /// ## Panics
    /// Panics if `index > level_count()`.
    pub fn insert_level(&mut self, index: usize, level: LevelData) {
        self.levels.insert(index, level);
    }

    /// Removes the level at given position and hands it over to the caller.
    ///
    /// ## Panics
    /// Panics if `index >= level_count()`.
    pub fn take_level(&mut self, index: usize) -> LevelData {
        self.levels.remove(index)
    }

    pub fn read<R: Read>(r: &mut R) -> AnyResult<Self> {
        let magic = r.read_u32::<LE>()?;
        let ruleset = match Ruleset::try_from(magic) {
            Ok(ruleset) => ruleset,
            Err(_) => {
                debug!("Unknown levelset magic {magic:#010X}");
                Err(LevelsetError::InvalidHeader)?
            }
        };

        let count = r.read_u16::<LE>()?;
        let mut levels = Vec::with_capacity(count as usize);
        for i in 0..count {
            let level = LevelData::read(r)
                .with_context(|| format!("couldn't read level {} of {count}", i + 1))?;
            debug!("Read level {}: {}", level.number, level.name);
            levels.push(level);
        }

        Ok(Self { ruleset, levels })
    }

    /// Writes the levelset. Every level is renumbered to its position first, counting from 1.
    pub fn write<W: Write + Seek>(&mut self, w: &mut W) -> AnyResult {
        let count = match u16::try_from(self.levels.len()) {
            Ok(count) => count,
            Err(_) => Err(LevelsetError::TooManyLevels(self.levels.len()))?,
        };

        w.write_u32::<LE>(self.ruleset.into())?;
        w.write_u16::<LE>(count)?;

        for (level, number) in self.levels.iter_mut().zip(1..) {
            level.number = number;
            level
                .write(w)
                .with_context(|| format!("couldn't write level {number} ({})", level.name))?;
        }

        ok()
    }

    /// Reads a binary levelset file.
    pub fn read_file(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).otherwise(format!("couldn't open {}", path.display()))?;
        Self::read(&mut BufReader::new(file))
    }

    /// Writes a binary levelset file, replacing any existing one.
    pub fn write_file(&mut self, path: impl AsRef<Path>) -> AnyResult {
        let path = path.as_ref();
        let file = File::create(path).otherwise(format!("couldn't create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        ok()
    }

    /// Opens either a binary levelset, or a `.dac` descriptor pointing at one. A descriptor's
    /// ruleset takes priority over the one stored in the levelset.
    pub fn open(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        match detect_file_kind(path)? {
            FileKind::Levelset => Self::read_file(path),
            FileKind::Dac => {
                let dac = DacFile::read_file(path)?;
                let directory = path.parent().unwrap_or_else(|| Path::new(""));
                dac.load_levelset(directory)
            }
            FileKind::Unknown => Err(LevelsetError::InvalidHeader)
                .otherwise(format!("{} isn't a levelset", path.display())),
        }
    }
}

/// Tells a binary levelset apart from a `.dac` descriptor by its magic number.
pub fn detect_file_kind(path: impl AsRef<Path>) -> AnyResult<FileKind> {
    let path = path.as_ref();
    let mut file = File::open(path).otherwise(format!("couldn't open {}", path.display()))?;

    let mut magic = [0; 4];
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..])? {
            0 => return Ok(FileKind::Unknown),
            n => filled += n,
        }
    }

    Ok(match Ruleset::try_from(u32::from_le_bytes(magic)) {
        Ok(_) => FileKind::Levelset,
        Err(_) => FileKind::Dac,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_to_vec(levelset: &mut Levelset) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        levelset.write(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn header_layout() {
        let mut levelset = Levelset {
            ruleset: Ruleset::Lynx,
            levels: vec![LevelData::default(); 3],
        };
        let buffer = write_to_vec(&mut levelset);
        assert_eq!(&buffer[0..6], &[0xAC, 0xAA, 0x02, 0x01, 3, 0]);

        let read_back = Levelset::read(&mut Cursor::new(&buffer)).unwrap();
        assert_eq!(read_back, levelset);
    }

    #[test]
    fn write_renumbers_levels() {
        let mut levelset = Levelset::default();
        for (number, name) in [(7, "A"), (7, "B"), (0, "C")] {
            let mut level = LevelData::with_name(name, "PASS");
            level.number = number;
            levelset.push_level(level);
        }

        let buffer = write_to_vec(&mut levelset);
        let numbers: Vec<u16> = levelset.levels.iter().map(|l| l.number).collect();
        assert_eq!(numbers, [1, 2, 3]);

        let read_back = Levelset::read(&mut Cursor::new(&buffer)).unwrap();
        let summary: Vec<(u16, &str)> = read_back
            .levels
            .iter()
            .map(|l| (l.number, l.name.as_str()))
            .collect();
        assert_eq!(summary, [(1, "A"), (2, "B"), (3, "C")]);

        // Reordering in memory is all it takes to renumber
        let last = levelset.take_level(2);
        levelset.insert_level(0, last);
        write_to_vec(&mut levelset);
        assert_eq!(levelset.levels[0].name, "C");
        assert_eq!(levelset.levels[0].number, 1);
        assert_eq!(levelset.levels[2].number, 3);
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let mut buffer = 0x12345678u32.to_le_bytes().to_vec();
        buffer.extend_from_slice(&[0, 0]);

        let error = Levelset::read(&mut Cursor::new(&buffer)).unwrap_err();
        assert_eq!(
            error.downcast_ref::<LevelsetError>(),
            Some(&LevelsetError::InvalidHeader)
        );
    }

    #[test]
    fn corrupt_level_aborts_the_load() {
        let mut levelset = Levelset::new(3);
        let mut buffer = write_to_vec(&mut levelset);

        // Break the map version of the last level
        let last_level = buffer.len() - (buffer.len() - 6) / 3;
        buffer[last_level + 8] = 0;

        let error = Levelset::read(&mut Cursor::new(&buffer)).unwrap_err();
        assert_eq!(
            error.downcast_ref::<LevelsetError>(),
            Some(&LevelsetError::InvalidMapVersion)
        );
        assert!(error.to_string().contains("level 3 of 3"));
    }

    #[test]
    fn new_levelsets() {
        let mut levelset = Levelset::new(2);
        assert_eq!(levelset.ruleset, Ruleset::Ms);
        assert_eq!(levelset.level_count(), 2);
        assert_eq!(levelset.levels[1].name, "Level 2");

        let added = levelset.add_level();
        assert_eq!(added.name, "Level 3");
        let password = added.password.clone();
        assert_eq!(password.len(), 4);
        assert!(password.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn random_passwords() {
        for _ in 0..100 {
            let password = Levelset::random_password();
            assert_eq!(password.len(), 4);
            assert!(password.bytes().all(|b| b.is_ascii_uppercase()));
        }
    }
}
