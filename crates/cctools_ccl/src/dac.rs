//! TWorld `.dac` levelset descriptors.
//!
//! A descriptor is a text file of `key=value` lines pointing at a binary levelset and
//! overriding some of the ways it's played:
//! ```text
//! file=CCLP1.dat
//! ruleset=lynx
//! lastlevel=144
//! ```

use crate::{Levelset, Ruleset};
use cctools_utils::{ok, AnyResult, AnyhowResultExt};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DacError {
    #[error("Invalid DAC file format")]
    InvalidFormat,
    #[error("Unexpected/unsupported DAC parameter ({0})")]
    UnknownParameter(String),
    #[error("Invalid parameter, expected 'y' or 'n'")]
    ExpectedFlag,
    #[error("Invalid parameter, expected 'ms' or 'lynx'")]
    ExpectedRuleset,
    #[error("Invalid parameter, expected integer constant")]
    ExpectedInteger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DacFile {
    /// Levelset file, relative to the descriptor.
    pub filename: String,
    pub ruleset: Ruleset,
    /// Number of the last level, with any levels after it treated as bonus levels. 0 means the
    /// last level of the levelset.
    pub last_level: i32,
    pub use_passwords: bool,
    /// Whether TWorld should correct Lynx-specific quirks of levels converted from MS.
    pub fix_lynx: bool,
}

impl Default for DacFile {
    fn default() -> Self {
        Self {
            filename: String::new(),
            ruleset: Ruleset::Ms,
            last_level: 0,
            use_passwords: true,
            fix_lynx: false,
        }
    }
}

/// Level count of the original game, the last 5 levels of which are secret.
const ORIGINAL_LEVEL_COUNT: usize = 149;
const ORIGINAL_LAST_LEVEL: i32 = 144;

fn parse_flag(value: &str) -> Result<bool, DacError> {
    if value.eq_ignore_ascii_case("y") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("n") {
        Ok(false)
    } else {
        Err(DacError::ExpectedFlag)
    }
}

impl DacFile {
    /// Creates a descriptor for a levelset stored in `filename`.
    pub fn from_levelset(levelset: &Levelset, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ruleset: levelset.ruleset,
            last_level: match levelset.level_count() {
                ORIGINAL_LEVEL_COUNT => ORIGINAL_LAST_LEVEL,
                _ => 0,
            },
            use_passwords: true,
            fix_lynx: false,
        }
    }

    pub fn read<R: BufRead>(r: &mut R) -> AnyResult<Self> {
        let mut dac = Self::default();

        // Split on raw bytes, so a binary file is a format error and not an I/O one
        for line in r.split(b'\n') {
            let line = line?;
            let Ok(line) = std::str::from_utf8(&line) else {
                return Err(DacError::InvalidFormat.into());
            };
            let Some((key, value)) = line.split_once('=') else {
                if line.trim().is_empty() {
                    continue;
                }
                return Err(DacError::InvalidFormat.into());
            };

            let key = key.trim();
            let value = value.trim();
            debug!("DAC parameter `{key}` = `{value}`");

            match key.to_ascii_lowercase().as_str() {
                "file" => dac.filename = value.to_string(),
                "usepasswords" => dac.use_passwords = parse_flag(value)?,
                "fixlynx" => dac.fix_lynx = parse_flag(value)?,
                "ruleset" => {
                    dac.ruleset = match Ruleset::try_from(value) {
                        Ok(ruleset) => ruleset,
                        Err(_) => Err(DacError::ExpectedRuleset)?,
                    }
                }
                "lastlevel" => {
                    dac.last_level = match value.parse() {
                        Ok(number) => number,
                        Err(_) => Err(DacError::ExpectedInteger)?,
                    }
                }
                _ => Err(DacError::UnknownParameter(key.to_string()))?,
            }
        }

        Ok(dac)
    }

    /// Writes the descriptor. Only `file` and `ruleset` are always present, other values are
    /// written when they differ from the defaults.
    pub fn write<W: Write>(&self, w: &mut W) -> AnyResult {
        writeln!(w, "file={}", self.filename)?;
        if !self.use_passwords {
            writeln!(w, "usepasswords=n")?;
        }
        let ruleset: &'static str = self.ruleset.into();
        writeln!(w, "ruleset={}", ruleset.to_ascii_lowercase())?;
        if self.last_level != 0 {
            writeln!(w, "lastlevel={}", self.last_level)?;
        }
        if self.fix_lynx {
            writeln!(w, "fixlynx=y")?;
        }
        ok()
    }

    pub fn read_file(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).otherwise(format!("couldn't open {}", path.display()))?;
        Self::read(&mut BufReader::new(file))
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> AnyResult {
        let path = path.as_ref();
        let file = File::create(path).otherwise(format!("couldn't create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        ok()
    }

    /// Loads the levelset this descriptor points at, with its ruleset replaced by the
    /// descriptor's.
    pub fn load_levelset(&self, directory: impl AsRef<Path>) -> AnyResult<Levelset> {
        let mut levelset = Levelset::read_file(directory.as_ref().join(&self.filename))?;
        levelset.ruleset = self.ruleset;
        Ok(levelset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LevelData;

    fn read_str(text: &str) -> AnyResult<DacFile> {
        DacFile::read(&mut text.as_bytes())
    }

    fn read_error(text: &str) -> DacError {
        read_str(text)
            .unwrap_err()
            .downcast::<DacError>()
            .expect("a DAC error")
    }

    #[test]
    fn reads_all_parameters() {
        let dac = read_str(
            "File = CCLP1.dat\r\n\
             \n\
             RULESET=Lynx\n\
             usepasswords=N\n\
             lastlevel= 144\n\
             fixlynx=y\n",
        )
        .unwrap();

        assert_eq!(
            dac,
            DacFile {
                filename: "CCLP1.dat".into(),
                ruleset: Ruleset::Lynx,
                last_level: 144,
                use_passwords: false,
                fix_lynx: true,
            }
        );
    }

    #[test]
    fn defaults() {
        let dac = read_str("file=a.dat").unwrap();
        assert_eq!(dac.ruleset, Ruleset::Ms);
        assert!(dac.use_passwords);
        assert!(!dac.fix_lynx);
        assert_eq!(dac.last_level, 0);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(read_error("file=a.dat\nnonsense\n"), DacError::InvalidFormat);
        assert_eq!(
            read_error("colour=red"),
            DacError::UnknownParameter("colour".into())
        );
        assert_eq!(read_error("usepasswords=maybe"), DacError::ExpectedFlag);
        assert_eq!(read_error("ruleset=pedantic"), DacError::ExpectedRuleset);
        assert_eq!(read_error("lastlevel=many"), DacError::ExpectedInteger);
    }

    #[test]
    fn binary_data_is_malformed() {
        let error = DacFile::read(&mut &[0x12, 0x34, 0xFF, 0xFE, b'=', 0x80][..])
            .unwrap_err()
            .downcast::<DacError>()
            .expect("a DAC error");
        assert_eq!(error, DacError::InvalidFormat);

        let dac = DacFile::read(&mut "file=caf\u{e9}.dat\r\n".as_bytes()).unwrap();
        assert_eq!(dac.filename, "caf\u{e9}.dat");
    }

    #[test]
    fn writes_only_non_default_values() {
        let mut output = Vec::new();
        DacFile {
            filename: "set.dat".into(),
            ..Default::default()
        }
        .write(&mut output)
        .unwrap();
        assert_eq!(output, b"file=set.dat\nruleset=ms\n");

        let dac = DacFile {
            filename: "set.dat".into(),
            ruleset: Ruleset::Lynx,
            last_level: 144,
            use_passwords: false,
            fix_lynx: true,
        };
        let mut output = Vec::new();
        dac.write(&mut output).unwrap();
        assert_eq!(
            String::from_utf8(output.clone()).unwrap(),
            "file=set.dat\nusepasswords=n\nruleset=lynx\nlastlevel=144\nfixlynx=y\n"
        );
        assert_eq!(DacFile::read(&mut output.as_slice()).unwrap(), dac);
    }

    #[test]
    fn from_levelset() {
        let mut levelset = Levelset {
            ruleset: Ruleset::Lynx,
            levels: vec![LevelData::default(); 149],
        };
        let dac = DacFile::from_levelset(&levelset, "CHIPS.DAT");
        assert_eq!(dac.last_level, 144);
        assert_eq!(dac.ruleset, Ruleset::Lynx);
        assert!(dac.use_passwords);

        levelset.levels.pop();
        assert_eq!(DacFile::from_levelset(&levelset, "x").last_level, 0);
    }
}
