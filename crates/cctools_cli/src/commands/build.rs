use ahash::AHashMap;
use anyhow::{bail, ensure};
use cctools_ccl::{LevelData, Levelset, Ruleset};
use cctools_utils::{ok, AnyResult, AnyhowResultExt};
use clap::Args;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Args)]
pub struct BuildCommand {
    /// Output file
    #[clap(long, short = 'o')]
    pub output: PathBuf,
    /// Specification file to use
    pub specification: PathBuf,
}

impl crate::Command for BuildCommand {
    fn run(self) -> AnyResult {
        let spec_text = match fs::read_to_string(&self.specification) {
            Ok(specs) => specs,
            Err(err) => {
                eprintln!("An error occured while reading the specification: {err}");
                return Err(err.into());
            }
        };

        let spec = match toml::from_str::<LevelsetSpecification>(&spec_text) {
            Ok(spec) => spec,
            Err(err) => {
                eprintln!("An error occurred while parsing the specification: {err}");
                return Err(err.into());
            }
        };

        let base = self.specification.parent().unwrap_or_else(|| Path::new(""));
        let mut levelset = compose(&spec, base)?;

        println!(" : Writing {} levels...", levelset.level_count());
        levelset.write_file(&self.output)?;

        ok()
    }
}

/// Contents of a levelset, in order.
///
/// ```toml
/// ruleset = "lynx"
///
/// # Every level of another levelset
/// [[level]]
/// source = "base.dat"
///
/// # A single level, with some changes
/// [[level]]
/// source = "extra.dat"
/// number = 3
/// password = "QWER"
///
/// # A new empty level
/// [[level]]
/// name = "Sandbox"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelsetSpecification {
    /// `ms` or `lynx`, defaults to `ms`.
    pub ruleset: Option<String>,
    #[serde(default, rename = "level")]
    pub levels: Vec<LevelSpecification>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelSpecification {
    /// Levelset to take the level from, relative to the specification.
    pub source: Option<PathBuf>,
    /// 1-based level number within the source. All levels are taken if missing.
    pub number: Option<usize>,

    pub name: Option<String>,
    pub password: Option<String>,
    pub hint: Option<String>,
    pub chips: Option<u16>,
    pub timer: Option<u16>,
}

impl LevelSpecification {
    fn has_overrides(&self) -> bool {
        self.name.is_some()
            || self.password.is_some()
            || self.hint.is_some()
            || self.chips.is_some()
            || self.timer.is_some()
    }

    fn apply(&self, level: &mut LevelData) {
        if let Some(name) = &self.name {
            level.name = name.clone();
        }
        if let Some(password) = &self.password {
            level.password = password.clone();
        }
        if let Some(hint) = &self.hint {
            level.hint = hint.clone();
        }
        if let Some(chips) = self.chips {
            level.chips = chips;
        }
        if let Some(timer) = self.timer {
            level.timer = timer;
        }
    }
}

/// Loads every source levelset once.
#[derive(Default)]
struct SourceCache {
    levelsets: AHashMap<PathBuf, Levelset>,
}

impl SourceCache {
    fn get(&mut self, path: PathBuf) -> AnyResult<&Levelset> {
        if !self.levelsets.contains_key(&path) {
            println!(" : Reading {}...", path.display());
            let levelset = Levelset::open(&path)?;
            self.levelsets.insert(path.clone(), levelset);
        }
        self.levelsets
            .get(&path)
            .otherwise(format!("{} vanished from the cache", path.display()))
    }
}

/// Builds the levelset described by a specification. Source paths are resolved against `base`.
pub fn compose(spec: &LevelsetSpecification, base: &Path) -> AnyResult<Levelset> {
    let ruleset = match spec.ruleset.as_deref() {
        None => Ruleset::default(),
        Some(name) => match Ruleset::try_from(name) {
            Ok(ruleset) => ruleset,
            Err(_) => bail!("unknown ruleset `{name}`, expected `ms` or `lynx`"),
        },
    };

    let mut levelset = Levelset {
        ruleset,
        levels: Vec::new(),
    };
    let mut sources = SourceCache::default();

    for (index, level_spec) in spec.levels.iter().enumerate() {
        let entry = index + 1;
        match (&level_spec.source, level_spec.number) {
            (Some(source), Some(number)) => {
                let source_set = sources.get(base.join(source))?;
                let mut level = number
                    .checked_sub(1)
                    .and_then(|index| source_set.levels.get(index))
                    .cloned()
                    .otherwise(format!(
                        "entry {entry}: {} has no level {number}",
                        source.display()
                    ))?;
                level_spec.apply(&mut level);
                println!("  - Level {number} of {}: {}", source.display(), level.name);
                levelset.push_level(level);
            }
            (Some(source), None) => {
                ensure!(
                    !level_spec.has_overrides(),
                    "entry {entry}: level changes need a level number"
                );
                let source_set = sources.get(base.join(source))?;
                println!(
                    "  - All {} levels of {}",
                    source_set.level_count(),
                    source.display()
                );
                levelset.levels.extend(source_set.levels.iter().cloned());
            }
            (None, Some(_)) => bail!("entry {entry}: a level number needs a source"),
            (None, None) => {
                let level = levelset.add_level();
                level_spec.apply(level);
                println!("  - New level: {}", level.name);
            }
        }
    }

    Ok(levelset)
}
