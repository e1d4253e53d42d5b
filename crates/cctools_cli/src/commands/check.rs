use ahash::AHashMap;
use anyhow::bail;
use cctools_ccl::{LevelData, LevelMap, Levelset, Point, TileKind};
use cctools_utils::{ok, AnyResult};
use clap::Args;
use std::{fmt, path::PathBuf};

#[derive(Args)]
pub struct CheckCommand {
    /// Levelset or `.dac` descriptor to check
    pub levelset: PathBuf,
}

impl crate::Command for CheckCommand {
    fn run(self) -> AnyResult {
        let levelset = Levelset::open(&self.levelset)?;
        let problems = check_levelset(&levelset);

        for problem in &problems {
            println!("{problem}");
        }

        match problems.len() {
            0 => {
                println!("No errors found!");
                ok()
            }
            count => bail!("found {count} problem(s) in {}", self.levelset.display()),
        }
    }
}

/// A design error found in a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// 1-based position of the level.
    pub level: usize,
    pub name: String,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.level, self.name, self.message)
    }
}

/// Checks every level, along with password uniqueness across the levelset.
pub fn check_levelset(levelset: &Levelset) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut passwords: AHashMap<&str, usize> = AHashMap::new();

    for (index, level) in levelset.levels.iter().enumerate() {
        let position = index + 1;
        let mut report = |message: String| {
            problems.push(Problem {
                level: position,
                name: level.name.clone(),
                message,
            })
        };

        for message in check_level(level) {
            report(message);
        }

        if !level.password.is_empty() {
            if let Some(first) = passwords.insert(&level.password, position) {
                report(format!(
                    "password `{}` is also used by level {first}",
                    level.password
                ));
            }
        }
    }

    problems
}

fn at(map: &LevelMap, point: Point) -> Option<(u8, u8)> {
    let (x, y) = (point.x as usize, point.y as usize);
    (x < map.width() && y < map.height()).then(|| (map.fg(x, y), map.bg(x, y)))
}

fn has_tile(map: &LevelMap, point: Point, tile: TileKind) -> bool {
    at(map, point).map_or(false, |(fg, bg)| fg == tile as u8 || bg == tile as u8)
}

/// Checks a single level for design errors.
pub fn check_level(level: &LevelData) -> Vec<String> {
    let mut problems = Vec::new();
    let map = &level.map;

    let mut players = 0;
    for y in 0..map.height() {
        for x in 0..map.width() {
            let (fg, bg) = (map.fg(x, y), map.bg(x, y));
            if (TileKind::PlayerN as u8..=TileKind::PlayerE as u8).contains(&fg) {
                players += 1;
            }
            if TileKind::is_player(bg) {
                problems.push(format!("buried player tile at ({x}, {y})"));
            }
            for tile in [fg, bg] {
                if tile == TileKind::IceBlock as u8 {
                    problems.push(format!("ice block at ({x}, {y}) needs a PGChips ruleset"));
                } else if tile == TileKind::Unused20 as u8
                    || (TileKind::PlayerSplash as u8..=TileKind::PlayerSwimE as u8).contains(&tile)
                {
                    problems.push(format!("reserved tile {tile:#04X} at ({x}, {y})"));
                }
            }
        }
    }

    if map.count(TileKind::Exit as u8) == 0 {
        problems.push("no exit tile is present in the level".into());
    }

    let chips = map.count(TileKind::Chip as u8);
    if chips < level.chips as usize {
        problems.push(format!(
            "not enough chips to meet goal (need {} more)",
            level.chips as usize - chips
        ));
    }

    match players {
        0 => problems.push("no player start tile is present in the level".into()),
        1 => {}
        _ => problems.push(format!("{players} player start tiles are present in the level")),
    }

    if level.password.len() != 4 || !level.password.bytes().all(|b| b.is_ascii_uppercase()) {
        problems.push(format!(
            "password `{}` should be 4 uppercase letters",
            level.password
        ));
    }

    for trap in &level.traps {
        if !has_tile(map, trap.button, TileKind::TrapButton) {
            problems.push(format!("no trap button at {:?}", (trap.button.x, trap.button.y)));
        }
        if !has_tile(map, trap.trap, TileKind::Trap) {
            problems.push(format!("no trap at {:?}", (trap.trap.x, trap.trap.y)));
        }
    }

    for cloner in &level.clones {
        if !has_tile(map, cloner.button, TileKind::CloneButton) {
            problems.push(format!(
                "no clone button at {:?}",
                (cloner.button.x, cloner.button.y)
            ));
        }
        if !has_tile(map, cloner.cloner, TileKind::Cloner) {
            problems.push(format!(
                "no cloner at {:?}",
                (cloner.cloner.x, cloner.cloner.y)
            ));
        }
    }

    for mover in level.stray_movers() {
        problems.push(format!(
            "move list entry at {:?} isn't a monster",
            (mover.x, mover.y)
        ));
    }

    problems
}
