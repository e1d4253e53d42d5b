use crate::{Command, GameScript, NodeKind, Operator, SymbolTable};
use cctools_utils::AnyResult;
use log::debug;
use std::path::{Path, PathBuf};

/// A map played by a game script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// Level number the map is played as.
    pub level: u32,
    /// Map file, resolved against the script's directory.
    pub path: PathBuf,
}

/// Title and maps of a game script, in the order they're played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapList {
    pub title: Option<String>,
    pub maps: Vec<MapEntry>,
}

impl MapList {
    /// Reads a script file and lists its maps, resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let script = GameScript::read(path)?;

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let directory = match directory.is_absolute() {
            true => directory.to_path_buf(),
            false => std::env::current_dir()?.join(directory),
        };
        Ok(Self::from_script(&script, &directory))
    }

    /// Walks the top level of a script, tracking the `level` variable. Every `map` is played
    /// as the current level and advances it, and assignments to `level` renumber the
    /// following maps.
    pub fn from_script(script: &GameScript, directory: &Path) -> Self {
        let mut symbols = SymbolTable::with_engine_constants();
        symbols.set("level", 1);

        let mut list = Self::default();
        for node in &script.nodes {
            if let Some(file) = node.string_param(Command::Map) {
                let level = symbols.get("level");
                debug!("Map {level}: {file}");
                list.maps.push(MapEntry {
                    level,
                    path: directory.join(file),
                });
                symbols.set("level", level.wrapping_add(1));
            } else if let Some(title) = node.string_param(Command::Game) {
                list.title = Some(title.to_string());
            } else if let NodeKind::Operator {
                op: Operator::Assign,
                operands,
            } = &node.kind
            {
                if let NodeKind::Identifier(name) = &operands[0].kind {
                    let value = symbols.evaluate(&operands[1]);
                    debug!("Line {}: {name} = {value}", node.line);
                    symbols.set(name, value);
                }
            }
        }

        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &MapList) -> Vec<(u32, PathBuf)> {
        list.maps
            .iter()
            .map(|entry| (entry.level, entry.path.clone()))
            .collect()
    }

    #[test]
    fn maps_are_numbered_in_order() {
        let script = GameScript::parse_str(
            "game \"Demo\"\n\
             map \"l1.c2m\"\n\
             map \"l2.c2m\"\n",
        );
        let list = MapList::from_script(&script, Path::new("/games/demo"));

        assert_eq!(list.title.as_deref(), Some("Demo"));
        assert_eq!(
            entries(&list),
            [
                (1, PathBuf::from("/games/demo/l1.c2m")),
                (2, PathBuf::from("/games/demo/l2.c2m")),
            ]
        );
    }

    #[test]
    fn assignments_renumber_maps() {
        let script = GameScript::parse_str(
            "map \"a.c2m\"\n\
             10 level =\n\
             map \"b.c2m\"\n\
             level 5 + LEVEL =\n\
             map \"c.c2m\"\n",
        );
        let list = MapList::from_script(&script, Path::new("dir"));
        let levels: Vec<u32> = list.maps.iter().map(|entry| entry.level).collect();
        assert_eq!(levels, [1, 10, 16]);
    }

    #[test]
    fn other_nodes_are_ignored() {
        let script = GameScript::parse_str(
            "game \"First\"\n\
             music \"x.mp3\"\n\
             map\n\
             #label\n\
             chain \"next.c2g\"\n\
             5 3 +\n\
             3 5 =\n\
             game \"Second\"\n",
        );
        let list = MapList::from_script(&script, Path::new("dir"));
        assert_eq!(list.title.as_deref(), Some("Second"));
        assert!(list.maps.is_empty());
    }
}
