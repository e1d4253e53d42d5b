use cctools_c2g::{Command, GameScript, MapList, NodeKind};
use std::fs;

#[test]
fn demo_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.c2g");
    fs::write(&path, "game \"Demo\"\nmap \"l1.c2m\"\nmap \"l2.c2m\"\n").unwrap();

    let list = MapList::load(&path).unwrap();
    assert_eq!(list.title.as_deref(), Some("Demo"));

    let entries: Vec<_> = list
        .maps
        .iter()
        .map(|entry| (entry.level, entry.path.clone()))
        .collect();
    assert_eq!(
        entries,
        [
            (1, dir.path().join("l1.c2m")),
            (2, dir.path().join("l2.c2m")),
        ]
    );
}

#[test]
fn realistic_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.c2g");
    fs::write(
        &path,
        "game \"Chips Challenge 2\"\r\n\
         ; title screen first\r\n\
         music \"title.ogg\"\r\n\
         0 reg1 =\r\n\
         #next\r\n\
         chain \"other.c2g\" // never played by the map list\r\n\
         map \"maps/001.c2m\"\r\n\
         reg1 1 + reg1 =\r\n\
         map \"maps/002.c2m\"\r\n\
         5 level =\r\n\
         map \"maps/bonus.c2m\"\r\n\
         script\r\n\
         \"Well done!\"\r\n\
         end",
    )
    .unwrap();

    let script = GameScript::read(&path).unwrap();
    assert_eq!(script.junk().count(), 0);
    assert!(script
        .nodes
        .iter()
        .any(|node| matches!(&node.kind, NodeKind::Script(lines) if lines.len() == 1)));
    assert!(matches!(
        script.nodes.last().map(|node| &node.kind),
        Some(NodeKind::Command {
            command: Command::End,
            param: None
        })
    ));

    let list = MapList::from_script(&script, dir.path());
    assert_eq!(list.title.as_deref(), Some("Chips Challenge 2"));
    let levels: Vec<u32> = list.maps.iter().map(|entry| entry.level).collect();
    assert_eq!(levels, [1, 2, 5]);
    assert_eq!(list.maps[2].path, dir.path().join("maps/bonus.c2m"));
}

#[test]
fn junk_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.c2g");
    fs::write(&path, "map \"a.c2m\"\n2 + 2\n@@@\n").unwrap();

    let script = GameScript::read(&path).unwrap();
    let junk: Vec<usize> = script.junk().map(|node| node.line).collect();
    assert_eq!(junk, [3]);

    // `2 + 2` is valid, if odd: `+` combines the map command with the first 2
    let list = MapList::from_script(&script, dir.path());
    assert!(list.maps.is_empty());
}

#[test]
fn missing_script() {
    let dir = tempfile::tempdir().unwrap();
    assert!(MapList::load(dir.path().join("nowhere.c2g")).is_err());
}

#[test]
fn non_ascii_map_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caf\u{e9}.c2g");
    fs::write(&path, "game \"Caf\u{e9}\"\nmap \"caf\u{e9}.c2m\"\n").unwrap();
    fs::write(dir.path().join("caf\u{e9}.c2m"), b"").unwrap();

    let list = MapList::load(&path).unwrap();
    assert_eq!(list.title.as_deref(), Some("Caf\u{e9}"));
    assert_eq!(list.maps.len(), 1);
    assert_eq!(list.maps[0].path, dir.path().join("caf\u{e9}.c2m"));
    assert!(list.maps[0].path.exists());
}
