//! Chip's Challenge 2 game scripts (`.c2g`).
//!
//! A game script drives a CC2 game: it names the game, lists the maps to play and keeps
//! track of progress in variables. This crate parses scripts into a node list and evaluates
//! just enough of them to find out which maps get played, and as which levels.
//!
//! ```
//! use cctools_c2g::{GameScript, MapList};
//! use std::path::Path;
//!
//! let script = GameScript::parse_str("game \"Demo\"\nmap \"l1.c2m\"\nmap \"l2.c2m\"");
//! let list = MapList::from_script(&script, Path::new("/games/demo"));
//! assert_eq!(list.title.as_deref(), Some("Demo"));
//! assert_eq!(list.maps[1].level, 2);
//! assert_eq!(list.maps[1].path, Path::new("/games/demo/l2.c2m"));
//! ```

mod eval;
mod lexer;
mod maplist;
mod node;

pub use eval::SymbolTable;
pub use lexer::{GameScript, ParseOptions};
pub use maplist::{MapEntry, MapList};
pub use node::{Command, Node, NodeKind, Operator};
