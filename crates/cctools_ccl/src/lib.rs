//! Chip's Challenge 1 levelsets.
//!
//! A levelset (`.dat`/`.ccl`) is a header followed by a list of level records. Every level
//! holds a 32x32 two layer tile map and a set of tagged fields (name, password, hint and the
//! trap, cloner and monster lists).
//!
//! ```no_run
//! use cctools_ccl::Levelset;
//!
//! let mut levelset = Levelset::read_file("CHIPS.DAT")?;
//! levelset.levels.swap(0, 1);
//! levelset.write_file("CHIPS.DAT")?; // levels get renumbered on write
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! All codec functions return [`cctools_utils::AnyResult`]. Format errors are raised as
//! [`LevelsetError`], [`DacError`] or [`CcxError`] and can be recovered with
//! `anyhow::Error::downcast_ref`.

pub mod ccx;
pub mod dac;
pub mod rle;
pub mod stream;

mod clipboard;
mod error;
mod level;
mod levelset;
mod map;
mod tile;

pub use ccx::{CcxError, CcxLevel, CcxLevelset};
pub use clipboard::ClipboardData;
pub use dac::{DacError, DacFile};
pub use error::LevelsetError;
pub use level::{Cloner, FieldTag, LevelData, Point, RecordMode, Trap};
pub use levelset::{detect_file_kind, FileKind, Levelset, Ruleset};
pub use map::{LevelMap, MAP_HEIGHT, MAP_WIDTH};
pub use tile::TileKind;

/// Most traps a level can hold.
pub const MAX_TRAPS: usize = 25;
/// Most cloners a level can hold.
pub const MAX_CLONERS: usize = 31;
/// Most monsters the move list can hold.
pub const MAX_MOVERS: usize = 127;
/// Longest string field content, leaving room for the terminator in a `u8` sized field.
pub const MAX_STRING_LENGTH: usize = 254;
