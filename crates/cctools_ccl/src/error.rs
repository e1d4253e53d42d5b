use thiserror::Error;

/// Format errors of the binary levelset codec.
///
/// Codec functions return [`cctools_utils::AnyResult`], with these raised into it. Use
/// `downcast_ref::<LevelsetError>()` to tell them apart from plain I/O failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelsetError {
    #[error("Invalid levelset header")]
    InvalidHeader,
    #[error("Invalid map data field")]
    InvalidMapVersion,
    #[error("Corrupt map data")]
    CorruptMapData,
    #[error("Invalid or corrupt level data")]
    CorruptLevelData,
    #[error("Invalid / unrecognized field type ({0})")]
    UnknownField(u8),
    #[error("Invalid trap field size")]
    InvalidTrapField,
    #[error("Invalid clone field size")]
    InvalidCloneField,
    #[error("Invalid move list field size")]
    InvalidMoveListField,
    #[error("Invalid level checksum")]
    InvalidChecksum,
    #[error("Corrupt level data")]
    CorruptClipboardData,
    #[error("RLE buffer overflow")]
    RleOverflow,
    #[error("RLE buffer underflow")]
    RleUnderflow,

    #[error("{field} is too long ({length} bytes, at most 254 are allowed)")]
    FieldTooLong { field: &'static str, length: usize },
    #[error("too many traps ({0}, at most 25 are allowed)")]
    TooManyTraps(usize),
    #[error("too many cloners ({0}, at most 31 are allowed)")]
    TooManyCloners(usize),
    #[error("too many monsters in the move list ({0}, at most 127 are allowed)")]
    TooManyMovers(usize),
    #[error("move list position ({0}, {1}) doesn't fit in a byte")]
    MoverOutOfRange(u16, u16),
    #[error("too many levels ({0})")]
    TooManyLevels(usize),
}
