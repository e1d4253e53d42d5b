//! The CC1 tile set.
//!
//! The codec stores tiles as opaque bytes and never validates them. [`TileKind`] names the values
//! the games know about, for tools that want to reason about level contents.

use cctools_proc::ext_repr;

#[ext_repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Floor = 0x00,
    Wall = 0x01,
    Chip = 0x02,
    Water = 0x03,
    Fire = 0x04,
    InvisibleWall = 0x05,
    BarrierN = 0x06,
    BarrierW = 0x07,
    BarrierS = 0x08,
    BarrierE = 0x09,
    Block = 0x0A,
    Dirt = 0x0B,
    Ice = 0x0C,
    ForceS = 0x0D,
    BlockN = 0x0E,
    BlockW = 0x0F,
    BlockS = 0x10,
    BlockE = 0x11,
    ForceN = 0x12,
    ForceE = 0x13,
    ForceW = 0x14,
    Exit = 0x15,
    DoorBlue = 0x16,
    DoorRed = 0x17,
    DoorGreen = 0x18,
    DoorYellow = 0x19,
    IceSE = 0x1A,
    IceSW = 0x1B,
    IceNW = 0x1C,
    IceNE = 0x1D,
    BlueFloor = 0x1E,
    BlueWall = 0x1F,
    Unused20 = 0x20,
    Thief = 0x21,
    Socket = 0x22,
    ToggleButton = 0x23,
    CloneButton = 0x24,
    ToggleWall = 0x25,
    ToggleFloor = 0x26,
    TrapButton = 0x27,
    TankButton = 0x28,
    Teleport = 0x29,
    Bomb = 0x2A,
    Trap = 0x2B,
    AppearingWall = 0x2C,
    Gravel = 0x2D,
    PopUpWall = 0x2E,
    Hint = 0x2F,
    BarrierSE = 0x30,
    Cloner = 0x31,
    ForceRandom = 0x32,
    PlayerSplash = 0x33,
    PlayerFire = 0x34,
    PlayerBurnt = 0x35,
    Unused36 = 0x36,
    Unused37 = 0x37,
    IceBlock = 0x38,
    PlayerExit = 0x39,
    ExitAnim2 = 0x3A,
    ExitAnim3 = 0x3B,
    PlayerSwimN = 0x3C,
    PlayerSwimW = 0x3D,
    PlayerSwimS = 0x3E,
    PlayerSwimE = 0x3F,
    BugN = 0x40,
    BugW = 0x41,
    BugS = 0x42,
    BugE = 0x43,
    FireballN = 0x44,
    FireballW = 0x45,
    FireballS = 0x46,
    FireballE = 0x47,
    BallN = 0x48,
    BallW = 0x49,
    BallS = 0x4A,
    BallE = 0x4B,
    TankN = 0x4C,
    TankW = 0x4D,
    TankS = 0x4E,
    TankE = 0x4F,
    GliderN = 0x50,
    GliderW = 0x51,
    GliderS = 0x52,
    GliderE = 0x53,
    TeethN = 0x54,
    TeethW = 0x55,
    TeethS = 0x56,
    TeethE = 0x57,
    WalkerN = 0x58,
    WalkerW = 0x59,
    WalkerS = 0x5A,
    WalkerE = 0x5B,
    BlobN = 0x5C,
    BlobW = 0x5D,
    BlobS = 0x5E,
    BlobE = 0x5F,
    CrawlerN = 0x60,
    CrawlerW = 0x61,
    CrawlerS = 0x62,
    CrawlerE = 0x63,
    KeyBlue = 0x64,
    KeyRed = 0x65,
    KeyGreen = 0x66,
    KeyYellow = 0x67,
    Flippers = 0x68,
    FireBoots = 0x69,
    IceSkates = 0x6A,
    ForceBoots = 0x6B,
    PlayerN = 0x6C,
    PlayerW = 0x6D,
    PlayerS = 0x6E,
    PlayerE = 0x6F,
}

impl TileKind {
    /// First and last monster tiles, directions included.
    const MONSTERS: (u8, u8) = (TileKind::BugN as u8, TileKind::CrawlerE as u8);

    /// Checks whether the tile is a monster of any kind and direction.
    pub fn is_monster(tile: u8) -> bool {
        (Self::MONSTERS.0..=Self::MONSTERS.1).contains(&tile)
    }

    /// Checks whether the tile can be listed in a level's monster move list, which also covers
    /// directional blocks.
    pub fn is_mover(tile: u8) -> bool {
        Self::is_monster(tile) || (TileKind::BlockN as u8..=TileKind::BlockE as u8).contains(&tile)
    }

    /// Checks whether the tile is a player tile, not counting death or exit animations.
    pub fn is_player(tile: u8) -> bool {
        (TileKind::PlayerN as u8..=TileKind::PlayerE as u8).contains(&tile)
            || (TileKind::PlayerSwimN as u8..=TileKind::PlayerSwimE as u8).contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::TileKind;

    #[test]
    fn tile_values() {
        assert_eq!(u8::from(TileKind::Floor), 0x00);
        assert_eq!(u8::from(TileKind::CloneButton), 0x24);
        assert_eq!(u8::from(TileKind::Cloner), 0x31);
        assert_eq!(u8::from(TileKind::PlayerE), 0x6F);
        assert_eq!(TileKind::try_from(0x2Bu8), Ok(TileKind::Trap));
        assert!(TileKind::try_from(0x70u8).is_err());
        assert_eq!(TileKind::try_from("teethw"), Ok(TileKind::TeethW));
    }

    #[test]
    fn predicates() {
        assert!(TileKind::is_monster(TileKind::BugN as u8));
        assert!(TileKind::is_monster(TileKind::CrawlerE as u8));
        assert!(!TileKind::is_monster(TileKind::BlockS as u8));
        assert!(TileKind::is_mover(TileKind::BlockS as u8));
        assert!(!TileKind::is_mover(TileKind::Block as u8));
        assert!(TileKind::is_player(TileKind::PlayerSwimW as u8));
        assert!(!TileKind::is_player(TileKind::PlayerBurnt as u8));
    }
}
