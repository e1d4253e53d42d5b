use crate::rle;
use cctools_utils::AnyResult;
use std::io::{Read, Write};

/// Width of every CC1 level.
pub const MAP_WIDTH: usize = 32;
/// Height of every CC1 level.
pub const MAP_HEIGHT: usize = 32;

/// A two layer tile grid. The top layer holds what's visible, and the bottom layer holds what's
/// buried underneath it (`0`, the floor, meaning nothing).
///
/// Both layers are stored row by row and always hold exactly `width * height` tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    width: usize,
    height: usize,
    foreground: Vec<u8>,
    background: Vec<u8>,
}

impl Default for LevelMap {
    fn default() -> Self {
        Self::new(MAP_WIDTH, MAP_HEIGHT)
    }
}

impl LevelMap {
    /// Creates a map of given dimensions filled with floor.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            foreground: vec![0; width * height],
            background: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn foreground(&self) -> &[u8] {
        &self.foreground
    }

    pub fn background(&self) -> &[u8] {
        &self.background
    }

    pub fn foreground_mut(&mut self) -> &mut [u8] {
        &mut self.foreground
    }

    pub fn background_mut(&mut self) -> &mut [u8] {
        &mut self.background
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "position ({x}, {y}) outside of the map"
        );
        y * self.width + x
    }

    /// Returns the top tile at the given position.
    ///
    /// ## Panics
    /// Panics if the position is outside of the map, same with all other positional accessors.
    pub fn fg(&self, x: usize, y: usize) -> u8 {
        self.foreground[self.index(x, y)]
    }

    /// Returns the bottom tile at the given position.
    pub fn bg(&self, x: usize, y: usize) -> u8 {
        self.background[self.index(x, y)]
    }

    pub fn set_fg(&mut self, x: usize, y: usize, tile: u8) {
        let index = self.index(x, y);
        self.foreground[index] = tile;
    }

    pub fn set_bg(&mut self, x: usize, y: usize, tile: u8) {
        let index = self.index(x, y);
        self.background[index] = tile;
    }

    /// Places a tile on top, burying the current top tile. Whatever was buried before is lost.
    pub fn push(&mut self, x: usize, y: usize, tile: u8) {
        let index = self.index(x, y);
        self.background[index] = self.foreground[index];
        self.foreground[index] = tile;
    }

    /// Removes and returns the top tile, bringing the buried tile back up.
    pub fn pop(&mut self, x: usize, y: usize) -> u8 {
        let index = self.index(x, y);
        let tile = self.foreground[index];
        self.foreground[index] = self.background[index];
        self.background[index] = 0;
        tile
    }

    /// Copies a rectangle of both layers from another map. The rectangle is clipped to fit both
    /// maps, and nothing happens if either corner lies outside its map.
    pub fn copy_from(
        &mut self,
        source: &LevelMap,
        (src_x, src_y): (usize, usize),
        (dest_x, dest_y): (usize, usize),
        width: usize,
        height: usize,
    ) {
        if src_x >= source.width || src_y >= source.height {
            return;
        }
        if dest_x >= self.width || dest_y >= self.height {
            return;
        }

        let width = width
            .min(self.width - dest_x)
            .min(source.width - src_x);
        let height = height
            .min(self.height - dest_y)
            .min(source.height - src_y);

        for y in 0..height {
            let from = source.index(src_x, src_y + y);
            let to = self.index(dest_x, dest_y + y);
            self.foreground[to..to + width]
                .copy_from_slice(&source.foreground[from..from + width]);
            self.background[to..to + width]
                .copy_from_slice(&source.background[from..from + width]);
        }
    }

    /// Finds the next position holding `tile` on either layer, scanning row by row after the
    /// given position and wrapping around. The starting position is checked last.
    pub fn find_next(&self, x: usize, y: usize, tile: u8) -> Option<(usize, usize)> {
        let start = self.index(x, y);
        let count = self.foreground.len();

        (1..=count)
            .map(|offset| (start + offset) % count)
            .find(|&index| self.foreground[index] == tile || self.background[index] == tile)
            .map(|index| (index % self.width, index / self.width))
    }

    /// Counts the occurrences of a tile on both layers.
    pub fn count(&self, tile: u8) -> usize {
        self.foreground
            .iter()
            .chain(&self.background)
            .filter(|&&value| value == tile)
            .count()
    }

    /// Reads both layers, foreground first. Returns the amount of bytes consumed.
    pub fn read<R: Read>(&mut self, r: &mut R) -> AnyResult<usize> {
        let tile_count = self.width * self.height;
        let (foreground, fg_size) = rle::read_layer(r, tile_count)?;
        let (background, bg_size) = rle::read_layer(r, tile_count)?;

        self.foreground = foreground;
        self.background = background;
        Ok(fg_size + bg_size)
    }

    /// Writes both layers, foreground first. Returns the amount of bytes written.
    pub fn write<W: Write>(&self, w: &mut W) -> AnyResult<usize> {
        Ok(rle::write_layer(w, &self.foreground)? + rle::write_layer(w, &self.background)?)
    }
}
