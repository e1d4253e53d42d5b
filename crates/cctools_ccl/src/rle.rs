//! Run length encoding of tile layers.
//!
//! An encoded layer is a `u16` byte length, followed by that many bytes of either literal tiles,
//! or `[0xFF, count, tile]` triples. Decoding checks both the declared byte length and the
//! amount of produced tiles, which makes it the main corruption detector of the format.

use crate::LevelsetError;
use anyhow::ensure;
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use cctools_utils::AnyResult;
use std::io::{Read, Write};

/// Byte starting an escaped run.
pub const RLE_ESCAPE: u8 = 0xFF;

/// Shortest run of a regular tile that gets escaped.
const MIN_RUN: usize = 4;

/// Encodes a tile layer, without the length prefix.
///
/// Since `0xFF` always starts an escape while decoding, tiles of that value are escaped
/// even when the run is shorter than usual.
pub fn encode(tiles: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(tiles.len());
    let mut rest = tiles;

    while let Some(&tile) = rest.first() {
        let count = rest
            .iter()
            .take(u8::MAX as usize)
            .take_while(|&&next| next == tile)
            .count();

        if count >= MIN_RUN || tile == RLE_ESCAPE {
            result.extend_from_slice(&[RLE_ESCAPE, count as u8, tile]);
        } else {
            result.extend(std::iter::repeat(tile).take(count));
        }

        rest = &rest[count..];
    }

    result
}

/// Decodes an encoded layer (without the length prefix), expecting exactly `tile_count` tiles.
pub fn decode(data: &[u8], tile_count: usize) -> Result<Vec<u8>, LevelsetError> {
    let mut result = Vec::with_capacity(tile_count);
    let mut cursor = 0;

    while cursor < data.len() && result.len() < tile_count {
        if data[cursor] == RLE_ESCAPE {
            if data.len() - cursor < 3 {
                return Err(LevelsetError::RleUnderflow);
            }

            let count = data[cursor + 1] as usize;
            let tile = data[cursor + 2];
            if result.len() + count > tile_count {
                return Err(LevelsetError::RleOverflow);
            }

            result.resize(result.len() + count, tile);
            cursor += 3;
        } else {
            result.push(data[cursor]);
            cursor += 1;
        }
    }

    if cursor != data.len() {
        return Err(LevelsetError::RleOverflow);
    }
    if result.len() != tile_count {
        return Err(LevelsetError::RleUnderflow);
    }

    Ok(result)
}

/// Reads a length prefixed layer. Returns the tiles and the amount of bytes consumed.
pub fn read_layer<R: Read>(r: &mut R, tile_count: usize) -> AnyResult<(Vec<u8>, usize)> {
    let length = r.read_u16::<LE>()? as usize;
    let mut data = vec![0; length];
    r.read_exact(&mut data)?;
    Ok((decode(&data, tile_count)?, length + 2))
}

/// Writes a length prefixed layer. Returns the amount of bytes written.
pub fn write_layer<W: Write>(w: &mut W, tiles: &[u8]) -> AnyResult<usize> {
    let data = encode(tiles);
    ensure!(
        data.len() <= u16::MAX as usize,
        "encoded layer too large ({} bytes)",
        data.len()
    );

    w.write_u16::<LE>(data.len() as u16)?;
    w.write_all(&data)?;
    Ok(data.len() + 2)
}
