//! Diggable ground layer
//!
//! A dense grid laid over the grass background. Every cell starts empty
//! (grass shows through) and turns into dirt once dug. Dirt is permanent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Ground cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Dirt,
}

/// Integer tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// The ground layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    cells: Vec<TileKind>,
}

impl TileMap {
    /// Create an empty map covering a world of the given pixel size
    pub fn for_world(world_width: f32, world_height: f32) -> Self {
        let width = (world_width / TILE_SIZE).ceil() as u32;
        let height = (world_height / TILE_SIZE).ceil() as u32;
        Self::new(width, height)
    }

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![TileKind::Empty; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile under a world position, `None` outside the map
    pub fn tile_at_world(&self, pos: Vec2) -> Option<TileCoord> {
        let tx = (pos.x / TILE_SIZE).floor();
        let ty = (pos.y / TILE_SIZE).floor();
        if tx < 0.0 || ty < 0.0 || tx >= self.width as f32 || ty >= self.height as f32 {
            return None;
        }
        Some(TileCoord {
            x: tx as u32,
            y: ty as u32,
        })
    }

    pub fn get(&self, coord: TileCoord) -> Option<TileKind> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Turn a tile into dirt.
    ///
    /// Returns `true` only when the tile changed; digging dirt again is a no-op.
    pub fn dig(&mut self, coord: TileCoord) -> bool {
        let Some(i) = self.index(coord) else {
            return false;
        };
        if self.cells[i] == TileKind::Dirt {
            return false;
        }
        self.cells[i] = TileKind::Dirt;
        true
    }

    /// Pixel centre of a tile
    pub fn tile_center(coord: TileCoord) -> Vec2 {
        Vec2::new(
            coord.x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            coord.y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// Number of dug tiles
    pub fn dirt_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == TileKind::Dirt).count()
    }

    /// Iterate dug tiles (row-major)
    pub fn dirt_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == TileKind::Dirt)
            .map(move |(i, _)| TileCoord {
                x: i as u32 % width,
                y: i as u32 / width,
            })
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.x >= self.width || coord.y >= self.height {
            return None;
        }
        Some((coord.y * self.width + coord.x) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_world_grid_size() {
        let map = TileMap::for_world(2000.0, 2000.0);
        assert_eq!(map.width(), 63);
        assert_eq!(map.height(), 63);
        assert_eq!(map.dirt_count(), 0);
    }

    #[test]
    fn test_tile_at_world_bounds() {
        let map = TileMap::new(4, 4);
        assert_eq!(
            map.tile_at_world(Vec2::new(33.0, 0.0)),
            Some(TileCoord { x: 1, y: 0 })
        );
        assert_eq!(map.tile_at_world(Vec2::new(-0.5, 10.0)), None);
        assert_eq!(map.tile_at_world(Vec2::new(10.0, 128.0)), None);
    }

    #[test]
    fn test_dig_once() {
        let mut map = TileMap::new(4, 4);
        let c = TileCoord { x: 2, y: 3 };
        assert!(map.dig(c));
        assert_eq!(map.get(c), Some(TileKind::Dirt));
        assert!(!map.dig(c));
        assert_eq!(map.dirt_count(), 1);
        assert_eq!(map.dirt_tiles().collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_dig_outside_is_noop() {
        let mut map = TileMap::new(2, 2);
        assert!(!map.dig(TileCoord { x: 5, y: 0 }));
        assert_eq!(map.dirt_count(), 0);
    }

    #[test]
    fn test_tile_center() {
        let c = TileMap::tile_center(TileCoord { x: 1, y: 2 });
        assert_eq!(c, Vec2::new(48.0, 80.0));
    }

    proptest! {
        #[test]
        fn dirt_never_reverts(digs in proptest::collection::vec((0u32..8, 0u32..8), 0..64)) {
            let mut map = TileMap::new(8, 8);
            let mut dug = std::collections::HashSet::new();
            for (x, y) in digs {
                let c = TileCoord { x, y };
                let changed = map.dig(c);
                prop_assert_eq!(changed, dug.insert(c));
                prop_assert_eq!(map.get(c), Some(TileKind::Dirt));
            }
            prop_assert_eq!(map.dirt_count(), dug.len());
        }
    }
}
