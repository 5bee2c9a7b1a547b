//! The agent's partial map of the world

use crate::action::Direction;
use crate::tile::{Surroundings, Tile, TileKind};
use std::collections::HashMap;

/// Grid coordinate as (row, col). Rows grow downward, columns rightward.
/// The agent's own frame puts its spawn cell at (0, 0), so coordinates go
/// negative as it explores up and left.
pub type Coord = (i32, i32);

/// Everything the agent has sensed so far, keyed by coordinate.
///
/// Absent keys are unknown territory, not open ground: planning treats them
/// as impassable until a reading fills them in. Repeat readings overwrite,
/// so levels stay current as blocks are picked up and dropped.
#[derive(Clone, Debug, Default)]
pub struct TileMap {
    tiles: HashMap<Coord, Tile>,
}

impl TileMap {
    pub fn new() -> TileMap {
        TileMap {
            tiles: HashMap::new(),
        }
    }

    /// Record or overwrite a single cell.
    pub fn insert(&mut self, at: Coord, tile: Tile) {
        self.tiles.insert(at, tile);
    }

    /// The last reading of a cell, if any.
    pub fn get(&self, at: Coord) -> Option<Tile> {
        self.tiles.get(&at).copied()
    }

    /// The kind of a known cell.
    pub fn kind(&self, at: Coord) -> Option<TileKind> {
        self.get(at).map(|t| t.kind)
    }

    /// Fold one sensor reading into the map: the cell under the agent plus
    /// its four neighbors, all overwritten unconditionally.
    pub fn integrate(&mut self, at: Coord, reading: &Surroundings) {
        self.insert(at, reading.here);
        for dir in Direction::ALL {
            self.insert(dir.step(at), reading.neighbor(dir));
        }
    }

    /// Whether a single step from `from` to the adjacent `to` is legal:
    /// both cells known, neither a wall, and at most one level apart.
    /// Unknown cells never pass.
    pub fn traversable(&self, from: Coord, to: Coord) -> bool {
        let (a, b) = match (self.get(from), self.get(to)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        !a.kind.is_wall() && !b.kind.is_wall() && (a.level - b.level).abs() <= 1
    }

    /// Number of cells sensed so far.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over all known cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.tiles.iter().map(|(&at, &tile)| (at, tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(level: i32) -> Tile {
        Tile::new(TileKind::Empty, level)
    }

    #[test]
    fn test_integrate_writes_all_five_cells() {
        let mut map = TileMap::new();
        let mut reading = Surroundings::open();
        reading.right = Tile::new(TileKind::Gold, 8);
        map.integrate((2, 3), &reading);

        assert_eq!(map.len(), 5);
        assert_eq!(map.kind((2, 3)), Some(TileKind::Empty));
        assert_eq!(map.kind((2, 4)), Some(TileKind::Gold));
        assert_eq!(map.kind((2, 2)), Some(TileKind::Empty));
        assert_eq!(map.kind((1, 3)), Some(TileKind::Empty));
        assert_eq!(map.kind((3, 3)), Some(TileKind::Empty));
        assert_eq!(map.get((0, 0)), None);
    }

    #[test]
    fn test_repeat_readings_overwrite() {
        let mut map = TileMap::new();
        map.insert((0, 0), Tile::new(TileKind::Block, 3));
        map.integrate((0, 0), &Surroundings::open());
        assert_eq!(map.get((0, 0)), Some(open(0)));
    }

    #[test]
    fn test_traversable_requires_both_cells_known() {
        let mut map = TileMap::new();
        map.insert((0, 0), open(0));
        assert!(!map.traversable((0, 0), (0, 1)));
        assert!(!map.traversable((0, 1), (0, 0)));

        map.insert((0, 1), open(0));
        assert!(map.traversable((0, 0), (0, 1)));
    }

    #[test]
    fn test_traversable_rejects_walls_on_either_side() {
        let mut map = TileMap::new();
        map.insert((0, 0), open(0));
        map.insert((0, 1), Tile::flat(TileKind::Wall));
        assert!(!map.traversable((0, 0), (0, 1)));
        assert!(!map.traversable((0, 1), (0, 0)));
    }

    #[test]
    fn test_traversable_tolerates_one_level_of_height() {
        let mut map = TileMap::new();
        map.insert((0, 0), open(0));
        map.insert((0, 1), Tile::new(TileKind::Block, 1));
        map.insert((0, 2), Tile::new(TileKind::Block, 3));

        assert!(map.traversable((0, 0), (0, 1)));
        assert!(map.traversable((0, 1), (0, 0)));
        assert!(!map.traversable((0, 1), (0, 2)));
    }
}
