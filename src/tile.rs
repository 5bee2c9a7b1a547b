//! Tiles and the per-turn sensor reading

use crate::action::Direction;
use serde::{Deserialize, Serialize};

/// What occupies a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground
    Empty,
    /// Impassable at any elevation
    Wall,
    /// A carryable block; its cell reads one level higher per stacked block
    Block,
    /// The goal tile, sitting atop a tall column
    Gold,
}

impl TileKind {
    pub fn is_wall(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, TileKind::Block)
    }

    pub fn is_gold(&self) -> bool {
        matches!(self, TileKind::Gold)
    }

    /// Single-character glyph used by the text renderer and map dumps.
    pub fn display_char(&self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Wall => '#',
            TileKind::Block => 'o',
            TileKind::Gold => '$',
        }
    }
}

/// One cell as the sensor reports it: what it is and how high it sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub level: i32,
}

impl Tile {
    pub fn new(kind: TileKind, level: i32) -> Tile {
        Tile { kind, level }
    }

    /// Ground-level tile of the given kind.
    pub fn flat(kind: TileKind) -> Tile {
        Tile { kind, level: 0 }
    }
}

/// One turn's sensor reading: the cell under the agent and its four
/// orthogonal neighbors.
///
/// This is the entire per-turn input. The reading is shallow - one cell in
/// each direction, nothing diagonal, nothing at distance two - so the agent
/// only ever learns about cells it walks next to. Readings carry no
/// coordinates; the agent anchors them to its own dead-reckoned position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surroundings {
    pub here: Tile,
    pub left: Tile,
    pub right: Tile,
    pub up: Tile,
    pub down: Tile,
}

impl Surroundings {
    /// The neighbor reading in the given direction.
    pub fn neighbor(&self, dir: Direction) -> Tile {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// A reading of open ground everywhere, handy as a fixture.
    pub fn open() -> Surroundings {
        Surroundings {
            here: Tile::flat(TileKind::Empty),
            left: Tile::flat(TileKind::Empty),
            right: Tile::flat(TileKind::Empty),
            up: Tile::flat(TileKind::Empty),
            down: Tile::flat(TileKind::Empty),
        }
    }
}
