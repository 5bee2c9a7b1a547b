//! The simulated grid world the agent runs against
//!
//! Cells have a base kind and elevation plus a stack of carryable blocks.
//! The sensor reports a stacked cell as a block at its top level, so the
//! agent sees exactly what it could pick up. The world executes one action
//! per turn under the same movement rule the agent plans with: no walls,
//! at most one level of height change per step.

use crate::action::{Action, Direction};
use crate::map::Coord;
use crate::tile::{Surroundings, Tile, TileKind};
use serde::{Deserialize, Serialize};

/// One world cell: permanent terrain plus any blocks resting on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Cell {
    base: TileKind,
    level: i32,
    stack: i32,
}

impl Cell {
    fn flat() -> Cell {
        Cell {
            base: TileKind::Empty,
            level: 0,
            stack: 0,
        }
    }

    fn wall() -> Cell {
        Cell {
            base: TileKind::Wall,
            level: 0,
            stack: 0,
        }
    }

    /// How the sensor reports this cell: stacked blocks read as a block
    /// at the top of the pile, otherwise the bare terrain shows.
    fn sensed(&self) -> Tile {
        if self.stack > 0 {
            Tile::new(TileKind::Block, self.level + self.stack)
        } else {
            Tile::new(self.base, self.level)
        }
    }
}

/// A bounded grid world with an agent in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    agent: Coord,
    carrying: bool,
    gold: Option<Coord>,
}

impl World {
    /// A walled rectangle of flat open ground. The agent starts at (1, 1).
    pub fn new(rows: i32, cols: i32) -> World {
        let rows = rows.max(3);
        let cols = cols.max(3);
        let mut cells = vec![Cell::flat(); (rows * cols) as usize];
        for r in 0..rows {
            for c in 0..cols {
                if r == 0 || c == 0 || r == rows - 1 || c == cols - 1 {
                    cells[(r * cols + c) as usize] = Cell::wall();
                }
            }
        }
        World {
            rows,
            cols,
            cells,
            agent: (1, 1),
            carrying: false,
            gold: None,
        }
    }

    /// Parse a world from glyph rows: '#' wall, '.' open ground, 'o' one
    /// loose block, '$' the gold column, '@' the agent on open ground,
    /// digits open ground at that level. Rows must be equal length.
    pub fn from_rows(rows: &[&str], gold_height: i32) -> World {
        assert!(!rows.is_empty(), "world needs at least one row");
        let cols = rows[0].chars().count();
        let mut world = World::new(rows.len() as i32, cols as i32);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), cols, "ragged row {r} in world literal");
            for (c, glyph) in row.chars().enumerate() {
                let at = (r as i32, c as i32);
                match glyph {
                    '#' => world.set_base(at, TileKind::Wall, 0),
                    '.' => world.set_base(at, TileKind::Empty, 0),
                    'o' => {
                        world.set_base(at, TileKind::Empty, 0);
                        world.add_blocks(at, 1);
                    }
                    '$' => world.set_base(at, TileKind::Gold, gold_height),
                    '@' => {
                        world.set_base(at, TileKind::Empty, 0);
                        world.place_agent(at);
                    }
                    d if d.is_ascii_digit() => {
                        world.set_base(at, TileKind::Empty, d as i32 - '0' as i32)
                    }
                    other => panic!("unknown world glyph {other:?}"),
                }
            }
        }
        world
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.0 >= 0 && at.0 < self.rows && at.1 >= 0 && at.1 < self.cols
    }

    fn idx(&self, at: Coord) -> usize {
        (at.0 * self.cols + at.1) as usize
    }

    /// The cell as the sensor would report it. Out-of-bounds cells read as
    /// ground-level wall, so the grid edge looks solid.
    pub fn tile(&self, at: Coord) -> Tile {
        if !self.in_bounds(at) {
            return Tile::flat(TileKind::Wall);
        }
        self.cells[self.idx(at)].sensed()
    }

    /// Overwrite a cell's terrain, clearing any stacked blocks. Setting a
    /// gold tile records it as the goal.
    pub fn set_base(&mut self, at: Coord, kind: TileKind, level: i32) {
        if !self.in_bounds(at) {
            return;
        }
        let idx = self.idx(at);
        self.cells[idx] = Cell {
            base: kind,
            level,
            stack: 0,
        };
        if kind == TileKind::Gold {
            self.gold = Some(at);
        }
    }

    /// Stack loose blocks on a cell.
    pub fn add_blocks(&mut self, at: Coord, count: i32) {
        if !self.in_bounds(at) {
            return;
        }
        let idx = self.idx(at);
        self.cells[idx].stack += count;
    }

    pub fn place_agent(&mut self, at: Coord) {
        if self.in_bounds(at) {
            self.agent = at;
        }
    }

    /// The agent's position in world coordinates.
    pub fn agent(&self) -> Coord {
        self.agent
    }

    pub fn carrying(&self) -> bool {
        self.carrying
    }

    /// Where the gold sits, if this world has any.
    pub fn gold(&self) -> Option<Coord> {
        self.gold
    }

    /// Whether the agent is standing on the gold tile.
    pub fn gold_reached(&self) -> bool {
        self.gold == Some(self.agent)
    }

    /// Total blocks stacked anywhere on the grid. Pickups and drops move
    /// blocks around but never change this sum while nothing is in hand.
    pub fn total_stacked(&self) -> i32 {
        self.cells.iter().map(|c| c.stack).sum()
    }

    /// What the agent's sensor reads this turn: its own cell plus the four
    /// orthogonal neighbors.
    pub fn sense(&self) -> Surroundings {
        Surroundings {
            here: self.tile(self.agent),
            left: self.tile(Direction::Left.step(self.agent)),
            right: self.tile(Direction::Right.step(self.agent)),
            up: self.tile(Direction::Up.step(self.agent)),
            down: self.tile(Direction::Down.step(self.agent)),
        }
    }

    /// Execute one action. Returns false when the world refuses it: a move
    /// into a wall or over a ledge, a pickup with nothing to take or full
    /// hands, a drop with empty hands or onto wall or gold.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Pickup => {
                if self.carrying {
                    return false;
                }
                let idx = self.idx(self.agent);
                if self.cells[idx].stack == 0 {
                    return false;
                }
                self.cells[idx].stack -= 1;
                self.carrying = true;
                true
            }
            Action::Drop => {
                if !self.carrying {
                    return false;
                }
                let idx = self.idx(self.agent);
                let base = self.cells[idx].base;
                if base.is_wall() || base.is_gold() {
                    return false;
                }
                self.cells[idx].stack += 1;
                self.carrying = false;
                true
            }
            _ => {
                let dir = match action.direction() {
                    Some(d) => d,
                    None => return false,
                };
                let dest = dir.step(self.agent);
                let here = self.tile(self.agent);
                let there = self.tile(dest);
                if there.kind.is_wall() || (here.level - there.level).abs() > 1 {
                    return false;
                }
                self.agent = dest;
                true
            }
        }
    }
}

/// A square window of world truth around a cell, annotated with what the
/// agent knows. Built by the session for rendering and state reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub center: Coord,
    pub radius: i32,
    /// Row-major, (2 * radius + 1) squared cells.
    pub cells: Vec<ViewCell>,
}

/// One cell of a view window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewCell {
    pub tile: Tile,
    /// The agent has sensed this cell.
    pub known: bool,
    /// The agent has stood on this cell.
    pub visited: bool,
    /// The agent is here now.
    pub agent: bool,
}

impl WorldView {
    /// Side length of the square window.
    pub fn size(&self) -> usize {
        (self.radius * 2 + 1) as usize
    }

    /// Cell by window row and column, top-left origin.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ViewCell> {
        if row >= self.size() || col >= self.size() {
            return None;
        }
        self.cells.get(row * self.size() + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_parses_glyphs() {
        let world = World::from_rows(
            &[
                "#####",
                "#@o.#",
                "#.$.#",
                "#####",
            ],
            8,
        );
        assert_eq!(world.agent(), (1, 1));
        assert_eq!(world.tile((1, 2)).kind, TileKind::Block);
        assert_eq!(world.tile((1, 2)).level, 1);
        assert_eq!(world.tile((2, 2)).kind, TileKind::Gold);
        assert_eq!(world.tile((2, 2)).level, 8);
        assert_eq!(world.gold(), Some((2, 2)));
        assert!(world.tile((0, 0)).kind.is_wall());
        assert_eq!(world.total_stacked(), 1);
    }

    #[test]
    fn test_sense_reads_the_neighborhood() {
        let world = World::from_rows(
            &[
                "#####",
                "#.o.#",
                "#.@$#",
                "#####",
            ],
            8,
        );
        let reading = world.sense();
        assert_eq!(reading.here, Tile::flat(TileKind::Empty));
        assert_eq!(reading.up, Tile::new(TileKind::Block, 1));
        assert_eq!(reading.right, Tile::new(TileKind::Gold, 8));
        assert!(reading.down.kind.is_wall());
        assert_eq!(reading.left, Tile::flat(TileKind::Empty));
    }

    #[test]
    fn test_edges_sense_as_walls() {
        let mut world = World::new(3, 3);
        world.place_agent((1, 1));
        assert_eq!(world.tile((-1, 0)), Tile::flat(TileKind::Wall));
        assert_eq!(world.tile((0, 99)), Tile::flat(TileKind::Wall));
    }

    #[test]
    fn test_movement_respects_walls_and_ledges() {
        let mut world = World::from_rows(
            &[
                "######",
                "#@13.#",
                "######",
            ],
            8,
        );
        assert!(!world.apply(Action::MoveUp));
        assert_eq!(world.agent(), (1, 1));

        // One level up is fine, two is a ledge.
        assert!(world.apply(Action::MoveRight));
        assert_eq!(world.agent(), (1, 2));
        assert!(!world.apply(Action::MoveRight));
        assert_eq!(world.agent(), (1, 2));
    }

    #[test]
    fn test_pickup_and_drop_move_blocks_around() {
        let mut world = World::from_rows(
            &[
                "#####",
                "#.@o#",
                "#####",
            ],
            8,
        );

        // Nothing to pick up on bare ground.
        assert!(!world.apply(Action::Pickup));

        assert!(world.apply(Action::MoveRight));
        assert!(world.apply(Action::Pickup));
        assert!(world.carrying());
        assert_eq!(world.tile((1, 3)), Tile::flat(TileKind::Empty));

        // Hands are full.
        assert!(!world.apply(Action::Pickup));

        assert!(world.apply(Action::MoveLeft));
        assert!(world.apply(Action::Drop));
        assert!(!world.carrying());
        assert_eq!(world.tile((1, 2)), Tile::new(TileKind::Block, 1));

        // Hands are empty again.
        assert!(!world.apply(Action::Drop));
        assert_eq!(world.total_stacked(), 1);
    }

    #[test]
    fn test_drop_refused_on_gold_and_walls() {
        let mut world = World::from_rows(
            &[
                "#####",
                "#@o$#",
                "#####",
            ],
            0,
        );
        world.place_agent((1, 2));
        assert!(world.apply(Action::Pickup));
        // Gold is at level 0 here so the agent can step on it.
        assert!(world.apply(Action::MoveRight));
        assert!(world.gold_reached());
        assert!(!world.apply(Action::Drop));
        assert!(world.carrying());

        // Same refusal on wall terrain.
        world.place_agent((0, 0));
        assert!(!world.apply(Action::Drop));
        assert!(world.carrying());
    }

    #[test]
    fn test_stacked_cells_sense_as_blocks_at_height() {
        let mut world = World::new(5, 5);
        world.add_blocks((2, 2), 3);
        assert_eq!(world.tile((2, 2)), Tile::new(TileKind::Block, 3));
        world.place_agent((2, 2));
        assert!(world.apply(Action::Pickup));
        assert_eq!(world.tile((2, 2)), Tile::new(TileKind::Block, 2));
    }
}
