//! Staircase geometry and the construction plan
//!
//! The gold sits on a column too tall to step onto, so the agent raises a
//! spiral staircase on six of the eight cells around it: east, southeast,
//! south, southwest, west, northwest. Construction seeds every ring cell
//! with one block, then repeated climb passes drop the last ring cell and
//! add one block to each survivor. The pass lengths 6, 5, 4, 3, 2, 1 leave
//! the columns one level apart, ending highest next to the gold.

use crate::action::Direction;
use crate::map::{Coord, TileMap};
use crate::tile::TileKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of staircase cells around the gold.
pub const RING_CELLS: usize = 6;

/// The six staircase cells around a gold tile, in construction order:
/// east first, then clockwise round the south side to northwest. The two
/// northern neighbors stay open as the approach.
pub fn ring_around(gold: Coord) -> [Coord; RING_CELLS] {
    let (r, c) = gold;
    [
        (r, c + 1),
        (r + 1, c + 1),
        (r + 1, c),
        (r + 1, c - 1),
        (r, c - 1),
        (r - 1, c - 1),
    ]
}

/// Six-step walk around a gold tile sighted in the given direction. The
/// walk hugs the column's perimeter, which puts all eight surrounding
/// cells within sensor range and maps the whole ring in one trip.
pub fn detour_moves(sighted: Direction) -> [Direction; RING_CELLS] {
    match sighted {
        Direction::Left => [
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Down,
            Direction::Down,
            Direction::Right,
        ],
        Direction::Right => [
            Direction::Down,
            Direction::Right,
            Direction::Right,
            Direction::Up,
            Direction::Up,
            Direction::Left,
        ],
        Direction::Up => [
            Direction::Right,
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Down,
        ],
        Direction::Down => [
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Up,
        ],
    }
}

/// The staircase under construction: where the gold is, which ring cells
/// still need work, and which cells gathering must never touch.
///
/// `ring` shrinks from the tail as climb passes complete; `pending` holds
/// the targets of the current pass and refills from `ring`. The exclusion
/// zone is fixed at creation so placed blocks stay off-limits to gathering
/// for the rest of the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StairPlan {
    gold: Coord,
    exclusion: [Coord; RING_CELLS],
    ring: Vec<Coord>,
    pending: VecDeque<Coord>,
}

impl StairPlan {
    /// Plan a staircase around a gold tile.
    pub fn new(gold: Coord) -> StairPlan {
        let cells = ring_around(gold);
        StairPlan {
            gold,
            exclusion: cells,
            ring: cells.to_vec(),
            pending: cells.iter().copied().collect(),
        }
    }

    /// The gold coordinate this plan surrounds.
    pub fn gold(&self) -> Coord {
        self.gold
    }

    /// Whether a cell belongs to the staircase and is off-limits to
    /// block gathering.
    pub fn in_exclusion_zone(&self, at: Coord) -> bool {
        self.exclusion.contains(&at)
    }

    /// Next cell needing its first block. Ring cells already holding a
    /// block are consumed and skipped, so pre-existing blocks count as
    /// finished work.
    pub fn next_build_target(&mut self, map: &TileMap) -> Option<Coord> {
        while let Some(target) = self.pending.pop_front() {
            if map.kind(target) != Some(TileKind::Block) {
                return Some(target);
            }
        }
        None
    }

    /// Next cell of the current climb pass.
    pub fn next_climb_target(&mut self) -> Option<Coord> {
        self.pending.pop_front()
    }

    /// Whether the current pass has handed out all its targets.
    pub fn pass_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Retire the last ring cell and reload `pending` with the surviving
    /// cells for the next pass. Returns false once the ring is exhausted,
    /// which is the signal that the staircase is climbable.
    pub fn start_next_pass(&mut self) -> bool {
        self.ring.pop();
        if self.ring.is_empty() {
            return false;
        }
        self.pending = self.ring.iter().copied().collect();
        true
    }

    /// Cells remaining in the shrinking ring.
    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }
}
