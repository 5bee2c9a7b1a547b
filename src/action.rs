//! Agent actions - four moves plus the two carry actions

use crate::map::Coord;
use serde::{Deserialize, Serialize};

/// The four compass directions of the grid.
///
/// Rows grow downward and columns rightward, so `Up` is row minus one.
/// `ALL` fixes the enumeration order used by every deterministic scan in
/// the crate: breadth-first expansion, neighbor sweeps, tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Fixed scan order for all direction iteration.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit (row, col) offset of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }

    /// Coordinate one step away from `from`.
    pub fn step(self, from: Coord) -> Coord {
        let (dr, dc) = self.offset();
        (from.0 + dr, from.1 + dc)
    }

    /// Direction that leads from one cell to an adjacent one, if any.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        match (to.0 - from.0, to.1 - from.1) {
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Up),
            (1, 0) => Some(Direction::Down),
            _ => None,
        }
    }

}

/// One action per turn: step in a direction, or pick up / drop a block on
/// the current cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Step one column left
    MoveLeft = 0,
    /// Step one column right
    MoveRight = 1,
    /// Step one row up
    MoveUp = 2,
    /// Step one row down
    MoveDown = 3,
    /// Lift the block off the current cell
    Pickup = 4,
    /// Place the carried block on the current cell
    Drop = 5,
}

impl Action {
    /// The direction of a movement action, if it is one.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::Pickup | Action::Drop => None,
        }
    }

    /// Get the movement delta for this action, if it's a movement action
    pub fn movement_delta(&self) -> Option<(i32, i32)> {
        self.direction().map(Direction::offset)
    }

    /// Check if this is a movement action
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown
        )
    }

    /// Check if this action changes the carrying state
    pub fn is_carry(&self) -> bool {
        matches!(self, Action::Pickup | Action::Drop)
    }

    /// Convert from action index (0-5) to Action
    pub fn from_index(index: u8) -> Option<Action> {
        match index {
            0 => Some(Action::MoveLeft),
            1 => Some(Action::MoveRight),
            2 => Some(Action::MoveUp),
            3 => Some(Action::MoveDown),
            4 => Some(Action::Pickup),
            5 => Some(Action::Drop),
            _ => None,
        }
    }

    /// Get all available actions
    pub fn all() -> [Action; 6] {
        [
            Action::MoveLeft,
            Action::MoveRight,
            Action::MoveUp,
            Action::MoveDown,
            Action::Pickup,
            Action::Drop,
        ]
    }

    /// Wire token used by harnesses and logs.
    pub fn token(&self) -> &'static str {
        match self {
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::MoveUp => "up",
            Action::MoveDown => "down",
            Action::Pickup => "pickup",
            Action::Drop => "drop",
        }
    }

    /// Parse a wire token (long or single-letter form).
    pub fn from_token(token: &str) -> Option<Action> {
        match token {
            "l" | "left" => Some(Action::MoveLeft),
            "r" | "right" => Some(Action::MoveRight),
            "u" | "up" => Some(Action::MoveUp),
            "d" | "down" => Some(Action::MoveDown),
            "p" | "pickup" => Some(Action::Pickup),
            "x" | "drop" => Some(Action::Drop),
            _ => None,
        }
    }
}

impl From<Direction> for Action {
    fn from(dir: Direction) -> Action {
        match dir {
            Direction::Left => Action::MoveLeft,
            Direction::Right => Action::MoveRight,
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Action::from_index(value).ok_or(())
    }
}
