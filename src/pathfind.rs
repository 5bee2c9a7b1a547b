//! Breadth-first planning over the known map
//!
//! Two searches drive the agent: an exact shortest path to a chosen cell,
//! and a frontier search for the nearest cell satisfying a predicate. Both
//! expand strictly through traversable steps of the partial map, so unknown
//! territory is never planned through, and both scan neighbors in
//! `Direction::ALL` order so results are deterministic.

use crate::action::{Action, Direction};
use crate::map::{Coord, TileMap};
use std::collections::{HashMap, HashSet, VecDeque};

/// Shortest move sequence from `from` to `to` through known, traversable
/// cells. Returns an empty sequence when `to` is unreachable or equal to
/// `from` - callers treat both as "nothing to do this turn".
pub fn shortest_path(map: &TileMap, from: Coord, to: Coord) -> Vec<Action> {
    if from == to {
        return Vec::new();
    }

    let mut frontier = VecDeque::new();
    let mut seen = HashSet::new();
    let mut came_from: HashMap<Coord, (Coord, Direction)> = HashMap::new();

    frontier.push_back(from);
    seen.insert(from);

    while let Some(cur) = frontier.pop_front() {
        if cur == to {
            // Walk the parent chain back to the start; the start itself has
            // no entry, which terminates the loop.
            let mut path = Vec::new();
            let mut at = cur;
            while let Some(&(prev, dir)) = came_from.get(&at) {
                path.push(Action::from(dir));
                at = prev;
            }
            path.reverse();
            return path;
        }
        for dir in Direction::ALL {
            let next = dir.step(cur);
            if !seen.contains(&next) && map.traversable(cur, next) {
                seen.insert(next);
                came_from.insert(next, (cur, dir));
                frontier.push_back(next);
            }
        }
    }

    Vec::new()
}

/// Nearest reachable cell satisfying the predicate, by hop count. The start
/// cell is tested too, so standing on a match returns it at distance zero.
/// Returns `None` when no reachable cell matches.
pub fn nearest_matching(
    map: &TileMap,
    from: Coord,
    mut matches: impl FnMut(Coord) -> bool,
) -> Option<Coord> {
    let mut frontier = VecDeque::new();
    let mut seen = HashSet::new();

    frontier.push_back(from);
    seen.insert(from);

    while let Some(cur) = frontier.pop_front() {
        if matches(cur) {
            return Some(cur);
        }
        for dir in Direction::ALL {
            let next = dir.step(cur);
            if !seen.contains(&next) && map.traversable(cur, next) {
                seen.insert(next);
                frontier.push_back(next);
            }
        }
    }

    None
}
