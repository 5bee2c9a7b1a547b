//! The per-turn decision engine
//!
//! One call to [`Stacker::turn`] consumes one sensor reading and emits at
//! most one action. Planning works through a queue: whichever planner runs
//! first on an empty queue fills it with a full trip (a path plus a trailing
//! pickup or drop), and later turns just drain it. Replanning happens only
//! at trip boundaries, with a single exception - sighting the gold discards
//! whatever was queued and starts the perimeter detour at once.

use crate::action::{Action, Direction};
use crate::map::{Coord, TileMap};
use crate::pathfind::{nearest_matching, shortest_path};
use crate::stairs::{detour_moves, StairPlan};
use crate::tile::{Surroundings, TileKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Stage of the hunt for the gold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No gold sighted yet; walking toward the nearest unvisited cell.
    #[default]
    Exploring,
    /// Gold located; seeding each ring cell with its first block.
    StaircaseBuilding,
    /// Ring seeded; raising it pass by pass into a climbable spiral.
    FinalClimb,
    /// Stair complete; placing the last block and stepping onto the gold.
    Retrieving,
}

/// The planning agent. Owns everything it knows about the world and
/// decides one action per turn.
///
/// Position is dead-reckoned in the agent's own frame: wherever it wakes up
/// is (0, 0) and every movement action offsets it. The hosting world is
/// expected to execute each returned action verbatim; the agent never
/// second-guesses whether a move succeeded.
#[derive(Clone, Debug)]
pub struct Stacker {
    map: TileMap,
    visited: HashSet<Coord>,
    queue: VecDeque<Action>,
    position: Coord,
    carrying: bool,
    phase: Phase,
    plan: Option<StairPlan>,
}

impl Stacker {
    pub fn new() -> Stacker {
        Stacker {
            map: TileMap::new(),
            visited: HashSet::new(),
            queue: VecDeque::new(),
            position: (0, 0),
            carrying: false,
            phase: Phase::Exploring,
            plan: None,
        }
    }

    /// Take one turn: fold the reading into the map, replan if the current
    /// trip is finished, and emit the next queued action. Returns `None`
    /// only when every planner comes up empty, which on a finite world
    /// means there is nothing left to try.
    pub fn turn(&mut self, sensed: &Surroundings) -> Option<Action> {
        self.observe(sensed);

        if self.phase == Phase::Exploring {
            self.sight_gold(sensed);
        }
        if self.phase == Phase::Exploring && self.queue.is_empty() {
            self.plan_exploration();
        }
        if self.phase == Phase::StaircaseBuilding && self.carrying {
            self.plan_construction();
        }
        if self.phase != Phase::Exploring && !self.carrying && self.queue.is_empty() {
            self.plan_gathering();
        }
        if self.phase == Phase::FinalClimb && self.carrying {
            self.plan_climb();
        }
        if self.phase == Phase::Retrieving && self.carrying && self.queue.is_empty() {
            self.plan_final_approach();
        }

        self.advance()
    }

    /// Fold the reading into the map and mark the current cell visited.
    fn observe(&mut self, sensed: &Surroundings) {
        self.visited.insert(self.position);
        self.map.integrate(self.position, sensed);
    }

    /// Scan the fresh neighbor readings for gold. A sighting locks in the
    /// staircase plan and replaces the whole queue with the perimeter
    /// detour, abandoning whatever exploration trip was underway.
    fn sight_gold(&mut self, sensed: &Surroundings) {
        for dir in Direction::ALL {
            if sensed.neighbor(dir).kind == TileKind::Gold {
                self.plan = Some(StairPlan::new(dir.step(self.position)));
                self.queue.clear();
                self.queue
                    .extend(detour_moves(dir).into_iter().map(Action::from));
                self.phase = Phase::StaircaseBuilding;
                return;
            }
        }
    }

    /// Head for the nearest cell never stood on.
    fn plan_exploration(&mut self) {
        let target = nearest_matching(&self.map, self.position, |c| !self.visited.contains(&c));
        if let Some(target) = target {
            let path = shortest_path(&self.map, self.position, target);
            self.queue.extend(path);
        }
    }

    /// One construction trip: walk to the next unseeded ring cell and drop
    /// the carried block there. Once every ring cell is handled the climb
    /// begins the same turn.
    fn plan_construction(&mut self) {
        let plan = match self.plan.as_mut() {
            Some(p) => p,
            None => return,
        };
        if self.queue.is_empty() {
            if let Some(target) = plan.next_build_target(&self.map) {
                let path = shortest_path(&self.map, self.position, target);
                self.queue.extend(path);
                self.queue.push_back(Action::Drop);
            }
        }
        if plan.pass_done() {
            self.phase = Phase::FinalClimb;
        }
    }

    /// Fetch material: nearest untouched block versus pushing exploration
    /// further, whichever path is shorter. Ties keep exploring, since a new
    /// region may reveal closer blocks.
    fn plan_gathering(&mut self) {
        let plan = match self.plan.as_ref() {
            Some(p) => p,
            None => return,
        };
        let block = nearest_matching(&self.map, self.position, |c| {
            self.map.kind(c) == Some(TileKind::Block) && !plan.in_exclusion_zone(c)
        });
        let unvisited = nearest_matching(&self.map, self.position, |c| !self.visited.contains(&c));

        let block_path = match block {
            Some(b) => shortest_path(&self.map, self.position, b),
            None => Vec::new(),
        };
        let unvisited_path = match unvisited {
            Some(u) => shortest_path(&self.map, self.position, u),
            None => Vec::new(),
        };

        match (block, unvisited) {
            (None, None) => {}
            (None, Some(_)) => self.queue.extend(unvisited_path),
            (Some(_), None) => {
                self.queue.extend(block_path);
                self.queue.push_back(Action::Pickup);
            }
            (Some(_), Some(_)) => {
                if block_path.len() < unvisited_path.len() {
                    self.queue.extend(block_path);
                    self.queue.push_back(Action::Pickup);
                } else {
                    self.queue.extend(unvisited_path);
                }
            }
        }
    }

    /// Climb-pass bookkeeping plus one drop trip. The pass refill is not
    /// gated on the queue: the working set can empty while the last trip of
    /// a pass is still walking, and the ring must shrink exactly once per
    /// pass regardless. An exhausted ring ends the climb the same turn.
    fn plan_climb(&mut self) {
        let plan = match self.plan.as_mut() {
            Some(p) => p,
            None => return,
        };
        if plan.pass_done() && !plan.start_next_pass() {
            self.phase = Phase::Retrieving;
            return;
        }
        if self.queue.is_empty() {
            if let Some(target) = plan.next_climb_target() {
                let path = shortest_path(&self.map, self.position, target);
                self.queue.extend(path);
                self.queue.push_back(Action::Drop);
            }
        }
    }

    /// The last trip: top off the column east of the gold, then step left
    /// onto the gold itself.
    fn plan_final_approach(&mut self) {
        let plan = match self.plan.as_ref() {
            Some(p) => p,
            None => return,
        };
        let target = Direction::Right.step(plan.gold());
        let path = shortest_path(&self.map, self.position, target);
        self.queue.extend(path);
        self.queue.push_back(Action::Drop);
        self.queue.push_back(Action::MoveLeft);
    }

    /// Pop the next queued action and apply its bookkeeping: movement
    /// updates the dead-reckoned position, pickup and drop flip the
    /// carrying flag.
    fn advance(&mut self) -> Option<Action> {
        let action = self.queue.pop_front()?;
        match action {
            Action::Pickup => self.carrying = true,
            Action::Drop => self.carrying = false,
            _ => {
                if let Some(dir) = action.direction() {
                    self.position = dir.step(self.position);
                }
            }
        }
        Some(action)
    }

    // ===== Introspection =====

    /// Current dead-reckoned position in the agent's own frame.
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Whether a block is in hand.
    pub fn carrying(&self) -> bool {
        self.carrying
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the gold has been sighted yet.
    pub fn gold_located(&self) -> bool {
        self.plan.is_some()
    }

    /// The gold coordinate in the agent's frame, once sighted.
    pub fn gold(&self) -> Option<Coord> {
        self.plan.as_ref().map(|p| p.gold())
    }

    /// Everything sensed so far.
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Whether the agent has ever stood on the cell.
    pub fn has_visited(&self, at: Coord) -> bool {
        self.visited.contains(&at)
    }

    /// Number of distinct cells stood on.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Actions still queued from the current trip.
    pub fn pending_moves(&self) -> usize {
        self.queue.len()
    }
}

impl Default for Stacker {
    fn default() -> Self {
        Self::new()
    }
}
