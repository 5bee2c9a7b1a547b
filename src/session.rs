//! Session management: one agent bound to one world, stepped turn by turn
//!
//! The session owns the frame translation. The agent dead-reckons from
//! wherever it spawned, so agent coordinates are spawn-relative while the
//! world's are absolute. Everything reported outward is in world
//! coordinates.

use crate::action::Action;
use crate::agent::{Phase, Stacker};
use crate::config::SessionConfig;
use crate::map::Coord;
use crate::world::{ViewCell, World, WorldView};
use crate::worldgen::WorldGenerator;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Reason a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoneReason {
    /// The agent is standing on the gold.
    GoldReached,
    /// The turn limit ran out first.
    MaxTurns,
    /// The agent returned no action, so no further turn can change anything.
    Stalled,
}

/// Snapshot of session progress after a step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// Turns taken so far.
    pub turn: u64,
    /// Agent position in world coordinates.
    pub position: Coord,
    /// Whether a block is in hand.
    pub carrying: bool,
    /// Current phase of the hunt.
    pub phase: Phase,
    /// Whether the gold has been sighted.
    pub gold_located: bool,
    /// Cells the agent has sensed.
    pub tiles_known: usize,
    /// Cells the agent has stood on.
    pub cells_visited: usize,
    /// Truth window around the agent, annotated with what it knows.
    pub view: WorldView,
}

/// Result of a single turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepResult {
    /// State after the turn.
    pub state: SessionState,
    /// What the agent chose, if anything.
    pub action: Option<Action>,
    /// Whether the world accepted the action.
    pub applied: bool,
    /// Whether the session is over.
    pub done: bool,
    /// Why it ended, when done.
    pub done_reason: Option<DoneReason>,
    /// Notable happenings this turn.
    #[serde(default)]
    pub events: Vec<String>,
}

/// A running game: world, agent, and the turn counter between them.
pub struct Session {
    /// Session configuration.
    pub config: SessionConfig,
    world: World,
    agent: Stacker,
    seed: u64,
    spawn: Coord,
    turn: u64,
}

impl Session {
    /// Create a session on a freshly generated world. A configured seed is
    /// honored; otherwise one is drawn and kept for reproducibility.
    pub fn new(config: SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::with_seed(config, seed)
    }

    /// Create a session on the world a specific seed generates.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        let world = WorldGenerator::new(config.clone(), seed).generate();
        Self::from_world(config, world, seed)
    }

    /// Run the agent on a handcrafted world. The agent's frame origin is
    /// wherever the world put it.
    pub fn from_world(config: SessionConfig, world: World, seed: u64) -> Self {
        let spawn = world.agent();
        Self {
            config,
            world,
            agent: Stacker::new(),
            seed,
            spawn,
            turn: 0,
        }
    }

    /// Start over on a fresh world and a fresh agent. With a configured
    /// seed this replays the same world; without one a new seed is drawn.
    pub fn reset(&mut self) {
        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        *self = Self::with_seed(self.config.clone(), seed);
    }

    /// Advance one turn: sense, let the agent decide, execute its action.
    pub fn step(&mut self) -> StepResult {
        self.turn += 1;
        let mut events = Vec::new();

        let sensed = self.world.sense();
        let phase_before = self.agent.phase();
        let located_before = self.agent.gold_located();

        let action = self.agent.turn(&sensed);

        if !located_before && self.agent.gold_located() {
            if let Some(gold) = self.agent.gold() {
                let at = self.to_world(gold);
                events.push(format!("gold sighted at ({}, {})", at.0, at.1));
            }
        }
        if self.agent.phase() != phase_before {
            events.push(format!(
                "phase {:?} -> {:?}",
                phase_before,
                self.agent.phase()
            ));
        }

        let applied = match action {
            Some(action) => {
                let ok = self.world.apply(action);
                if ok {
                    let at = self.world.agent();
                    match action {
                        Action::Pickup => {
                            events.push(format!("picked up a block at ({}, {})", at.0, at.1))
                        }
                        Action::Drop => events.push(format!(
                            "placed a block at ({}, {}), now {} high",
                            at.0,
                            at.1,
                            self.world.tile(at).level
                        )),
                        _ => {}
                    }
                } else {
                    events.push(format!("world refused {}", action.token()));
                }
                ok
            }
            None => {
                events.push("agent is out of moves".to_string());
                false
            }
        };

        let (done, done_reason) = self.check_done(action.is_none());
        if let Some(reason) = done_reason {
            events.push(format!("session over: {reason:?}"));
        }

        StepResult {
            state: self.get_state(),
            action,
            applied,
            done,
            done_reason,
            events,
        }
    }

    /// The current session state without advancing a turn.
    pub fn get_state(&self) -> SessionState {
        SessionState {
            turn: self.turn,
            position: self.world.agent(),
            carrying: self.world.carrying(),
            phase: self.agent.phase(),
            gold_located: self.agent.gold_located(),
            tiles_known: self.agent.map().len(),
            cells_visited: self.agent.visited_count(),
            view: self.build_view(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn agent(&self) -> &Stacker {
        &self.agent
    }

    /// The seed this session's world was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Where the agent started, in world coordinates.
    pub fn spawn(&self) -> Coord {
        self.spawn
    }

    fn to_world(&self, at: Coord) -> Coord {
        (self.spawn.0 + at.0, self.spawn.1 + at.1)
    }

    fn to_frame(&self, at: Coord) -> Coord {
        (at.0 - self.spawn.0, at.1 - self.spawn.1)
    }

    /// GoldReached wins over Stalled wins over MaxTurns: a final step that
    /// both reaches the gold and exhausts the clock reports the gold.
    fn check_done(&self, stalled: bool) -> (bool, Option<DoneReason>) {
        if self.world.gold_reached() {
            return (true, Some(DoneReason::GoldReached));
        }
        if stalled {
            return (true, Some(DoneReason::Stalled));
        }
        if let Some(max_turns) = self.config.max_turns {
            if self.turn >= max_turns as u64 {
                return (true, Some(DoneReason::MaxTurns));
            }
        }
        (false, None)
    }

    /// Truth window around the agent, each cell annotated with whether the
    /// agent has sensed or stood on it.
    fn build_view(&self) -> WorldView {
        let center = self.world.agent();
        let radius = self.config.view_radius as i32;
        let side = (radius * 2 + 1) as usize;
        let mut cells = Vec::with_capacity(side * side);
        for r in (center.0 - radius)..=(center.0 + radius) {
            for c in (center.1 - radius)..=(center.1 + radius) {
                let at = (r, c);
                let frame = self.to_frame(at);
                cells.push(ViewCell {
                    tile: self.world.tile(at),
                    known: self.agent.map().get(frame).is_some(),
                    visited: self.agent.has_visited(frame),
                    agent: at == center,
                });
            }
        }
        WorldView {
            center,
            radius,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileKind;

    #[test]
    fn test_first_step_reports_progress() {
        let mut session = Session::with_seed(SessionConfig::quick(), 5);
        let result = session.step();

        assert_eq!(result.state.turn, 1);
        assert!(result.action.is_some());
        assert!(result.applied);
        assert_eq!(result.state.tiles_known, 5);
        assert_eq!(result.state.cells_visited, 1);
        assert!(!result.done);
    }

    #[test]
    fn test_seeded_sessions_share_a_world() {
        let a = Session::with_seed(SessionConfig::quick(), 7);
        let b = Session::with_seed(SessionConfig::quick(), 7);
        assert_eq!(a.world(), b.world());
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_boxed_in_world_stalls() {
        let world = World::from_rows(
            &[
                "#####",
                "#...#",
                "#.@.#",
                "#...#",
                "#####",
            ],
            8,
        );
        let mut session = Session::from_world(SessionConfig::default(), world, 0);

        let mut last = None;
        while session.turn() < 100 {
            let result = session.step();
            let done = result.done;
            last = Some(result);
            if done {
                break;
            }
        }
        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(last.done_reason, Some(DoneReason::Stalled));
        assert_eq!(last.state.cells_visited, 9);
    }

    #[test]
    fn test_turn_limit_ends_the_session() {
        let config = SessionConfig {
            max_turns: Some(3),
            ..SessionConfig::quick()
        };
        let mut session = Session::with_seed(config, 5);

        assert!(!session.step().done);
        assert!(!session.step().done);
        let third = session.step();
        assert!(third.done);
        assert_eq!(third.done_reason, Some(DoneReason::MaxTurns));
    }

    #[test]
    fn test_view_distinguishes_truth_from_knowledge() {
        let world = World::from_rows(
            &[
                "#####",
                "#.@.#",
                "#####",
            ],
            8,
        );
        let config = SessionConfig {
            view_radius: 1,
            ..SessionConfig::default()
        };
        let mut session = Session::from_world(config, world, 0);

        // First step explores left, so the window centers on (1, 1).
        let result = session.step();
        assert_eq!(result.action, Some(Action::MoveLeft));
        let view = result.state.view;
        assert_eq!(view.size(), 3);
        assert_eq!(view.center, (1, 1));

        let here = view.cell(1, 1).unwrap();
        assert!(here.agent);
        assert!(here.known);
        // Stood-on marks lag one turn behind movement.
        assert!(!here.visited);

        let spawn = view.cell(1, 2).unwrap();
        assert!(spawn.known);
        assert!(spawn.visited);
        assert!(!spawn.agent);

        // The wall above the spawn was sensed; the corner beyond never was.
        assert!(view.cell(0, 2).unwrap().known);
        let corner = view.cell(0, 0).unwrap();
        assert!(!corner.known);
        assert_eq!(corner.tile.kind, TileKind::Wall);
    }

    #[test]
    fn test_reset_replays_a_configured_seed() {
        let config = SessionConfig {
            seed: Some(13),
            ..SessionConfig::quick()
        };
        let mut session = Session::new(config);
        let fresh = session.world().clone();

        for _ in 0..5 {
            session.step();
        }
        session.reset();

        assert_eq!(session.turn(), 0);
        assert_eq!(session.world(), &fresh);
    }

    #[test]
    fn test_gold_sighting_lands_in_the_events() {
        let world = World::from_rows(
            &[
                "#######",
                "#..@$.#",
                "#######",
            ],
            8,
        );
        let mut session = Session::from_world(SessionConfig::default(), world, 0);

        let result = session.step();
        assert!(result
            .events
            .iter()
            .any(|e| e.contains("gold sighted at (1, 4)")));
        assert_eq!(result.state.phase, Phase::StaircaseBuilding);
        assert!(result.state.gold_located);
    }
}
