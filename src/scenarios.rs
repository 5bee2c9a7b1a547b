//! End-to-end runs on handcrafted and generated worlds
//!
//! These tests drive whole sessions to completion and check the terrain the
//! agent leaves behind, not just its bookkeeping. The staircase geometry is
//! fixed, so a finished run has exactly one right answer.

#[cfg(test)]
mod tests {
    use crate::agent::Phase;
    use crate::config::SessionConfig;
    use crate::session::{DoneReason, Session, StepResult};
    use crate::tile::{Tile, TileKind};
    use crate::world::World;

    fn run_to_done(session: &mut Session) -> StepResult {
        loop {
            let result = session.step();
            if result.done {
                return result;
            }
        }
    }

    /// A flat field with ample loose blocks. The agent must find the gold,
    /// quarry 22 blocks, and leave a finished spiral behind: column heights
    /// descending 7, 5, 4, 3, 2, 1 clockwise from the east.
    #[test]
    fn test_flat_world_run_stacks_up_to_the_gold() {
        let world = World::from_rows(
            &[
                "#############",
                "#.o.o.o.o.o.#",
                "#o.o.o.o.o.o#",
                "#...........#",
                "#..o......o.#",
                "#....@$.....#",
                "#...........#",
                "#...........#",
                "#o.o.o.o.o.o#",
                "#.o.o.o.o.o.#",
                "#############",
            ],
            8,
        );
        assert_eq!(world.total_stacked(), 24);

        let config = SessionConfig {
            max_turns: Some(2500),
            ..SessionConfig::default()
        };
        let mut session = Session::from_world(config, world, 0);
        let result = run_to_done(&mut session);

        assert_eq!(result.done_reason, Some(DoneReason::GoldReached));
        assert_eq!(result.state.phase, Phase::Retrieving);
        assert_eq!(session.world().agent(), (5, 6));

        // The spiral around the gold, east then clockwise to northwest.
        let stair = [
            ((5, 7), 7),
            ((6, 7), 5),
            ((6, 6), 4),
            ((6, 5), 3),
            ((5, 5), 2),
            ((4, 5), 1),
        ];
        for (at, height) in stair {
            assert_eq!(
                session.world().tile(at),
                Tile::new(TileKind::Block, height),
                "stair column at {at:?}"
            );
        }

        // 22 blocks in the stair, 2 left on the field, none in hand.
        assert_eq!(session.world().total_stacked(), 24);
        assert!(!session.world().carrying());
    }

    #[test]
    fn test_fixed_seed_runs_are_reproducible() {
        let mut a = Session::with_seed(SessionConfig::quick(), 42);
        let mut b = Session::with_seed(SessionConfig::quick(), 42);

        loop {
            let ra = a.step();
            let rb = b.step();
            assert_eq!(ra.action, rb.action, "diverged at turn {}", ra.state.turn);
            assert_eq!(ra.state.position, rb.state.position);
            assert_eq!(ra.done, rb.done);
            if ra.done {
                assert_eq!(ra.done_reason, rb.done_reason);
                break;
            }
        }
    }

    /// Blocks sitting on ring cells are reserved for the staircase and the
    /// planner refuses to quarry them. With no other material on the board
    /// the hunt runs out of moves once everything is explored.
    #[test]
    fn test_ring_blocks_are_never_quarried() {
        let world = World::from_rows(
            &[
                "#########",
                "#.......#",
                "#.......#",
                "#...@...#",
                "#...$o..#",
                "#..ooo..#",
                "#########",
            ],
            8,
        );
        let config = SessionConfig {
            max_turns: Some(2000),
            ..SessionConfig::default()
        };
        let mut session = Session::from_world(config, world, 0);

        let result = loop {
            let result = session.step();
            assert!(!result.state.carrying, "quarried a reserved block");
            if result.done {
                break result;
            }
        };

        assert_eq!(result.done_reason, Some(DoneReason::Stalled));
        assert_eq!(result.state.phase, Phase::StaircaseBuilding);

        // The reserved blocks never moved.
        for at in [(4, 5), (5, 3), (5, 4), (5, 5)] {
            assert_eq!(session.world().tile(at), Tile::new(TileKind::Block, 1));
        }
        assert_eq!(session.world().total_stacked(), 4);
    }

    #[test]
    fn test_generated_world_run_reaches_the_gold() {
        let mut session = Session::with_seed(SessionConfig::quick(), 3);
        let result = run_to_done(&mut session);

        assert_eq!(result.done_reason, Some(DoneReason::GoldReached));
        assert!(session.world().gold_reached());
        assert!(result.state.gold_located);
    }
}
