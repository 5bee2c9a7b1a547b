//! Deterministic world generation
//!
//! A seed fixes everything: ChaCha8 drives placement choices and a Perlin
//! field carves interior walls. Layout happens in passes - walls first,
//! then the gold column with a flattened perimeter, then the spawn, then
//! loose blocks - so later passes can respect what earlier ones placed.

use crate::config::SessionConfig;
use crate::map::Coord;
use crate::tile::TileKind;
use crate::world::World;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Noise sampling frequency for wall carving.
const WALL_FREQ: f64 = 0.17;

/// Placement attempts before a pass settles for a deterministic fallback.
const PLACEMENT_TRIES: u32 = 400;

/// Builds playable worlds from a config and a resolved seed.
pub struct WorldGenerator {
    config: SessionConfig,
    rng: ChaCha8Rng,
    noise: Perlin,
}

impl WorldGenerator {
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        WorldGenerator {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise: Perlin::new(seed as u32),
        }
    }

    /// Generate a world with the agent already spawned.
    pub fn generate(&mut self) -> World {
        let (rows, cols) = self.config.world_size;
        let rows = rows.max(12) as i32;
        let cols = cols.max(12) as i32;
        let mut world = World::new(rows, cols);

        self.carve_walls(&mut world, rows, cols);
        let gold = self.place_gold(&mut world, rows, cols);
        let spawn = self.pick_spawn(&world, gold, rows, cols);
        if world.tile(spawn).kind != TileKind::Empty {
            world.set_base(spawn, TileKind::Empty, 0);
        }
        self.scatter_blocks(&mut world, gold, spawn, rows, cols);
        world.place_agent(spawn);
        world
    }

    /// Ridges of the noise field become interior walls.
    fn carve_walls(&mut self, world: &mut World, rows: i32, cols: i32) {
        if self.config.wall_threshold >= 1.0 {
            return;
        }
        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let sample = self
                    .noise
                    .get([r as f64 * WALL_FREQ, c as f64 * WALL_FREQ]);
                if sample > self.config.wall_threshold {
                    world.set_base((r, c), TileKind::Wall, 0);
                }
            }
        }
    }

    /// Drop the gold column somewhere central and flatten the 5x5 patch
    /// around it, so the perimeter walk and the staircase ring always have
    /// room to work.
    fn place_gold(&mut self, world: &mut World, rows: i32, cols: i32) -> Coord {
        let gold = (
            self.rng.gen_range(3..rows - 3),
            self.rng.gen_range(3..cols - 3),
        );
        for dr in -2..=2 {
            for dc in -2..=2 {
                if (dr, dc) != (0, 0) {
                    world.set_base((gold.0 + dr, gold.1 + dc), TileKind::Empty, 0);
                }
            }
        }
        world.set_base(gold, TileKind::Gold, self.config.gold_height);
        gold
    }

    /// Open ground away from the gold. Falls back to the farthest open
    /// cell when the configured clearance cannot be met.
    fn pick_spawn(&mut self, world: &World, gold: Coord, rows: i32, cols: i32) -> Coord {
        for _ in 0..PLACEMENT_TRIES {
            let at = (
                self.rng.gen_range(1..rows - 1),
                self.rng.gen_range(1..cols - 1),
            );
            if open_ground(world, at)
                && !near_gold(at, gold)
                && manhattan(at, gold) >= self.config.gold_clearance
            {
                return at;
            }
        }
        let mut best: Option<(Coord, i32)> = None;
        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let at = (r, c);
                if !open_ground(world, at) || near_gold(at, gold) {
                    continue;
                }
                let dist = manhattan(at, gold);
                if best.map_or(true, |(_, d)| dist > d) {
                    best = Some((at, dist));
                }
            }
        }
        best.map(|(at, _)| at).unwrap_or((1, 1))
    }

    /// Scatter loose blocks on open ground, clear of the gold patch and
    /// the spawn. Crowded worlds may place fewer than asked.
    fn scatter_blocks(
        &mut self,
        world: &mut World,
        gold: Coord,
        spawn: Coord,
        rows: i32,
        cols: i32,
    ) {
        for _ in 0..self.config.block_count {
            for _ in 0..PLACEMENT_TRIES {
                let at = (
                    self.rng.gen_range(1..rows - 1),
                    self.rng.gen_range(1..cols - 1),
                );
                if open_ground(world, at) && !near_gold(at, gold) && at != spawn {
                    world.add_blocks(at, 1);
                    break;
                }
            }
        }
    }
}

fn manhattan(a: Coord, b: Coord) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Within the flattened 5x5 patch around the gold.
fn near_gold(at: Coord, gold: Coord) -> bool {
    (at.0 - gold.0).abs() <= 2 && (at.1 - gold.1).abs() <= 2
}

/// Bare walkable ground at level zero.
fn open_ground(world: &World, at: Coord) -> bool {
    let tile = world.tile(at);
    tile.kind == TileKind::Empty && tile.level == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stairs::ring_around;
    use crate::tile::Tile;

    fn generate(config: SessionConfig, seed: u64) -> World {
        WorldGenerator::new(config, seed).generate()
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = generate(SessionConfig::default(), 7);
        let b = generate(SessionConfig::default(), 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(SessionConfig::default(), 7);
        let b = generate(SessionConfig::default(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_gold_column_and_cleared_perimeter() {
        let config = SessionConfig::default();
        let world = generate(config.clone(), 42);
        let gold = world.gold().expect("generated world has gold");
        assert_eq!(world.tile(gold), Tile::new(TileKind::Gold, config.gold_height));
        for cell in ring_around(gold) {
            assert_eq!(world.tile(cell), Tile::flat(TileKind::Empty));
        }
        // The approach cells above the ring are open too.
        assert_eq!(world.tile((gold.0 - 1, gold.1)), Tile::flat(TileKind::Empty));
        assert_eq!(
            world.tile((gold.0 - 1, gold.1 + 1)),
            Tile::flat(TileKind::Empty)
        );
    }

    #[test]
    fn test_enough_blocks_for_a_staircase() {
        let world = generate(SessionConfig::quick(), 3);
        assert!(world.total_stacked() >= 22);
    }

    #[test]
    fn test_spawn_is_open_and_clear_of_the_gold() {
        let config = SessionConfig::quick();
        let world = generate(config.clone(), 11);
        let spawn = world.agent();
        let gold = world.gold().unwrap();
        assert_eq!(world.tile(spawn), Tile::flat(TileKind::Empty));
        assert!(manhattan(spawn, gold) >= config.gold_clearance);
    }

    #[test]
    fn test_flat_preset_has_no_interior_walls() {
        let world = generate(SessionConfig::open_field(), 5);
        for r in 1..world.rows() - 1 {
            for c in 1..world.cols() - 1 {
                assert!(!world.tile((r, c)).kind.is_wall(), "wall at ({r}, {c})");
            }
        }
    }
}
