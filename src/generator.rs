use ndarray::Array2;

use crate::*;

pub trait MineLayoutGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout;
}

/// Faithful port of the legacy placement scheme: every cell runs an
/// independent trial, drawing a uniform integer in `[0, total_cells - 1)`
/// and becoming a mine when the draw is below the nominal target.
///
/// This is a per-cell Bernoulli-style trial, not exact-count sampling, so
/// the realized mine count can deviate from `config.mine_target()`. That
/// deviation is inherited behavior, kept on purpose; the generator logs a
/// warning when it happens.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineLayoutGenerator {
    seed: u64,
}

impl RandomMineLayoutGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl MineLayoutGenerator for RandomMineLayoutGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let target = config.mine_target();
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut mine_mask: Array2<bool> = Array2::default(ix(config.size));
        if total_cells > 1 {
            for cell in mine_mask.iter_mut() {
                *cell = rng.random_range(0..total_cells - 1) < target;
            }
        } else {
            // the draw range collapses on a single-cell board
            for cell in mine_mask.iter_mut() {
                *cell = target > 0;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != target {
            log::warn!(
                "Generated mine count deviates from nominal target, actual: {}, target: {}",
                layout.mine_count(),
                target
            );
        }
        layout
    }
}

/// Places mines at fixed coordinates, mainly for tests and replays.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineLayoutGenerator {
    mine_coords: Vec<Coord2>,
}

impl FixedMineLayoutGenerator {
    pub fn new(mine_coords: Vec<Coord2>) -> Self {
        Self { mine_coords }
    }
}

impl MineLayoutGenerator for FixedMineLayoutGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout {
        MineLayout::from_mine_coords(config.size, &self.mine_coords)
            .expect("fixed mine coords must lie inside the board")
    }
}
