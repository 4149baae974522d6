use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod types;

/// Construction parameters for a new game.
///
/// The mine count is nominal: it is derived from `mine_percentage` by
/// ceiling, and the random generator performs an independent trial per cell
/// against that target, so the realized count can deviate from it (see
/// [`RandomMineLayoutGenerator`]).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mine_percentage: f64,
}

impl GameConfig {
    pub const fn new(size: Coord2, mine_percentage: f64) -> Self {
        Self {
            size,
            mine_percentage,
        }
    }

    /// Beginner difficulty, 5x5 at 20% mines.
    pub const fn beginner() -> Self {
        Self::new((5, 5), 0.2)
    }

    /// Intermediate difficulty, 10x10 at 20% mines.
    pub const fn intermediate() -> Self {
        Self::new((10, 10), 0.2)
    }

    /// Advanced difficulty, 20x20 at 20% mines.
    pub const fn advanced() -> Self {
        Self::new((20, 20), 0.2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if !(0.0..=1.0).contains(&self.mine_percentage) {
            return Err(GameError::InvalidMinePercentage);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.size.0, self.size.1)
    }

    /// Nominal mine count, `ceil(total_cells * mine_percentage)`.
    pub fn mine_target(&self) -> CellCount {
        (f64::from(self.total_cells()) * self.mine_percentage).ceil() as CellCount
    }
}

/// Immutable mine placement plus the per-cell adjacency cache.
///
/// The neighbor counts are computed once at construction and never change;
/// every later adjacency query is a cache read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
    neighbor_counts: Array2<u8>,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .expect("mine count fits in CellCount");
        let bounds = mine_mask.grid_bounds();
        let neighbor_counts = Array2::from_shape_fn(mine_mask.dim(), |(x, y)| {
            neighbors((x as Coord, y as Coord), bounds)
                .filter(|&pos| mine_mask[ix(pos)])
                .count() as u8
        });
        Self {
            mine_mask,
            mine_count,
            neighbor_counts,
        }
    }

    /// Builds a layout with mines at exactly the given coordinates.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(ix(size));

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[ix(coords)] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.mine_mask.grid_bounds()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask
            .len()
            .try_into()
            .expect("cell total fits in CellCount")
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Cached count of mines among the up-to-8 in-bounds neighbors.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.neighbor_counts[ix(coords)]
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[ix(coords)]
    }
}

/// Outcome of a flag toggle. The `Flagged`/`Unflagged` variants carry the
/// new flag state; revealed cells never change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// The flag state after the toggle, when it changed.
    pub const fn flag_state(self) -> Option<bool> {
        match self {
            Self::NoChange => None,
            Self::Flagged => Some(true),
            Self::Unflagged => Some(false),
        }
    }
}

/// Outcome of revealing a cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
