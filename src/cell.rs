use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Player-visible state of a single board cell.
///
/// `Revealed` carries the adjacent-mine count so the presentation layer
/// never has to consult the mine layout for an open cell. A cell never
/// leaves `Revealed` once it enters it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One observable per-cell change, the payload of
/// [`GameView::on_cell_changed`](crate::GameView::on_cell_changed).
///
/// Carries everything the presentation layer needs to redraw the cell:
/// whether it is now revealed or flagged, whether it hides a mine, and how
/// many of its neighbors do.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub revealed: bool,
    pub flagged: bool,
    pub is_mine: bool,
    pub adjacent_mines: u8,
}
