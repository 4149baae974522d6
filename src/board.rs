use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of one board mutation: the outcome plus every cell whose
/// displayable state changed, flood-fill cascade included.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardUpdate {
    pub outcome: RevealOutcome,
    pub changes: Vec<CellChange>,
}

impl BoardUpdate {
    const fn no_change() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            changes: Vec::new(),
        }
    }
}

/// The playing grid: an immutable [`MineLayout`] plus the mutable per-cell
/// player-visible states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            cells: Array2::default(ix(size)),
            revealed_count: 0,
            flagged_count: 0,
            triggered_mine: None,
        }
    }

    /// Validates `config` and builds a board from the given placement
    /// strategy.
    pub fn generate(config: &GameConfig, generator: impl MineLayoutGenerator) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(generator.generate(config)))
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.layout.safe_cell_count()
    }

    pub fn revealed_safe_cells(&self) -> CellCount {
        self.revealed_count
    }

    /// How many mines have not been flagged yet.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// All safe cells revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.layout.safe_cell_count()
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.cells[ix(coords)]
    }

    /// The mine that ended the game, if one was hit.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Read-only snapshot of one cell in notification form.
    pub fn describe_cell(&self, coords: Coord2) -> CellChange {
        let state = self.cell_at(coords);
        CellChange {
            coords,
            revealed: state.is_revealed(),
            flagged: state.is_flagged(),
            is_mine: self.layout.contains_mine(coords),
            adjacent_mines: self.layout.adjacent_mine_count(coords),
        }
    }

    /// Reveals a cell.
    ///
    /// Out-of-bounds coordinates are an error; revealing an already-revealed
    /// or flagged cell is a no-op with an empty change-set. Hitting a mine
    /// records the triggered cell and skips the flood fill. Revealing a safe
    /// cell with no adjacent mines opens the whole connected zero-count
    /// region plus its numbered boundary.
    pub fn reveal(&mut self, coords: Coord2) -> Result<BoardUpdate> {
        let coords = self.layout.validate_coords(coords)?;

        if !matches!(self.cell_at(coords), CellState::Hidden) {
            return Ok(BoardUpdate::no_change());
        }

        if self.layout.contains_mine(coords) {
            self.cells[ix(coords)] = CellState::Revealed(self.layout.adjacent_mine_count(coords));
            self.triggered_mine = Some(coords);
            log::debug!("Hit mine at {coords:?}");
            return Ok(BoardUpdate {
                outcome: RevealOutcome::HitMine,
                changes: vec![self.describe_cell(coords)],
            });
        }

        let mut changes = Vec::new();
        self.open_safe_cell(coords, &mut changes);

        let adjacent_mines = self.layout.adjacent_mine_count(coords);
        if adjacent_mines == 0 {
            self.flood_fill(coords, &mut changes);
        }

        Ok(BoardUpdate {
            outcome: RevealOutcome::Revealed,
            changes,
        })
    }

    /// Opens every Hidden cell connected to `origin` through zero-count
    /// cells. Explicit work list, never language recursion; the revealed
    /// state doubles as the visited marker so each cell is opened at most
    /// once.
    fn flood_fill(&mut self, origin: Coord2, changes: &mut Vec<CellChange>) {
        let mut visited = HashSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .cells
            .iter_neighbors(origin)
            .filter(|&pos| matches!(self.cell_at(pos), CellState::Hidden))
            .collect();
        log::trace!("Starting flood fill from {origin:?}, initial neighbors: {to_visit:?}");

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flagged cells block the cascade, revealed cells are done
            if !matches!(self.cell_at(visit_coords), CellState::Hidden) {
                log::trace!("Skipping cell at {visit_coords:?}");
                continue;
            }

            self.open_safe_cell(visit_coords, changes);

            if self.layout.adjacent_mine_count(visit_coords) == 0 {
                let next: Vec<_> = self
                    .cells
                    .iter_neighbors(visit_coords)
                    .filter(|&pos| matches!(self.cell_at(pos), CellState::Hidden))
                    .filter(|pos| !visited.contains(pos))
                    .collect();
                to_visit.extend(next);
            }
        }
    }

    fn open_safe_cell(&mut self, coords: Coord2, changes: &mut Vec<CellChange>) {
        let adjacent_mines = self.layout.adjacent_mine_count(coords);
        self.cells[ix(coords)] = CellState::Revealed(adjacent_mines);
        self.revealed_count += 1;
        log::trace!("Opened cell at {coords:?}, adjacent mines: {adjacent_mines}");
        changes.push(self.describe_cell(coords));
    }

    /// Toggles the advisory flag on a hidden cell. Revealed cells are left
    /// untouched.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        Ok(match self.cell_at(coords) {
            CellState::Hidden => {
                self.cells[ix(coords)] = CellState::Flagged;
                self.flagged_count += 1;
                MarkOutcome::Flagged
            }
            CellState::Flagged => {
                self.cells[ix(coords)] = CellState::Hidden;
                self.flagged_count -= 1;
                MarkOutcome::Unflagged
            }
            CellState::Revealed(_) => MarkOutcome::NoChange,
        })
    }

    /// Reveals every still-hidden mine for end-of-game display. Flagged
    /// mines keep their flag.
    pub fn expose_mines(&mut self) -> Vec<CellChange> {
        let mut changes = Vec::new();
        let (x_end, y_end) = self.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                if self.layout.contains_mine(coords)
                    && matches!(self.cell_at(coords), CellState::Hidden)
                {
                    self.cells[ix(coords)] =
                        CellState::Revealed(self.layout.adjacent_mine_count(coords));
                    changes.push(self.describe_cell(coords));
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn reveal_out_of_bounds_is_an_error() {
        let mut board = board((3, 3), &[]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.reveal((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn reveal_mine_records_trigger_and_skips_flood_fill() {
        let mut board = board((5, 5), &[(2, 2)]);

        let update = board.reveal((2, 2)).unwrap();

        assert_eq!(update.outcome, RevealOutcome::HitMine);
        assert_eq!(update.changes.len(), 1);
        assert!(update.changes[0].is_mine);
        assert_eq!(board.triggered_mine(), Some((2, 2)));
        assert_eq!(board.revealed_safe_cells(), 0);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board((3, 3), &[(2, 2)]);

        let first = board.reveal((0, 0)).unwrap();
        assert!(first.outcome.has_update());

        let second = board.reveal((0, 0)).unwrap();
        assert_eq!(second.outcome, RevealOutcome::NoChange);
        assert!(second.changes.is_empty());
    }

    #[test]
    fn flood_fill_opens_zero_region_with_numbered_boundary() {
        // single mine in a corner, revealing the far corner cascades
        let mut board = board((4, 4), &[(3, 3)]);

        let update = board.reveal((0, 0)).unwrap();

        assert_eq!(update.outcome, RevealOutcome::Revealed);
        assert_eq!(update.changes.len(), 15);
        for change in &update.changes {
            assert!(change.revealed);
            assert!(!change.is_mine);
        }
        // every revealed cell bordering the mine carries a positive count
        assert_eq!(board.cell_at((2, 2)), CellState::Revealed(1));
        assert_eq!(board.cell_at((3, 2)), CellState::Revealed(1));
        assert_eq!(board.cell_at((2, 3)), CellState::Revealed(1));
        assert_eq!(board.cell_at((3, 3)), CellState::Hidden);
        assert!(board.is_cleared());
    }

    #[test]
    fn flood_fill_boundary_cells_all_have_positive_counts() {
        let mut board = board((6, 6), &[(5, 5), (5, 4), (4, 5)]);

        board.reveal((0, 0)).unwrap();

        let (x_end, y_end) = board.size();
        for x in 0..x_end {
            for y in 0..y_end {
                if let CellState::Revealed(0) = board.cell_at((x, y)) {
                    // every neighbor of an open zero cell must itself be open
                    for pos in neighbors((x, y), board.size()) {
                        assert!(
                            board.cell_at(pos).is_revealed(),
                            "unopened neighbor {pos:?} of zero cell ({x}, {y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn flag_blocks_reveal_until_removed() {
        let mut board = board((3, 3), &[(2, 2)]);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Flagged);
        let blocked = board.reveal((0, 0)).unwrap();
        assert_eq!(blocked.outcome, RevealOutcome::NoChange);
        assert!(blocked.changes.is_empty());

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Unflagged);
        assert_eq!(board.cell_at((0, 0)), CellState::Hidden);
        assert!(board.reveal((0, 0)).unwrap().outcome.has_update());
    }

    #[test]
    fn flood_fill_does_not_open_flagged_cells() {
        let mut board = board((4, 1), &[]);

        board.toggle_flag((2, 0)).unwrap();
        board.reveal((0, 0)).unwrap();

        assert_eq!(board.cell_at((2, 0)), CellState::Flagged);
        assert_eq!(board.cell_at((1, 0)), CellState::Revealed(0));
        // the cascade stops at the flag
        assert_eq!(board.cell_at((3, 0)), CellState::Hidden);
    }

    #[test]
    fn toggle_flag_on_revealed_cell_is_ignored() {
        let mut board = board((2, 2), &[(1, 1)]);

        board.reveal((0, 0)).unwrap();

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.cell_at((0, 0)), CellState::Revealed(1));
    }

    #[test]
    fn mines_left_tracks_flags() {
        let mut board = board((3, 3), &[(0, 0), (1, 1)]);

        assert_eq!(board.mines_left(), 2);
        board.toggle_flag((0, 0)).unwrap();
        assert_eq!(board.mines_left(), 1);
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((0, 2)).unwrap();
        assert_eq!(board.mines_left(), -1);
    }

    #[test]
    fn expose_mines_opens_hidden_mines_only() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        board.toggle_flag((0, 0)).unwrap();
        board.reveal((2, 0)).unwrap();
        let changes = board.expose_mines();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].coords, (2, 2));
        assert!(changes[0].is_mine && changes[0].revealed);
        // flagged mine keeps its flag
        assert_eq!(board.cell_at((0, 0)), CellState::Flagged);
    }
}
