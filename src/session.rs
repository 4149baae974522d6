use serde::{Deserialize, Serialize};

use crate::*;

/// Overall status of one game.
///
/// Valid transitions:
/// - InProgress -> Lost (a mine was revealed)
/// - InProgress -> Won (the last safe cell was revealed)
/// - Won | Lost -> InProgress (reset)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One discrete player action, dispatched synchronously by
/// [`GameSession::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Reveal { coords: Coord2 },
    ToggleFlag { coords: Coord2 },
    Reset { config: GameConfig },
}

/// Notification channel back to the presentation layer.
///
/// `on_cell_changed` is called once per cell whose displayable state
/// changed in one action; `on_game_over` fires exactly once per terminal
/// transition.
pub trait GameView {
    fn on_cell_changed(&mut self, _change: &CellChange) {}
    fn on_game_over(&mut self, _won: bool) {}
}

/// View that discards every notification.
#[derive(Default)]
pub struct NoopView;

impl GameView for NoopView {}

/// One game from construction to terminal status: owns the board,
/// sequences player actions against it, and derives win/loss after each
/// reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    status: GameStatus,
}

impl GameSession {
    /// Starts a fresh game with an entropy-seeded mine layout.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::generate(&config, RandomMineLayoutGenerator::from_entropy())?;
        Ok(Self::with_board(config, board))
    }

    /// Deterministic variant of [`GameSession::new`].
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let board = Board::generate(&config, RandomMineLayoutGenerator::new(seed))?;
        Ok(Self::with_board(config, board))
    }

    /// Wraps an existing board, mainly for forced layouts in tests.
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            config,
            board,
            status: GameStatus::InProgress,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Dispatches one enumerated action; the session processes it fully
    /// before returning.
    pub fn apply(&mut self, action: Action, view: &mut impl GameView) -> Result<()> {
        match action {
            Action::Reveal { coords } => self.reveal(coords, view).map(|_| ()),
            Action::ToggleFlag { coords } => self.toggle_flag(coords, view).map(|_| ()),
            Action::Reset { config } => self.reset(config),
        }
    }

    /// Reveals a cell and re-derives the game status.
    ///
    /// Hitting a mine loses the game and exposes the remaining mines for
    /// display; revealing the last safe cell wins it. Either way every cell
    /// change is forwarded to `view` before the terminal signal.
    pub fn reveal(&mut self, coords: Coord2, view: &mut impl GameView) -> Result<RevealOutcome> {
        self.check_in_progress()?;

        let update = self.board.reveal(coords)?;
        for change in &update.changes {
            view.on_cell_changed(change);
        }

        match update.outcome {
            RevealOutcome::HitMine => {
                self.status = GameStatus::Lost;
                log::debug!("Game lost, mine triggered at {:?}", self.board.triggered_mine());
                for change in self.board.expose_mines() {
                    view.on_cell_changed(&change);
                }
                view.on_game_over(false);
            }
            RevealOutcome::Revealed if self.board.is_cleared() => {
                self.status = GameStatus::Won;
                log::debug!("Game won, all safe cells revealed");
                view.on_game_over(true);
            }
            _ => {}
        }

        Ok(update.outcome)
    }

    /// Toggles a flag; never changes the game status.
    pub fn toggle_flag(&mut self, coords: Coord2, view: &mut impl GameView) -> Result<MarkOutcome> {
        self.check_in_progress()?;

        let outcome = self.board.toggle_flag(coords)?;
        if outcome.has_update() {
            view.on_cell_changed(&self.board.describe_cell(coords));
        }
        Ok(outcome)
    }

    /// Replaces the board with a freshly generated one and returns to
    /// InProgress. Always legal, whatever the current status.
    pub fn reset(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.board = Board::generate(&config, RandomMineLayoutGenerator::from_entropy())?;
        self.config = config;
        self.status = GameStatus::InProgress;
        log::debug!("New game, size {:?}", config.size);
        Ok(())
    }

    /// Deterministic variant of [`GameSession::reset`].
    pub fn reset_with_seed(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        config.validate()?;
        self.board = Board::generate(&config, RandomMineLayoutGenerator::new(seed))?;
        self.config = config;
        self.status = GameStatus::InProgress;
        Ok(())
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
