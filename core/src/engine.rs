use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
/// - any -> InProgress, by starting a new game
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Turns player intents into board mutations and reports every change to an [`EventSink`].
///
/// Intents are only processed while the game is in progress; after a win or a loss they are ignored, so terminal
/// events are emitted exactly once per game.
///
/// Loading a saved manager rejects a state that disagrees with its board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedGame")]
pub struct GameManager {
    board: Board,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

#[derive(Deserialize)]
struct SavedGame {
    board: Board,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<SavedGame> for GameManager {
    type Error = GameError;

    fn try_from(saved: SavedGame) -> Result<Self> {
        let SavedGame {
            board,
            state,
            triggered_mine,
        } = saved;

        let consistent = match state {
            GameState::NotStarted => !board.is_initialized() && triggered_mine.is_none(),
            GameState::InProgress => {
                board.is_initialized()
                    && !board.mine_triggered()
                    && !board.all_safe_cells_revealed()
                    && triggered_mine.is_none()
            }
            GameState::Won => {
                board.all_safe_cells_revealed()
                    && !board.mine_triggered()
                    && triggered_mine.is_none()
            }
            GameState::Lost => {
                board.mine_triggered()
                    && triggered_mine
                        .is_some_and(|coords| board.has_mine(coords) && board.is_revealed(coords))
            }
        };
        if !consistent {
            log::warn!("Rejected saved game in state {state:?}, board disagrees");
            return Err(GameError::InconsistentState);
        }

        Ok(Self {
            board,
            state,
            triggered_mine,
        })
    }
}

impl GameManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    /// Mines minus placed flags, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Starts a new game, discarding whatever game was running.
    ///
    /// Emits [`GameEvent::MineLocated`] for every mine. On error nothing changes and nothing is emitted.
    pub fn start_game(
        &mut self,
        config: GameConfig,
        generator: impl MineGenerator,
        events: &mut impl EventSink,
    ) -> Result<()> {
        self.board.initialize(config, generator)?;
        self.state = GameState::InProgress;
        self.triggered_mine = None;
        log::debug!("Game started: {:?} with {} mines", config.size, config.mines);

        for coords in self.board.mine_coords() {
            events.emit(GameEvent::MineLocated { coords });
        }
        Ok(())
    }

    pub fn start_seeded(
        &mut self,
        config: GameConfig,
        seed: u64,
        events: &mut impl EventSink,
    ) -> Result<()> {
        self.start_game(config, RandomMineGenerator::new(seed), events)
    }

    pub fn start_with_layout(
        &mut self,
        layout: MineLayout,
        events: &mut impl EventSink,
    ) -> Result<()> {
        let config = layout.game_config();
        self.start_game(config, layout, events)
    }

    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        self.state.is_in_progress()
            && self.board.is_revealed(coords)
            && self.board.count_flagged_neighbors(coords) == self.board.adjacent_mine_count(coords)
    }

    /// Player-visible state of a cell, `None` for invalid coordinates.
    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        let cell = self.board.cell(coords)?;
        let lost = matches!(self.state, GameState::Lost);

        Some(match (cell.is_revealed(), cell.is_flagged(), cell.has_mine()) {
            (true, _, true) if self.triggered_mine == Some(coords) => CellView::Exploded,
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Revealed(cell.adjacent_mines()),
            (false, true, false) if lost => CellView::Misflagged,
            (false, true, _) => CellView::Flagged,
            (false, false, _) => CellView::Hidden,
        })
    }

    /// Toggles the flag of a hidden cell.
    pub fn flag_cell(&mut self, coords: Coord2, events: &mut impl EventSink) -> MarkOutcome {
        if !self.state.is_in_progress() || !self.board.toggle_flag(coords) {
            return MarkOutcome::NoChange;
        }

        let flagged = self.board.is_flagged(coords);
        log::debug!("Flag at {:?}: {}", coords, flagged);
        events.emit(GameEvent::CellFlagChanged { coords, flagged });
        MarkOutcome::Changed
    }

    /// Reveals a hidden cell, or chords an already revealed one.
    ///
    /// Flagged cells are protected and never revealed by this call. Revealing a zero cell flood-fills its whole
    /// zero region plus the numbered border.
    pub fn reveal_cell(&mut self, coords: Coord2, events: &mut impl EventSink) -> RevealOutcome {
        if !self.state.is_in_progress()
            || !self.board.is_valid_cell(coords)
            || self.board.is_flagged(coords)
        {
            return RevealOutcome::NoChange;
        }

        let updated = if self.board.is_revealed(coords) {
            self.chord(coords, events)
        } else {
            self.open_cell(coords, events);
            true
        };

        if !updated {
            return RevealOutcome::NoChange;
        }

        if self.state.is_in_progress() && self.board.all_safe_cells_revealed() {
            self.win(events);
        }

        match self.state {
            GameState::Won => RevealOutcome::Won,
            GameState::Lost => RevealOutcome::HitMine,
            _ => RevealOutcome::Revealed,
        }
    }

    /// Reveals the unflagged hidden neighbors of a revealed cell whose flag count matches its number.
    fn chord(&mut self, coords: Coord2, events: &mut impl EventSink) -> bool {
        if !self.can_chord_at(coords) {
            return false;
        }

        let targets: Vec<Coord2> = self
            .board
            .neighbors(coords)
            .filter(|&pos| !self.board.is_revealed(pos) && !self.board.is_flagged(pos))
            .collect();
        log::debug!("Chord at {:?}, opening {:?}", coords, targets);

        let mut updated = false;
        for pos in targets {
            // an earlier flood fill may already have reached this one
            if self.board.is_revealed(pos) {
                continue;
            }
            self.open_cell(pos, events);
            updated = true;
            if self.state.is_finished() {
                break;
            }
        }
        updated
    }

    /// Reveals a single hidden cell and deals with the consequences: loss on a mine, flood fill on a zero.
    fn open_cell(&mut self, coords: Coord2, events: &mut impl EventSink) {
        self.reveal_and_emit(coords, events);

        if self.board.has_mine(coords) {
            events.emit(GameEvent::Exploded { coords });
            self.lose(coords, events);
        } else if self.board.adjacent_mine_count(coords) == 0 {
            self.flood_fill(coords, events);
        }
    }

    fn flood_fill(&mut self, start: Coord2, events: &mut impl EventSink) {
        let mut to_visit = Vec::from([start]);
        let mut opened = 0usize;

        while let Some(visit_coords) = to_visit.pop() {
            for pos in self.board.neighbors(visit_coords) {
                if self.board.is_flagged(pos) || self.board.is_revealed(pos) {
                    continue;
                }

                self.reveal_and_emit(pos, events);
                opened += 1;
                log::trace!("Flood opened cell at {:?}", pos);

                if self.board.adjacent_mine_count(pos) == 0 {
                    to_visit.push(pos);
                }
            }
        }

        log::debug!("Flood fill from {:?} opened {} cells", start, opened);
    }

    fn reveal_and_emit(&mut self, coords: Coord2, events: &mut impl EventSink) {
        if self.board.reveal(coords) {
            events.emit(GameEvent::CellRevealed {
                coords,
                adjacent_mines: self.board.adjacent_mine_count(coords),
                has_mine: self.board.has_mine(coords),
            });
        }
    }

    /// Marks the win and flags every mine the player left unflagged.
    fn win(&mut self, events: &mut impl EventSink) {
        self.state = GameState::Won;
        log::debug!("Game won");
        events.emit(GameEvent::GameWon);

        for coords in self.board.iter_coords() {
            if self.board.has_mine(coords)
                && !self.board.is_flagged(coords)
                && self.board.toggle_flag(coords)
            {
                events.emit(GameEvent::CellFlagChanged {
                    coords,
                    flagged: true,
                });
            }
        }
    }

    /// Marks the loss, reveals every unflagged cell and reports wrong flags.
    fn lose(&mut self, triggered: Coord2, events: &mut impl EventSink) {
        self.state = GameState::Lost;
        self.triggered_mine = Some(triggered);
        log::debug!("Game lost, mine at {:?}", triggered);
        events.emit(GameEvent::GameLost);

        for coords in self.board.iter_coords() {
            if self.board.is_revealed(coords) {
                continue;
            }

            if !self.board.is_flagged(coords) {
                self.reveal_and_emit(coords, events);
            } else if !self.board.has_mine(coords) {
                events.emit(GameEvent::CellMisflagged { coords });
            }
        }
    }
}
