use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Authoritative grid state: mine layout, adjacency counts, and per-cell revealed/flagged state.
///
/// Per-cell queries and mutators never fail on out-of-range coordinates, they return neutral values
/// (`false`/`0`) or do nothing. Use [`Board::is_valid_cell`] to check coordinates.
///
/// Serialized as the bare cell grid. Loading rejects grids no game could produce and recounts every counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Cell>", into = "Array2<Cell>")]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    remaining_safe_cells: CellCount,
    flagged_count: CellCount,
    mine_triggered: bool,
}

impl Board {
    /// An uninitialized board, every coordinate is invalid until [`Board::initialize`] succeeds.
    pub fn new() -> Self {
        Self {
            cells: Array2::default([0, 0]),
            mine_count: 0,
            remaining_safe_cells: 0,
            flagged_count: 0,
            mine_triggered: false,
        }
    }

    pub fn from_layout(layout: &MineLayout) -> Self {
        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if layout[coords] {
                Cell::new(true, 0)
            } else {
                Cell::new(false, layout.adjacent_mine_count(coords))
            }
        });

        Self::tally(cells)
    }

    /// Derives every counter from the cells themselves.
    fn tally(cells: Array2<Cell>) -> Self {
        let mut board = Self {
            cells,
            ..Self::new()
        };
        for cell in board.cells.iter() {
            if cell.is_flagged() {
                board.flagged_count += 1;
            }
            match (cell.has_mine(), cell.is_revealed()) {
                (true, revealed) => {
                    board.mine_count += 1;
                    board.mine_triggered |= revealed;
                }
                (false, false) => board.remaining_safe_cells += 1,
                (false, true) => {}
            }
        }
        board
    }

    /// Checks that `cells` could come from a real game: the shape fits [`Coord2`], no cell is both revealed and
    /// flagged, adjacency counts match the mines, and a non-empty grid is a valid config.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        check_shape(cells.dim())?;
        if cells.is_empty() {
            return Ok(Self::new());
        }

        let size = grid_size(&cells);
        for ((row, col), cell) in cells.indexed_iter() {
            let coords = (row as Coord, col as Coord);
            let expected = if cell.has_mine() {
                0
            } else {
                NeighborIter::new(coords, size)
                    .filter(|&pos| cells[pos.to_nd_index()].has_mine())
                    .count() as u8
            };
            if cell.adjacent_mines() != expected || (cell.is_revealed() && cell.is_flagged()) {
                log::warn!("Rejected board, cell {coords:?} is inconsistent: {cell:?}");
                return Err(GameError::InconsistentState);
            }
        }

        let board = Self::tally(cells);
        GameConfig::new_unchecked(board.size(), board.mine_count).validate()?;
        Ok(board)
    }

    /// Lays out a fresh board for `config` with mines picked by `generator`.
    ///
    /// The board is left untouched when the config is invalid or the generated layout does not match it.
    pub fn initialize(&mut self, config: GameConfig, generator: impl MineGenerator) -> Result<()> {
        config.validate()?;

        let layout = generator.generate(config);
        if layout.game_config() != config {
            log::warn!(
                "Rejected layout {:?}, expected {:?}",
                layout.game_config(),
                config
            );
            return Err(GameError::LayoutMismatch);
        }

        *self = Self::from_layout(&layout);
        log::debug!(
            "Board initialized: {:?} with {} mines",
            config.size,
            config.mines
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        !self.cells.is_empty()
    }

    /// `(rows, cols)`, `(0, 0)` before initialization.
    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn is_valid_cell(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn has_mine(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(Cell::has_mine)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.cell(coords).map_or(0, Cell::adjacent_mines)
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(Cell::is_revealed)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(Cell::is_flagged)
    }

    /// Flips the flag of an unrevealed cell, returns whether anything changed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cells.get_mut(coords.to_nd_index()) else {
            return false;
        };
        if cell.is_revealed() {
            return false;
        }

        let flagged = !cell.is_flagged();
        cell.set_flagged(flagged);
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        true
    }

    /// Reveals a cell once, clearing its flag. Returns whether anything changed.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cells.get_mut(coords.to_nd_index()) else {
            return false;
        };
        if cell.is_revealed() {
            return false;
        }

        if cell.is_flagged() {
            self.flagged_count -= 1;
        }
        cell.set_revealed();
        if cell.has_mine() {
            self.mine_triggered = true;
        } else {
            self.remaining_safe_cells = self.remaining_safe_cells.saturating_sub(1);
        }
        true
    }

    /// Whether any mine has been revealed since initialization.
    pub fn mine_triggered(&self) -> bool {
        self.mine_triggered
    }

    pub fn all_safe_cells_revealed(&self) -> bool {
        self.is_initialized() && self.remaining_safe_cells == 0
    }

    pub fn remaining_safe_cells(&self) -> CellCount {
        self.remaining_safe_cells
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|&pos| self.is_flagged(pos))
            .count() as u8
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Every coordinate of the board in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// Mine coordinates in row-major order.
    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords().filter(|&coords| self.has_mine(coords))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Array2<Cell>> for Board {
    type Error = GameError;

    fn try_from(cells: Array2<Cell>) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<Board> for Array2<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}
