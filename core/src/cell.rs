use serde::{Deserialize, Serialize};

/// Authoritative state of one grid position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    adjacent_mines: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(has_mine: bool, adjacent_mines: u8) -> Self {
        Self {
            has_mine,
            adjacent_mines,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    /// Meaningless for mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub(crate) fn set_revealed(&mut self) {
        self.revealed = true;
        self.flagged = false;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }
}

/// Player-visible tile, what a front-end would draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine uncovered after the game was lost.
    Mine,
    /// The mine that lost the game.
    Exploded,
    /// A flag on a safe cell, only shown after the game was lost.
    Misflagged,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Hidden => true,
            Flagged => true,
            Revealed(_) => false,
            Mine => false,
            Exploded => false,
            Misflagged => true,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
