#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod difficulty;
mod engine;
mod error;
mod event;
mod generator;
mod types;

/// Board dimensions and mine count of a single game.
///
/// Fields are public so configs can be written as literals or deserialized; everything that consumes a config
/// re-checks it with [`GameConfig::validate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// Derives the mine count from a percentage of the board area, rounding down but never below one mine.
    pub fn with_mine_density(size: Coord2, percent: u8) -> Result<Self> {
        let mines = (u32::from(mult(size.0, size.1)) * u32::from(percent) / 100).max(1);
        let mines = CellCount::try_from(mines).map_err(|_| GameError::TooManyMines)?;
        Self::new(size, mines)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            Err(GameError::EmptyBoard)
        } else if self.mines == 0 {
            Err(GameError::NoMines)
        } else if self.mines >= self.total_cells() {
            Err(GameError::TooManyMines)
        } else {
            Ok(())
        }
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 10)
    }
}

/// Which cells of a board hold a mine.
///
/// Serialized as the bare mine mask, the mine count is always recounted on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Rejects masks with more rows or columns than a [`Coord`] can address.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        check_shape(mine_mask.dim())?;
        Ok(Self::counted(mine_mask))
    }

    /// Callers guarantee the mask shape fits in [`Coord2`].
    pub(crate) fn counted(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::counted(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.mine_mask)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Out-of-range coordinates never hold a mine.
    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    /// Mine coordinates in row-major order.
    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Summary of what a single reveal intent did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
