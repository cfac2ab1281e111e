use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// A fixed layout ignores the requested config; [`Board::initialize`] rejects it if the two disagree.
impl MineGenerator for MineLayout {
    fn generate(self, _config: GameConfig) -> MineLayout {
        self
    }
}

/// How a [`RandomMineGenerator`] picks mine cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Rejection sampling on sparse boards, shuffling on dense ones.
    #[default]
    Auto,
    /// Sample uniform coordinates until enough distinct cells are mined.
    Rejection,
    /// Partially shuffle the list of every cell index.
    Shuffle,
}

impl Placement {
    /// Strategy actually used for `mines` out of `total_cells`.
    ///
    /// Rejection sampling slows down quickly once most cells are taken, so dense boards always shuffle.
    pub fn resolve(self, mines: usize, total_cells: usize) -> Self {
        use Placement::*;

        let dense = mines * 2 > total_cells;
        match self {
            Auto if dense => Shuffle,
            Auto => Rejection,
            Rejection if dense => {
                log::warn!("Board too dense for rejection sampling, fallback to shuffle");
                Shuffle
            }
            other => other,
        }
    }
}
