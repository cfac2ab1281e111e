use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Seeded uniform mine placement, the same seed and config always yield the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    placement: Placement,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_placement(seed, Placement::Auto)
    }

    pub fn with_placement(seed: u64, placement: Placement) -> Self {
        Self { seed, placement }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;
        use Placement::*;

        let total_cells = usize::from(config.total_cells());
        let mines = usize::from(config.mines);
        if mines > total_cells {
            log::warn!(
                "Board too small, requested {} mines but only fits {}",
                mines,
                total_cells
            );
        }
        let mines = mines.min(total_cells);

        let actual_placement = self.placement.resolve(mines, total_cells);

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        match actual_placement {
            Rejection | Auto => {
                let mut mines_placed = 0;
                while mines_placed < mines {
                    let coords = (
                        rng.random_range(0..config.rows()),
                        rng.random_range(0..config.cols()),
                    );
                    let cell = &mut mine_mask[coords.to_nd_index()];
                    if !*cell {
                        *cell = true;
                        mines_placed += 1;
                    }
                }
            }
            Shuffle => {
                let cols = usize::from(config.cols());
                let mut indices: Vec<usize> = (0..total_cells).collect();
                let (chosen, _) = indices.partial_shuffle(&mut rng, mines);
                for &index in chosen.iter() {
                    mine_mask[[index / cols, index % cols]] = true;
                }
            }
        }

        log::debug!(
            "Placed {} mines on {:?} with {:?} (seed {})",
            mines,
            config.size,
            actual_placement,
            self.seed
        );
        MineLayout::counted(mine_mask)
    }
}
