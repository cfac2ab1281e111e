use serde::{Deserialize, Serialize};

use crate::*;

/// Classic board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((16, 30), 99),
        }
    }

    /// The preset matching `config` exactly, if any.
    pub fn from_config(config: GameConfig) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.config() == config)
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}
