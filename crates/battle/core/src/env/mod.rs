//! Read-only inputs the battle rules consult: profile snapshots, the monster
//! bestiary and the random source.
//!
//! [`BattleEnv`] bundles the rule configuration with the RNG so the engine and
//! every action transition see the same pair.

mod monsters;
mod profile;
mod rng;

pub use monsters::{Bestiary, HuntingGround, MonsterKind};
pub use profile::PlayerProfile;
pub use rng::{PcgRng, ReplayRng, RngOracle};

use crate::config::BattleConfig;

pub struct BattleEnv<'a> {
    pub config: &'a BattleConfig,
    pub rng: &'a mut dyn RngOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a BattleConfig, rng: &'a mut dyn RngOracle) -> Self {
        Self { config, rng }
    }
}
