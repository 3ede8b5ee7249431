//! Battle state: the session aggregate and everything it owns.

mod combatant;
mod grid;
mod log;
mod session;
mod setup;
mod status;
mod turn;

pub use combatant::{AdvancedClass, BaseClass, Combatant, CombatantId, Role, Side, Stats};
pub use grid::{Cell, Direction, Grid};
pub use log::BattleLog;
pub use session::{
    ArenaId, BattleSession, Conclusion, ConclusionReason, PendingPrompt, Phase, PromptPurpose,
    Variant,
};
pub use setup::{Entrant, SetupError};
pub use status::{
    EffectPhase, StatusEffect, StatusEffectKind, StatusEffects, StatusTag, Timing,
    TurnStartEffects,
};
pub use turn::TurnState;
