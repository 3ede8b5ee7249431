//! Deterministic battle rules for chat arenas.
//!
//! `battle-core` defines the combatant model, the damage pipeline, status
//! effects, the command transitions and the turn controller for the three
//! battle variants (Duel, Team, Encounter). It performs no I/O and keeps no
//! clock: randomness comes in through [`env::RngOracle`], and timeouts are
//! reported to [`engine::BattleEngine`] by whoever owns the timers. All session
//! mutation flows through the engine.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod state;
pub use action::{
    ActionCost, ActionError, ActionResult, ActionTransition, AttackAction, ChooseCellAction,
    Command, CommandKind, FleeAction, ForfeitAction, MoveAction, SkillAction, SkillOutcome,
    SpecialAction, SpecialOutcome,
};
pub use ai::{MonsterIntent, MonsterReport};
pub use combat::{AttackStyle, Attribute, HitReport, Matchup, Multiplier};
pub use config::{BattleConfig, MonsterPolicyWeights};
pub use engine::{
    ActionOutcome, BattleEngine, ExecuteError, TransitionPhase, TransitionPhaseError,
    TurnProgress,
};
pub use env::{
    BattleEnv, Bestiary, HuntingGround, MonsterKind, PcgRng, PlayerProfile, ReplayRng, RngOracle,
};
pub use state::{
    AdvancedClass, ArenaId, BaseClass, BattleLog, BattleSession, Cell, Combatant, CombatantId,
    Conclusion, ConclusionReason, Direction, Entrant, Grid, PendingPrompt, Phase, PromptPurpose,
    Role, SetupError, Side, StatusEffectKind, StatusEffects, StatusTag, Timing, TurnState,
    Variant,
};
