//! Errors raised while validating or resolving a battle command.
//!
//! Every variant is recoverable: the command is rejected, the session is
//! left untouched and the same actor may try again.

use crate::action::CommandKind;
use crate::state::{Cell, CombatantId, Variant};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("{command} is not available in {variant} battles")]
    WrongVariant {
        command: CommandKind,
        variant: Variant,
    },

    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("{0} has no grid position")]
    Unplaced(CombatantId),

    // ========================================================================
    // Movement
    // ========================================================================
    #[error("no directions given")]
    NoSteps,

    #[error("'{0}' is not a direction (use w, a, s, d)")]
    MalformedDirection(String),

    #[error("{steps} steps exceed mobility {mobility}")]
    TooManySteps { steps: usize, mobility: u32 },

    #[error("step {step} leaves the grid")]
    OffGrid { step: usize },

    #[error("cell {0} is occupied")]
    Occupied(Cell),

    #[error("cell {0} does not exist")]
    InvalidCell(usize),

    #[error("no free cell left")]
    NoFreeCell,

    // ========================================================================
    // Targeting
    // ========================================================================
    #[error("a target is required")]
    MissingTarget,

    #[error("{0} is not a valid target")]
    InvalidTarget(CombatantId),

    #[error("{0} is already down")]
    TargetDown(CombatantId),

    #[error("target at distance {distance} is out of range")]
    OutOfRange { distance: u32 },

    // ========================================================================
    // Abilities
    // ========================================================================
    #[error("ability on cooldown for {0} more turn(s)")]
    OnCooldown(u32),

    #[error("skills require an advanced class")]
    NoAdvancedClass,

    #[error("no skill in slot {0}")]
    InvalidSkillSlot(u8),

    #[error("no cell choice is pending")]
    NoPendingPrompt,
}
