//! Player commands and how each one validates and mutates a session.
//!
//! Every command is a small transition type implementing [`ActionTransition`].
//! The engine drives it through `pre_validate -> apply -> post_validate` on a
//! working copy of the session and commits only when all three succeed.

mod attack;
mod concede;
mod error;
mod movement;
mod prompt;
mod skill;
mod special;
mod target;

pub use attack::AttackAction;
pub use concede::{FleeAction, ForfeitAction};
pub use error::ActionError;
pub use movement::MoveAction;
pub use prompt::ChooseCellAction;
pub use skill::{SkillAction, SkillOutcome};
pub use special::{SpecialAction, SpecialOutcome};

use strum::Display;

use crate::combat::HitReport;
use crate::env::BattleEnv;
use crate::state::{BattleSession, Cell, CombatantId};

/// What a resolved command charges against the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionCost {
    /// One action point.
    ActionPoint,
    /// Ends the actor's turn regardless of budget.
    EndsTurn,
    /// Nothing yet; the cost is paid when the opened prompt resolves.
    Deferred,
}

/// Defines how one command validates and mutates a session.
pub trait ActionTransition {
    type Result;

    /// The combatant issuing the command.
    fn actor(&self) -> CombatantId;

    fn cost(&self, _session: &BattleSession) -> ActionCost {
        ActionCost::ActionPoint
    }

    /// Validates pre-conditions using the session **before** mutation.
    fn pre_validate(
        &self,
        _session: &BattleSession,
        _env: &BattleEnv<'_>,
    ) -> Result<(), ActionError> {
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &mut BattleEnv<'_>,
    ) -> Result<Self::Result, ActionError>;

    /// Validates post-conditions using the session **after** mutation.
    fn post_validate(
        &self,
        _session: &BattleSession,
        _env: &BattleEnv<'_>,
    ) -> Result<(), ActionError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    Move,
    Attack,
    Special,
    Skill,
    ChooseCell,
    Forfeit,
    Flee,
}

/// A command issued by a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Move(MoveAction),
    Attack(AttackAction),
    Special(SpecialAction),
    Skill(SkillAction),
    ChooseCell(ChooseCellAction),
    Forfeit(ForfeitAction),
    Flee(FleeAction),
}

impl Command {
    pub fn attack(actor: CombatantId, target: Option<CombatantId>) -> Self {
        Self::Attack(AttackAction { actor, target })
    }

    pub fn special(actor: CombatantId) -> Self {
        Self::Special(SpecialAction { actor })
    }

    pub fn skill(actor: CombatantId, slot: u8, target: Option<CombatantId>) -> Self {
        Self::Skill(SkillAction {
            actor,
            slot,
            target,
        })
    }

    pub fn choose_cell(actor: CombatantId, cell: usize) -> Self {
        Self::ChooseCell(ChooseCellAction { actor, cell })
    }

    pub fn forfeit(actor: CombatantId) -> Self {
        Self::Forfeit(ForfeitAction { actor })
    }

    pub fn flee(actor: CombatantId) -> Self {
        Self::Flee(FleeAction { actor })
    }

    pub fn actor(&self) -> CombatantId {
        match self {
            Command::Move(action) => action.actor(),
            Command::Attack(action) => action.actor(),
            Command::Special(action) => action.actor(),
            Command::Skill(action) => action.actor(),
            Command::ChooseCell(action) => action.actor(),
            Command::Forfeit(action) => action.actor(),
            Command::Flee(action) => action.actor(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Move(_) => CommandKind::Move,
            Command::Attack(_) => CommandKind::Attack,
            Command::Special(_) => CommandKind::Special,
            Command::Skill(_) => CommandKind::Skill,
            Command::ChooseCell(_) => CommandKind::ChooseCell,
            Command::Forfeit(_) => CommandKind::Forfeit,
            Command::Flee(_) => CommandKind::Flee,
        }
    }
}

/// Command-specific result of a resolved command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Moved(Cell),
    Attacked(HitReport),
    Special(SpecialOutcome),
    Skill(SkillOutcome),
    CellChosen { subject: CombatantId, cell: Cell },
    Forfeited,
    Fled { escaped: bool },
}
