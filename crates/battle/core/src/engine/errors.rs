//! Why the engine turned a battle command down.

use crate::action::{ActionError, CommandKind};
use crate::state::CombatantId;

/// Where in an action's resolution the rule check tripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// A rule violation together with the point it was caught.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// A battle command the engine refused. The arena is exactly as it was before
/// the command arrived.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("move failed: {0}")]
    Move(TransitionPhaseError<ActionError>),

    #[error("attack failed: {0}")]
    Attack(TransitionPhaseError<ActionError>),

    #[error("special failed: {0}")]
    Special(TransitionPhaseError<ActionError>),

    #[error("skill failed: {0}")]
    Skill(TransitionPhaseError<ActionError>),

    #[error("cell choice failed: {0}")]
    ChooseCell(TransitionPhaseError<ActionError>),

    #[error("forfeit failed: {0}")]
    Forfeit(TransitionPhaseError<ActionError>),

    #[error("flee failed: {0}")]
    Flee(TransitionPhaseError<ActionError>),

    #[error("the battle is already over")]
    SessionConcluded,

    #[error("{0} is not fighting in this battle")]
    NotParticipant(CombatantId),

    #[error("it is {current_actor}'s turn, not {actor}'s")]
    ActorNotCurrent {
        actor: CombatantId,
        current_actor: CombatantId,
    },

    #[error("waiting for {actor} to choose a cell")]
    PromptPending { actor: CombatantId },

    #[error("no action points left this turn")]
    NoActionsLeft,
}

impl ExecuteError {
    /// The battle rule the command broke, if a rule check refused it.
    pub fn action_error(&self) -> Option<&ActionError> {
        self.phase_error().map(|e| &e.error)
    }

    /// Kind of command a rule check refused.
    pub fn command(&self) -> Option<CommandKind> {
        let kind = match self {
            ExecuteError::Move(_) => CommandKind::Move,
            ExecuteError::Attack(_) => CommandKind::Attack,
            ExecuteError::Special(_) => CommandKind::Special,
            ExecuteError::Skill(_) => CommandKind::Skill,
            ExecuteError::ChooseCell(_) => CommandKind::ChooseCell,
            ExecuteError::Forfeit(_) => CommandKind::Forfeit,
            ExecuteError::Flee(_) => CommandKind::Flee,
            _ => return None,
        };
        Some(kind)
    }

    fn phase_error(&self) -> Option<&TransitionPhaseError<ActionError>> {
        match self {
            ExecuteError::Move(e)
            | ExecuteError::Attack(e)
            | ExecuteError::Special(e)
            | ExecuteError::Skill(e)
            | ExecuteError::ChooseCell(e)
            | ExecuteError::Forfeit(e)
            | ExecuteError::Flee(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_command_reports_rule_and_kind() {
        let error = ExecuteError::Attack(TransitionPhaseError::new(
            TransitionPhase::PreValidate,
            ActionError::OutOfRange { distance: 4 },
        ));
        assert_eq!(error.command(), Some(CommandKind::Attack));
        assert_eq!(
            error.action_error(),
            Some(&ActionError::OutOfRange { distance: 4 })
        );
        assert_eq!(
            error.to_string(),
            "attack failed: pre_validate failed: target at distance 4 is out of range"
        );

        let busy = ExecuteError::PromptPending {
            actor: CombatantId(7),
        };
        assert_eq!(busy.command(), None);
        assert_eq!(busy.action_error(), None);
    }
}
