//! Routes a battle command to its action type and runs it against the session.

use crate::action::{ActionCost, ActionError, ActionResult, ActionTransition, Command};
use crate::env::BattleEnv;
use crate::state::BattleSession;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Runs one player action. A rule check that fails in `pre_validate` leaves
/// the arena untouched; `post_validate` re-reads the grid and the combatant
/// the action moved or hurt.
#[inline]
fn drive_transition<T>(
    transition: &T,
    session: &mut BattleSession,
    env: &mut BattleEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<ActionError>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Resolves `command` and tags a rejection with the command that caused it.
pub(super) fn execute_transition(
    command: &Command,
    session: &mut BattleSession,
    env: &mut BattleEnv<'_>,
) -> Result<ActionResult, ExecuteError> {
    match command {
        Command::Move(transition) => {
            let cell = drive_transition(transition, session, env).map_err(ExecuteError::Move)?;
            Ok(ActionResult::Moved(cell))
        }
        Command::Attack(transition) => {
            let report =
                drive_transition(transition, session, env).map_err(ExecuteError::Attack)?;
            Ok(ActionResult::Attacked(report))
        }
        Command::Special(transition) => {
            let outcome =
                drive_transition(transition, session, env).map_err(ExecuteError::Special)?;
            Ok(ActionResult::Special(outcome))
        }
        Command::Skill(transition) => {
            let outcome =
                drive_transition(transition, session, env).map_err(ExecuteError::Skill)?;
            Ok(ActionResult::Skill(outcome))
        }
        Command::ChooseCell(transition) => {
            let (subject, cell) =
                drive_transition(transition, session, env).map_err(ExecuteError::ChooseCell)?;
            Ok(ActionResult::CellChosen { subject, cell })
        }
        Command::Forfeit(transition) => {
            drive_transition(transition, session, env).map_err(ExecuteError::Forfeit)?;
            Ok(ActionResult::Forfeited)
        }
        Command::Flee(transition) => {
            let escaped =
                drive_transition(transition, session, env).map_err(ExecuteError::Flee)?;
            Ok(ActionResult::Fled { escaped })
        }
    }
}

/// Action points the command will take, judged before it resolves.
pub(super) fn cost_of(command: &Command, session: &BattleSession) -> ActionCost {
    match command {
        Command::Move(transition) => transition.cost(session),
        Command::Attack(transition) => transition.cost(session),
        Command::Special(transition) => transition.cost(session),
        Command::Skill(transition) => transition.cost(session),
        Command::ChooseCell(transition) => transition.cost(session),
        Command::Forfeit(transition) => transition.cost(session),
        Command::Flee(transition) => transition.cost(session),
    }
}
