//! Command execution and turn control.
//!
//! The [`BattleEngine`] is the only writer of a [`BattleSession`]. A command
//! runs on a working copy of the session; the copy replaces the live session
//! only when every transition phase succeeded, so a rejected command leaves no
//! trace. After the commit the engine settles the turn: victory check, cost,
//! and, when the turn is over, the next actor's turn start (running monster
//! turns in between).

mod errors;
mod transition;
mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{ActionResult, Command};
use crate::ai::MonsterReport;
use crate::env::BattleEnv;
use crate::state::{BattleSession, CombatantId, Conclusion, PendingPrompt};

/// Where the turn stands after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnProgress {
    /// Same actor, points left.
    Continues { actions_left: i32 },
    /// A new turn started for `actor`.
    Advanced { actor: CombatantId, serial: u64 },
    /// The actor owes a cell choice.
    AwaitingCell { prompt: PendingPrompt },
    Concluded(Conclusion),
}

/// Complete outcome of one accepted command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub result: ActionResult,
    pub progress: TurnProgress,
    /// Monster turns that ran before control came back to a player.
    pub monster_turns: Vec<MonsterReport>,
}

pub struct BattleEngine<'a> {
    session: &'a mut BattleSession,
}

impl<'a> BattleEngine<'a> {
    pub fn new(session: &'a mut BattleSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &BattleSession {
        self.session
    }

    /// Validates, resolves and settles one command.
    pub fn execute(
        &mut self,
        mut env: BattleEnv<'_>,
        command: &Command,
    ) -> Result<ActionOutcome, ExecuteError> {
        self.validate_actor(command)?;

        let cost = transition::cost_of(command, self.session);
        let mut working = self.session.clone();
        let result = transition::execute_transition(command, &mut working, &mut env)?;

        *self.session = working;
        self.session.nonce += 1;

        let mut monster_turns = Vec::new();
        let progress = self.settle(cost, &mut env, &mut monster_turns);
        Ok(ActionOutcome {
            result,
            progress,
            monster_turns,
        })
    }

    /// Checks that `command` may be issued right now by its actor.
    fn validate_actor(&self, command: &Command) -> Result<(), ExecuteError> {
        if !self.session.is_active() {
            return Err(ExecuteError::SessionConcluded);
        }
        let actor = command.actor();
        if !self.session.is_participant(actor) {
            return Err(ExecuteError::NotParticipant(actor));
        }
        if let Some(prompt) = self.session.prompt {
            return match command {
                Command::ChooseCell(_) if actor == prompt.actor => Ok(()),
                _ => Err(ExecuteError::PromptPending {
                    actor: prompt.actor,
                }),
            };
        }
        let current_actor = self.session.turn.current;
        if actor != current_actor {
            return Err(ExecuteError::ActorNotCurrent {
                actor,
                current_actor,
            });
        }
        if self.session.turn.actions_left <= 0 {
            return Err(ExecuteError::NoActionsLeft);
        }
        Ok(())
    }
}
