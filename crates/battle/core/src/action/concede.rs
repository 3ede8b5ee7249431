use crate::action::target::{combatant, only_in};
use crate::action::{ActionCost, ActionError, ActionTransition, CommandKind};
use crate::env::BattleEnv;
use crate::state::{BattleSession, Conclusion, ConclusionReason, CombatantId, Variant};

/// Gives up. The other side wins; in an encounter the monster does.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForfeitAction {
    pub actor: CombatantId,
}

impl ActionTransition for ForfeitAction {
    type Result = ();

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn cost(&self, _session: &BattleSession) -> ActionCost {
        ActionCost::EndsTurn
    }

    fn apply(&self, session: &mut BattleSession, _env: &mut BattleEnv<'_>) -> Result<(), ActionError> {
        let quitter = combatant(session, self.actor)?;
        let line = format!("{} forfeits", quitter.name);
        let winner = quitter.side.opponent();

        session.log.push(line);
        session.conclude(Conclusion {
            winner: Some(winner),
            reason: ConclusionReason::Forfeit(self.actor),
        });
        Ok(())
    }
}

/// Tries to escape an encounter. On failure the turn passes to the monster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeAction {
    pub actor: CombatantId,
}

impl ActionTransition for FleeAction {
    type Result = bool;

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn cost(&self, _session: &BattleSession) -> ActionCost {
        ActionCost::EndsTurn
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        only_in(session, CommandKind::Flee, Variant::Encounter)
    }

    fn apply(&self, session: &mut BattleSession, env: &mut BattleEnv<'_>) -> Result<bool, ActionError> {
        let name = combatant(session, self.actor)?.name.clone();
        let escaped = env.rng.chance(env.config.flee_chance);
        if escaped {
            session.log.push(format!("{name} got away safely"));
            session.conclude(Conclusion {
                winner: None,
                reason: ConclusionReason::Fled(self.actor),
            });
        } else {
            session.log.push(format!("{name} failed to escape"));
        }
        Ok(escaped)
    }
}
