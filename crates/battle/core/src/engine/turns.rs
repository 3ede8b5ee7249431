use crate::action::ActionCost;
use crate::ai::{self, MonsterReport};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::state::{CombatantId, Conclusion, ConclusionReason, PendingPrompt, Side};

use super::{BattleEngine, TurnProgress};

/// Turn lifecycle methods for BattleEngine.
impl<'a> BattleEngine<'a> {
    /// Returns the combatant whose turn it is.
    pub fn current_actor(&self) -> CombatantId {
        self.session.turn.current
    }

    /// Concludes the session when a whole side is down. Side A is checked
    /// first, which only matters if both fell to the same hit.
    pub fn check_victory(&mut self) -> Option<Conclusion> {
        if !self.session.is_active() {
            return self.session.conclusion();
        }
        let loser = [Side::A, Side::B]
            .into_iter()
            .find(|side| self.session.side_defeated(*side))?;
        let conclusion = Conclusion {
            winner: Some(loser.opponent()),
            reason: ConclusionReason::Defeat,
        };
        self.session.conclude(conclusion);
        Some(conclusion)
    }

    /// Forces the end of the battle because the actor of turn `serial` never
    /// finished it. The other side wins.
    ///
    /// Returns `None`, and changes nothing, when the battle is already over or
    /// the turn has moved on since the timer was armed.
    pub fn time_out(&mut self, serial: u64) -> Option<Conclusion> {
        if !self.session.is_active() || self.session.turn.serial != serial {
            return None;
        }
        let idle = self.session.turn.current;
        let side = self.session.combatant(idle)?.side;
        let line = format!("{} ran out of time", self.session.name_of(idle));
        self.session.log.push(line);

        let conclusion = Conclusion {
            winner: Some(side.opponent()),
            reason: ConclusionReason::Timeout(idle),
        };
        self.session.conclude(conclusion);
        Some(conclusion)
    }

    /// Cancels the pending cell prompt opened at `nonce`. Nothing is charged
    /// and the turn goes on. Returns the cancelled prompt.
    pub fn expire_prompt(&mut self, nonce: u64) -> Option<PendingPrompt> {
        let prompt = self.session.prompt.filter(|p| p.nonce == nonce)?;
        self.session.prompt = None;
        let line = format!(
            "{} hesitated, the cell choice lapsed",
            self.session.name_of(prompt.actor)
        );
        self.session.log.push(line);
        Some(prompt)
    }

    /// Victory check, then charges `cost` and advances the turn when it is
    /// spent.
    pub(super) fn settle(
        &mut self,
        cost: ActionCost,
        env: &mut BattleEnv<'_>,
        monster_turns: &mut Vec<MonsterReport>,
    ) -> TurnProgress {
        if let Some(conclusion) = self.check_victory() {
            return TurnProgress::Concluded(conclusion);
        }
        match cost {
            ActionCost::Deferred => match self.session.prompt {
                Some(prompt) => TurnProgress::AwaitingCell { prompt },
                None => TurnProgress::Continues {
                    actions_left: self.session.turn.actions_left,
                },
            },
            ActionCost::EndsTurn => self.advance(env, monster_turns),
            ActionCost::ActionPoint => {
                self.session.turn.actions_left -= 1;
                if self.session.turn.actions_left > 0 {
                    TurnProgress::Continues {
                        actions_left: self.session.turn.actions_left,
                    }
                } else {
                    self.advance(env, monster_turns)
                }
            }
        }
    }

    /// Hands the turn to the next living combatant in rotation order. Fallen
    /// combatants are passed over without touching their state. Monster turns
    /// resolve on the spot.
    fn advance(
        &mut self,
        env: &mut BattleEnv<'_>,
        monster_turns: &mut Vec<MonsterReport>,
    ) -> TurnProgress {
        // Bounded by the rotation; a monster turn can only repeat if it is the
        // sole living combatant, which the victory check rules out.
        for _ in 0..=self.session.turn.order.len() {
            let next = self.session.turn.upcoming().find(|(_, id)| {
                self.session
                    .combatant(*id)
                    .is_some_and(|c| c.is_alive())
            });
            let Some((index, id)) = next else {
                break;
            };
            self.session.turn.point_at(index);

            if id.is_monster() {
                if let Some(report) = ai::take_turn(self.session, id, env.config, env.rng) {
                    monster_turns.push(report);
                }
                if let Some(conclusion) = self.check_victory() {
                    return TurnProgress::Concluded(conclusion);
                }
                continue;
            }

            self.start_turn(id);
            return TurnProgress::Advanced {
                actor: id,
                serial: self.session.turn.serial,
            };
        }

        match self.check_victory() {
            Some(conclusion) => TurnProgress::Concluded(conclusion),
            None => TurnProgress::Continues {
                actions_left: self.session.turn.actions_left,
            },
        }
    }

    /// Cooldown tick, status effects, fresh action budget.
    fn start_turn(&mut self, id: CombatantId) {
        let session = &mut *self.session;
        session.turn.serial += 1;

        let Some(actor) = session.combatant_mut(id) else {
            return;
        };
        actor.cooldown = actor.cooldown.saturating_sub(1);
        let effects = actor.effects.begin_turn();
        let healed = actor.heal(effects.heal);
        let budget = (BattleConfig::BASE_ACTION_POINTS + effects.action_point_modifier).max(1);
        let name = actor.name.clone();

        session.turn.actions_left = budget;
        if healed > 0 {
            session.log.push(format!("{name} regenerates {healed} HP"));
        }
        session.log.push(format!("{name}'s turn"));
    }
}
