use crate::action::target::{combatant, distance, enemy};
use crate::action::{ActionCost, ActionError, ActionTransition};
use crate::combat::{AttackContext, AttackStyle, HitReport, Multiplier, strike};
use crate::env::BattleEnv;
use crate::state::{BattleSession, Combatant, CombatantId, Variant};

/// Basic attack. In grid battles the attacker's class decides reach and
/// style; in encounters range is not checked and the attack ends the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub actor: CombatantId,
    pub target: Option<CombatantId>,
}

impl AttackAction {
    fn style(&self, session: &BattleSession, target: CombatantId) -> Result<AttackStyle, ActionError> {
        let attacker = combatant(session, self.actor)?;
        if session.variant == Variant::Encounter {
            return Ok(attacker.encounter_style());
        }
        let distance = distance(session, self.actor, target)?;
        attacker
            .base_class()
            .and_then(|class| class.style_at(distance))
            .ok_or(ActionError::OutOfRange { distance })
    }
}

fn baseline(attacker: &Combatant) -> Multiplier {
    attacker
        .base_class()
        .map_or(Multiplier::ONE, |class| class.baseline())
}

impl ActionTransition for AttackAction {
    type Result = HitReport;

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn cost(&self, session: &BattleSession) -> ActionCost {
        match session.variant {
            Variant::Encounter => ActionCost::EndsTurn,
            Variant::Duel | Variant::Team => ActionCost::ActionPoint,
        }
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        let target = enemy(session, self.actor, self.target)?;
        self.style(session, target)?;
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &mut BattleEnv<'_>,
    ) -> Result<HitReport, ActionError> {
        let target = enemy(session, self.actor, self.target)?;
        let style = self.style(session, target)?;

        let (attacker, defender) = session
            .pair_mut(self.actor, target)
            .ok_or(ActionError::InvalidTarget(target))?;
        let ctx = AttackContext::basic(style, baseline(attacker), env.config);
        let report = strike(attacker, defender, &ctx, env.config, env.rng);
        let line = format!(
            "{} hits {} for {}{report}",
            attacker.name, defender.name, report.dealt
        );
        let fallen = report.defeated().then(|| format!("{} falls!", defender.name));

        session.log.push(line);
        if let Some(line) = fallen {
            session.log.push(line);
        }
        Ok(report)
    }
}
