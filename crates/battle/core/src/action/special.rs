use crate::action::target::{combatant, reject_in};
use crate::action::{ActionCost, ActionError, ActionTransition, CommandKind};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::state::{BaseClass, BattleSession, CombatantId, PendingPrompt, PromptPurpose, Variant};

/// Base-class innate ability. Grid battles only.
///
/// - Mage, Teleport: opens a cell prompt; paid when the cell is chosen.
/// - Spellblade, Infuse: one more melee charge.
/// - Swordsman, Blood Oath: pays `level` HP, charges set to 2.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialAction {
    pub actor: CombatantId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialOutcome {
    TeleportPending,
    Infused { charges: u32 },
    BloodOath { paid: u32 },
}

impl SpecialAction {
    fn class(&self, session: &BattleSession) -> Result<BaseClass, ActionError> {
        combatant(session, self.actor)?
            .base_class()
            .ok_or(ActionError::UnknownCombatant(self.actor))
    }
}

impl ActionTransition for SpecialAction {
    type Result = SpecialOutcome;

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn cost(&self, session: &BattleSession) -> ActionCost {
        match self.class(session) {
            Ok(BaseClass::Mage) => ActionCost::Deferred,
            _ => ActionCost::ActionPoint,
        }
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        reject_in(session, CommandKind::Special, Variant::Encounter)?;
        let caster = combatant(session, self.actor)?;
        if caster.cooldown > 0 {
            return Err(ActionError::OnCooldown(caster.cooldown));
        }
        if self.class(session)? == BaseClass::Mage && session.grid.free_cells().next().is_none() {
            return Err(ActionError::NoFreeCell);
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        _env: &mut BattleEnv<'_>,
    ) -> Result<SpecialOutcome, ActionError> {
        let class = self.class(session)?;
        let nonce = session.nonce;
        let caster = session
            .combatant_mut(self.actor)
            .ok_or(ActionError::UnknownCombatant(self.actor))?;

        let (outcome, line) = match class {
            BaseClass::Mage => (
                SpecialOutcome::TeleportPending,
                format!("{} gathers mana to teleport, choose a cell", caster.name),
            ),
            BaseClass::Spellblade => {
                caster.charges += 1;
                caster.cooldown = BattleConfig::ABILITY_COOLDOWN;
                (
                    SpecialOutcome::Infused {
                        charges: caster.charges,
                    },
                    format!("{} infuses the blade ({} charge(s))", caster.name, caster.charges),
                )
            }
            BaseClass::Swordsman => {
                let paid = caster.pay_hp(caster.level);
                caster.charges = 2;
                caster.cooldown = BattleConfig::ABILITY_COOLDOWN;
                (
                    SpecialOutcome::BloodOath { paid },
                    format!("{} swears a blood oath, paying {paid} HP", caster.name),
                )
            }
        };

        if class == BaseClass::Mage {
            session.prompt = Some(PendingPrompt {
                actor: self.actor,
                purpose: PromptPurpose::Teleport,
                nonce,
            });
        }
        session.log.push(line);
        Ok(outcome)
    }
}
