//! Advanced-class skills.
//!
//! Each advanced class has up to three slots in grid battles. Encounters only
//! offer slot 1, with a variant of the skill suited to fighting a monster.
//! Effects granted to the caster itself take hold immediately; effects granted
//! to anyone else wait for that combatant's next turn start.

use crate::action::target::{Reach, ally, combatant, enemy, within};
use crate::action::{ActionCost, ActionError, ActionTransition, CommandKind};
use crate::combat::{
    AttackContext, ElementalRule, HitReport, Multiplier, absorb, roll_damage, strike,
};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::state::{
    AdvancedClass, BattleSession, CombatantId, PendingPrompt, PromptPurpose, StatusEffectKind,
    Timing, Variant,
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillAction {
    pub actor: CombatantId,
    pub slot: u8,
    pub target: Option<CombatantId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillOutcome {
    Hits(Vec<HitReport>),
    Healed {
        target: CombatantId,
        amount: u32,
    },
    Shielded {
        target: CombatantId,
        amount: u32,
    },
    Granted {
        targets: Vec<CombatantId>,
        effect: StatusEffectKind,
    },
    /// A chance-based skill failed to trigger.
    Fizzled,
    RepositionPending {
        ally: CombatantId,
    },
}

// ============================================================================
// Skill book
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aim {
    Enemy,
    /// Any living combatant on the caster's side, the caster by default.
    Ally,
    /// A living teammate other than the caster.
    Teammate,
    /// The caster, whatever target was given.
    Caster,
    /// No single target.
    Field,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StrikeSpec {
    reach: Reach,
    crit_chance: u32,
    crit: Multiplier,
    otherwise: Multiplier,
    hp_cost: bool,
    strip_defense: bool,
    /// `+2 * target level` on elemental advantage.
    trick: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Effect {
    Strike(StrikeSpec),
    Blast {
        multiplier: Multiplier,
        splash_chance: u32,
    },
    Heal {
        percent: u32,
    },
    Grant {
        effect: StatusEffectKind,
        /// Always wait for the target's next turn, even on the caster.
        deferred: bool,
    },
    Gamble {
        chance: u32,
        effect: StatusEffectKind,
    },
    Rally {
        chance: u32,
        multiplier: Multiplier,
    },
    Fortify {
        per_level: u32,
    },
    Ward {
        per_level: u32,
    },
    Regen {
        turns: u32,
    },
    Gambit,
    Reposition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Skill {
    name: &'static str,
    aim: Aim,
    effect: Effect,
    team_only: bool,
}

const fn pct(percent: u32) -> Multiplier {
    Multiplier::from_percent(percent)
}

const fn hit(reach: Reach, crit_chance: u32, crit: u32, otherwise: u32) -> StrikeSpec {
    StrikeSpec {
        reach,
        crit_chance,
        crit: pct(crit),
        otherwise: pct(otherwise),
        hp_cost: false,
        strip_defense: false,
        trick: false,
    }
}

const fn skill(name: &'static str, aim: Aim, effect: Effect) -> Skill {
    Skill {
        name,
        aim,
        effect,
        team_only: false,
    }
}

const fn team_skill(name: &'static str, aim: Aim, effect: Effect) -> Skill {
    Skill {
        name,
        aim,
        effect,
        team_only: true,
    }
}

fn grid_skill(class: AdvancedClass, slot: u8) -> Option<Skill> {
    use AdvancedClass::*;
    use StatusEffectKind as Kind;

    let found = match (class, slot) {
        (Caster, 1) => skill("Arcane Bolt", Aim::Enemy, Effect::Strike(hit(Reach::Ranged, 50, 200, 150))),
        (Caster, 2) => skill(
            "Bind",
            Aim::Enemy,
            Effect::Grant { effect: Kind::MobilityModifier(-1), deferred: true },
        ),
        (Caster, 3) => skill(
            "Incantation",
            Aim::Caster,
            Effect::Gamble { chance: 10, effect: Kind::NextAttackMultiplier(pct(300)) },
        ),

        (Healer, 1) => skill("Mend", Aim::Ally, Effect::Heal { percent: 40 }),
        (Healer, 2) => skill(
            "Tailwind",
            Aim::Ally,
            Effect::Grant { effect: Kind::MobilityModifier(1), deferred: false },
        ),

        (Hunter, 1) => skill("Gut Strike", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 50, 200, 100))),
        (Hunter, 2) => skill(
            "Piercing Shot",
            Aim::Enemy,
            Effect::Strike(StrikeSpec {
                strip_defense: true,
                ..hit(Reach::Ranged, 0, 100, 100)
            }),
        ),
        (Hunter, 3) => skill(
            "Mark Prey",
            Aim::Caster,
            Effect::Grant { effect: Kind::GuaranteedCrit, deferred: false },
        ),

        (Joker, 1) => skill(
            "Trick Shot",
            Aim::Enemy,
            Effect::Strike(StrikeSpec {
                trick: true,
                ..hit(Reach::Ranged, 0, 100, 100)
            }),
        ),
        (Joker, 2) => skill("Read the Table", Aim::Enemy, Effect::Gambit),

        (Warrior, 1) => skill(
            "Reckless Blow",
            Aim::Enemy,
            Effect::Strike(StrikeSpec {
                hp_cost: true,
                ..hit(Reach::Melee, 80, 200, 120)
            }),
        ),
        (Warrior, 2) => skill(
            "Shackle",
            Aim::Enemy,
            Effect::Grant { effect: Kind::ActionPointModifier(-1), deferred: true },
        ),

        (Defender, 1) => skill("Bulwark", Aim::Ally, Effect::Fortify { per_level: 4 }),
        (Defender, 2) => skill(
            "Rouse",
            Aim::Ally,
            Effect::Grant { effect: Kind::ActionPointModifier(1), deferred: true },
        ),

        (Pioneer, 1) => skill(
            "Overload",
            Aim::Enemy,
            Effect::Strike(StrikeSpec {
                hp_cost: true,
                ..hit(Reach::Ranged, 80, 200, 150)
            }),
        ),
        (Pioneer, 2) => team_skill(
            "Mana Storm",
            Aim::Field,
            Effect::Blast { multiplier: pct(150), splash_chance: 10 },
        ),
        (Pioneer, 3) => skill("Breach", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 0, 150, 150))),

        (Granter, 1) => skill(
            "Empower",
            Aim::Ally,
            Effect::Grant { effect: Kind::NextAttackMultiplier(pct(150)), deferred: false },
        ),
        (Granter, 2) => skill("Renewal", Aim::Ally, Effect::Regen { turns: 2 }),

        (Commander, 1) => skill("Drill Strike", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 0, 150, 150))),
        (Commander, 2) => team_skill("Redeploy", Aim::Teammate, Effect::Reposition),
        (Commander, 3) => skill(
            "Rallying Cry",
            Aim::Field,
            Effect::Rally { chance: 10, multiplier: pct(200) },
        ),

        _ => return None,
    };
    Some(found)
}

fn encounter_skill(class: AdvancedClass, slot: u8) -> Option<Skill> {
    use AdvancedClass::*;

    if slot != 1 {
        return None;
    }
    let found = match class {
        Caster => skill("Arcane Bolt", Aim::Enemy, Effect::Strike(hit(Reach::Ranged, 50, 200, 150))),
        Healer => skill("Mend", Aim::Caster, Effect::Heal { percent: 40 }),
        Hunter => skill("Gut Strike", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 50, 200, 100))),
        Joker => skill(
            "Trick Shot",
            Aim::Enemy,
            Effect::Strike(StrikeSpec {
                trick: true,
                ..hit(Reach::Ranged, 0, 100, 100)
            }),
        ),
        Warrior => skill("Crushing Blow", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 0, 200, 200))),
        Defender => skill("Ward", Aim::Caster, Effect::Ward { per_level: 4 }),
        Pioneer => skill("Overload", Aim::Enemy, Effect::Strike(hit(Reach::Ranged, 80, 200, 150))),
        Granter => skill(
            "Empower",
            Aim::Caster,
            Effect::Grant {
                effect: StatusEffectKind::NextAttackMultiplier(pct(150)),
                deferred: true,
            },
        ),
        Commander => skill("Drill Strike", Aim::Enemy, Effect::Strike(hit(Reach::Melee, 0, 150, 150))),
    };
    Some(found)
}

// ============================================================================
// Transition
// ============================================================================

impl SkillAction {
    fn lookup(&self, session: &BattleSession) -> Result<Skill, ActionError> {
        let caster = combatant(session, self.actor)?;
        let class = caster
            .advanced_class()
            .ok_or(ActionError::NoAdvancedClass)?;
        let found = match session.variant {
            Variant::Encounter => encounter_skill(class, self.slot),
            Variant::Duel | Variant::Team => grid_skill(class, self.slot),
        };
        found.ok_or(ActionError::InvalidSkillSlot(self.slot))
    }

    fn aim(&self, session: &BattleSession, skill: &Skill) -> Result<CombatantId, ActionError> {
        match skill.aim {
            Aim::Enemy => enemy(session, self.actor, self.target),
            Aim::Ally => ally(session, self.actor, self.target, true),
            Aim::Teammate => ally(session, self.actor, self.target, false),
            Aim::Caster | Aim::Field => Ok(self.actor),
        }
    }

    /// Runs every check; returns the skill and its resolved target.
    fn resolve(&self, session: &BattleSession) -> Result<(Skill, CombatantId), ActionError> {
        let caster = combatant(session, self.actor)?;
        if caster.cooldown > 0 {
            return Err(ActionError::OnCooldown(caster.cooldown));
        }
        let skill = self.lookup(session)?;
        if skill.team_only && session.variant != Variant::Team {
            return Err(ActionError::WrongVariant {
                command: CommandKind::Skill,
                variant: session.variant,
            });
        }
        let target = self.aim(session, &skill)?;
        match skill.effect {
            Effect::Strike(spec) => within(session, self.actor, target, spec.reach)?,
            Effect::Reposition if session.grid.free_cells().next().is_none() => {
                return Err(ActionError::NoFreeCell);
            }
            _ => {}
        }
        Ok((skill, target))
    }
}

impl ActionTransition for SkillAction {
    type Result = SkillOutcome;

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn cost(&self, session: &BattleSession) -> ActionCost {
        if session.variant == Variant::Encounter {
            return ActionCost::EndsTurn;
        }
        match self.lookup(session) {
            Ok(Skill {
                effect: Effect::Reposition,
                ..
            }) => ActionCost::Deferred,
            _ => ActionCost::ActionPoint,
        }
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        self.resolve(session).map(|_| ())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &mut BattleEnv<'_>,
    ) -> Result<SkillOutcome, ActionError> {
        let (skill, target) = self.resolve(session)?;
        let outcome = match skill.effect {
            Effect::Strike(spec) => self.strike(session, env, &skill, target, spec)?,
            Effect::Blast {
                multiplier,
                splash_chance,
            } => self.blast(session, env, &skill, multiplier, splash_chance)?,
            Effect::Heal { percent } => {
                let patient = mutable(session, target)?;
                let amount = patient.heal(pct(percent).apply(patient.max_hp));
                let line = format!("{} recovers {amount} HP", patient.name);
                self.announce(session, &skill, line);
                SkillOutcome::Healed { target, amount }
            }
            Effect::Grant { effect, deferred } => {
                let timing = if target == self.actor && !deferred {
                    Timing::Immediate
                } else {
                    Timing::NextTurnStart
                };
                let bearer = mutable(session, target)?;
                bearer.effects.grant(effect, timing);
                let line = format!("{} is affected by {}", bearer.name, skill.name);
                self.announce(session, &skill, line);
                SkillOutcome::Granted {
                    targets: vec![target],
                    effect,
                }
            }
            Effect::Gamble { chance, effect } => {
                if env.rng.chance(chance) {
                    mutable(session, self.actor)?
                        .effects
                        .grant(effect, Timing::Immediate);
                    self.announce(session, &skill, "it works!".to_owned());
                    SkillOutcome::Granted {
                        targets: vec![self.actor],
                        effect,
                    }
                } else {
                    self.announce(session, &skill, "nothing happens".to_owned());
                    SkillOutcome::Fizzled
                }
            }
            Effect::Rally { chance, multiplier } => {
                if env.rng.chance(chance) {
                    let effect = StatusEffectKind::NextAttackMultiplier(multiplier);
                    let side = combatant(session, self.actor)?.side;
                    let mut targets = Vec::new();
                    for member in session
                        .combatants
                        .iter_mut()
                        .filter(|c| c.side == side && c.is_alive())
                    {
                        let timing = if member.id == self.actor {
                            Timing::Immediate
                        } else {
                            Timing::NextTurnStart
                        };
                        member.effects.grant(effect, timing);
                        targets.push(member.id);
                    }
                    self.announce(session, &skill, "the whole side is inspired".to_owned());
                    SkillOutcome::Granted { targets, effect }
                } else {
                    self.announce(session, &skill, "nobody listens".to_owned());
                    SkillOutcome::Fizzled
                }
            }
            Effect::Fortify { per_level } => {
                let amount = per_level.saturating_mul(combatant(session, self.actor)?.level);
                let guarded = mutable(session, target)?;
                guarded.defense = guarded.defense.saturating_add(amount);
                let line = format!("{} gains {amount} defense", guarded.name);
                self.announce(session, &skill, line);
                SkillOutcome::Shielded { target, amount }
            }
            Effect::Ward { per_level } => {
                let caster = mutable(session, self.actor)?;
                let amount = per_level.saturating_mul(caster.level);
                caster.ward = caster.ward.saturating_add(amount);
                self.announce(session, &skill, format!("a {amount} point ward rises"));
                SkillOutcome::Shielded {
                    target: self.actor,
                    amount,
                }
            }
            Effect::Regen { turns } => {
                let bearer = mutable(session, target)?;
                let effect = StatusEffectKind::HealOverTime {
                    amount: pct(20).apply(bearer.max_hp).max(1),
                    remaining: turns,
                };
                bearer.effects.grant(effect, Timing::NextTurnStart);
                let line = format!("{} will regenerate", bearer.name);
                self.announce(session, &skill, line);
                SkillOutcome::Granted {
                    targets: vec![target],
                    effect,
                }
            }
            Effect::Gambit => self.gambit(session, &skill, target)?,
            Effect::Reposition => {
                session.prompt = Some(PendingPrompt {
                    actor: self.actor,
                    purpose: PromptPurpose::Reposition { ally: target },
                    nonce: session.nonce,
                });
                let line = format!("choose a cell for {}", session.name_of(target));
                self.announce(session, &skill, line);
                SkillOutcome::RepositionPending { ally: target }
            }
        };

        if skill.effect != Effect::Reposition {
            mutable(session, self.actor)?.cooldown = BattleConfig::ABILITY_COOLDOWN;
        }
        Ok(outcome)
    }
}

impl SkillAction {
    fn announce(&self, session: &mut BattleSession, skill: &Skill, detail: String) {
        let line = format!("{} uses {}: {detail}", session.name_of(self.actor), skill.name);
        session.log.push(line);
    }

    fn strike(
        &self,
        session: &mut BattleSession,
        env: &mut BattleEnv<'_>,
        skill: &Skill,
        target: CombatantId,
        spec: StrikeSpec,
    ) -> Result<SkillOutcome, ActionError> {
        let (caster, victim) = session
            .pair_mut(self.actor, target)
            .ok_or(ActionError::InvalidTarget(target))?;

        let paid = if spec.hp_cost {
            caster.pay_hp(caster.level)
        } else {
            0
        };
        let mut ctx =
            AttackContext::skill(spec.reach.style(), spec.crit_chance, spec.crit, spec.otherwise);
        if spec.trick {
            let bonus = victim.level.saturating_mul(2);
            ctx = ctx.with_elemental(ElementalRule::FlatOnAdvantage(bonus));
        }
        let report = strike(caster, victim, &ctx, env.config, env.rng);
        if spec.strip_defense {
            victim.defense = 0;
        }

        let mut detail = format!("{} takes {}{report}", victim.name, report.dealt);
        if paid > 0 {
            detail.push_str(&format!(" at the cost of {paid} HP"));
        }
        if spec.strip_defense {
            detail.push_str(", defense shattered");
        }
        let fallen = report.defeated().then(|| format!("{} falls!", victim.name));

        self.announce(session, skill, detail);
        if let Some(line) = fallen {
            session.log.push(line);
        }
        Ok(SkillOutcome::Hits(vec![report]))
    }

    fn blast(
        &self,
        session: &mut BattleSession,
        env: &mut BattleEnv<'_>,
        skill: &Skill,
        multiplier: Multiplier,
        splash_chance: u32,
    ) -> Result<SkillOutcome, ActionError> {
        let ctx = AttackContext::flat(Reach::Ranged.style(), multiplier);
        let roll = roll_damage(mutable(session, self.actor)?, None, &ctx, env.config, env.rng);

        let mut victims = session.living_opponents(self.actor);
        let allies: Vec<CombatantId> = session
            .teammates(self.actor)
            .into_iter()
            .filter(|id| session.combatant(*id).is_some_and(|c| c.is_alive()))
            .collect();
        let mut splashed = None;
        if !allies.is_empty() && env.rng.chance(splash_chance) {
            let ally = allies[env.rng.pick(allies.len())];
            victims.push(ally);
            splashed = Some(ally);
        }

        let mut hits = Vec::with_capacity(victims.len());
        for id in victims {
            let victim = mutable(session, id)?;
            let mitigation = absorb(victim, roll.raw, env.config.damage_floor);
            hits.push(HitReport {
                target: id,
                roll,
                absorbed: mitigation.absorbed,
                dealt: mitigation.dealt,
                remaining_hp: victim.current_hp,
            });
        }

        let summary: Vec<String> = hits
            .iter()
            .map(|hit| format!("{} -{}", session.name_of(hit.target), hit.dealt))
            .collect();
        self.announce(session, skill, summary.join(", "));
        if let Some(ally) = splashed {
            let line = format!("{} is caught in the storm", session.name_of(ally));
            session.log.push(line);
        }
        for hit in hits.iter().filter(|hit| hit.defeated()) {
            let line = format!("{} falls!", session.name_of(hit.target));
            session.log.push(line);
        }
        Ok(SkillOutcome::Hits(hits))
    }

    /// Joker's read: shield up when the target's attribute beats ours,
    /// otherwise double our next elemental swing.
    fn gambit(
        &self,
        session: &mut BattleSession,
        skill: &Skill,
        target: CombatantId,
    ) -> Result<SkillOutcome, ActionError> {
        let threat = combatant(session, target)?.attribute;
        let caster = mutable(session, self.actor)?;
        let outcome = match (threat, caster.attribute) {
            (Some(theirs), Some(ours)) if theirs.beats(ours) => {
                let amount = caster.level.saturating_mul(2);
                caster.defense = caster.defense.saturating_add(amount);
                SkillOutcome::Shielded {
                    target: self.actor,
                    amount,
                }
            }
            _ => {
                let effect = StatusEffectKind::AttributeMultiplier(pct(200));
                caster.effects.grant(effect, Timing::Immediate);
                SkillOutcome::Granted {
                    targets: vec![self.actor],
                    effect,
                }
            }
        };
        let detail = match &outcome {
            SkillOutcome::Shielded { amount, .. } => format!("braces for {amount} defense"),
            _ => "the odds double".to_owned(),
        };
        self.announce(session, skill, detail);
        Ok(outcome)
    }
}

fn mutable(
    session: &mut BattleSession,
    id: CombatantId,
) -> Result<&mut crate::state::Combatant, ActionError> {
    session
        .combatant_mut(id)
        .ok_or(ActionError::UnknownCombatant(id))
}
