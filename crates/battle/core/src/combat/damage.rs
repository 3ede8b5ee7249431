//! Damage pipeline.
//!
//! 1. Base: primary stat + gear bonus + `rand(0, secondary)`.
//! 2. Multiplier, first match wins: pending next-attack multiplier, a stacked
//!    melee charge, a critical roll, then the context's fallback.
//! 3. Elemental swing on advantage or disadvantage.
//! 4. Defense absorbs point for point and is consumed; whatever gets through
//!    is at least the configured floor.
//!
//! Buffs are only spent by basic attacks (`consume_buffs`).

use core::fmt;

use crate::combat::{AttackStyle, Attribute, Matchup, Multiplier};
use crate::config::BattleConfig;
use crate::env::RngOracle;
use crate::state::{Combatant, CombatantId, StatusEffectKind, StatusTag};

/// How elemental attributes affect an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementalRule {
    /// `+/- rand(0, factor * attacker level)`, scaled by an attribute multiplier.
    Standard,
    /// Flat bonus on advantage, nothing on disadvantage.
    FlatOnAdvantage(u32),
    Ignore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackContext {
    pub style: AttackStyle,
    pub crit_chance: u32,
    pub crit_multiplier: Multiplier,
    /// Used when nothing else applies.
    pub fallback: Multiplier,
    pub elemental: ElementalRule,
    pub consume_buffs: bool,
}

impl AttackContext {
    /// A basic attack: spends buffs, rolls the global crit chance and falls
    /// back to the class baseline.
    pub fn basic(style: AttackStyle, baseline: Multiplier, config: &BattleConfig) -> Self {
        Self {
            style,
            crit_chance: config.crit_chance,
            crit_multiplier: config.crit_multiplier,
            fallback: baseline,
            elemental: ElementalRule::Standard,
            consume_buffs: true,
        }
    }

    /// A skill strike with its own crit odds. Ignores buffs and elements.
    pub fn skill(
        style: AttackStyle,
        crit_chance: u32,
        crit_multiplier: Multiplier,
        fallback: Multiplier,
    ) -> Self {
        Self {
            style,
            crit_chance,
            crit_multiplier,
            fallback,
            elemental: ElementalRule::Ignore,
            consume_buffs: false,
        }
    }

    /// A skill strike with a fixed multiplier.
    pub fn flat(style: AttackStyle, multiplier: Multiplier) -> Self {
        Self::skill(style, 0, multiplier, multiplier)
    }

    pub fn with_elemental(mut self, rule: ElementalRule) -> Self {
        self.elemental = rule;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MultiplierSource {
    Empowered,
    Charged,
    Critical,
    Normal,
}

/// Attacker-side result before the defender's mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub base: u32,
    pub multiplier: Multiplier,
    pub source: MultiplierSource,
    pub matchup: Matchup,
    /// Signed elemental adjustment actually applied.
    pub swing: i64,
    pub raw: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mitigation {
    pub absorbed: u32,
    pub dealt: u32,
}

/// Everything that happened in one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub target: CombatantId,
    pub roll: DamageRoll,
    pub absorbed: u32,
    pub dealt: u32,
    pub remaining_hp: u32,
}

impl HitReport {
    pub fn defeated(&self) -> bool {
        self.remaining_hp == 0
    }
}

impl fmt::Display for HitReport {
    /// Parenthesised notes, e.g. ` (critical x2.0, advantage +1, blocked 3)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut notes = Vec::new();
        match self.roll.source {
            MultiplierSource::Empowered => notes.push(format!("empowered {}", self.roll.multiplier)),
            MultiplierSource::Charged => notes.push(format!("charged {}", self.roll.multiplier)),
            MultiplierSource::Critical => notes.push(format!("critical {}", self.roll.multiplier)),
            MultiplierSource::Normal => {}
        }
        match self.roll.matchup {
            Matchup::Advantage => notes.push(format!("advantage +{}", self.roll.swing)),
            Matchup::Disadvantage => notes.push(format!("disadvantage {}", self.roll.swing)),
            Matchup::Neutral => {}
        }
        if self.absorbed > 0 {
            notes.push(format!("blocked {}", self.absorbed));
        }
        if notes.is_empty() {
            Ok(())
        } else {
            write!(f, " ({})", notes.join(", "))
        }
    }
}

/// Rolls damage for `attacker` against a defender with `defender_attribute`.
///
/// Spends whichever attacker buff supplied the multiplier.
pub fn roll_damage(
    attacker: &mut Combatant,
    defender_attribute: Option<Attribute>,
    ctx: &AttackContext,
    config: &BattleConfig,
    rng: &mut dyn RngOracle,
) -> DamageRoll {
    let (primary, secondary) = attacker.stats.for_style(ctx.style);
    let base = primary
        .saturating_add(attacker.stats.gear_bonus)
        .saturating_add(rng.range(0, secondary));

    let (multiplier, source) = select_multiplier(attacker, ctx, rng);
    let scaled = i64::from(multiplier.apply(base));

    let matchup = match ctx.elemental {
        ElementalRule::Ignore => Matchup::Neutral,
        _ => Attribute::matchup(attacker.attribute, defender_attribute),
    };
    let swing = match (ctx.elemental, matchup) {
        (ElementalRule::Standard, Matchup::Advantage | Matchup::Disadvantage) => {
            let mut amount =
                i64::from(rng.range(0, config.elemental_factor.saturating_mul(attacker.level)));
            if let Some(StatusEffectKind::AttributeMultiplier(scale)) =
                attacker.effects.consume(StatusTag::AttributeMultiplier)
            {
                amount = i64::from(scale.apply(u32::try_from(amount).unwrap_or(u32::MAX)));
            }
            if matchup == Matchup::Advantage {
                amount
            } else {
                -amount
            }
        }
        (ElementalRule::FlatOnAdvantage(bonus), Matchup::Advantage) => i64::from(bonus),
        _ => 0,
    };

    let raw = u32::try_from((scaled + swing).max(0)).unwrap_or(u32::MAX);
    DamageRoll {
        base,
        multiplier,
        source,
        matchup,
        swing,
        raw,
    }
}

fn select_multiplier(
    attacker: &mut Combatant,
    ctx: &AttackContext,
    rng: &mut dyn RngOracle,
) -> (Multiplier, MultiplierSource) {
    if ctx.consume_buffs {
        if let Some(StatusEffectKind::NextAttackMultiplier(m)) =
            attacker.effects.consume(StatusTag::NextAttackMultiplier)
        {
            return (m, MultiplierSource::Empowered);
        }
        if ctx.style == AttackStyle::Melee && attacker.charges > 0 {
            attacker.charges -= 1;
            return (Multiplier::from_percent(200), MultiplierSource::Charged);
        }
        if attacker
            .effects
            .consume(StatusTag::GuaranteedCrit)
            .is_some()
        {
            return (ctx.crit_multiplier, MultiplierSource::Critical);
        }
    }
    if rng.chance(ctx.crit_chance) {
        return (ctx.crit_multiplier, MultiplierSource::Critical);
    }
    (ctx.fallback, MultiplierSource::Normal)
}

/// Applies `raw` damage to `target` through its defense pool.
pub fn absorb(target: &mut Combatant, raw: u32, floor: u32) -> Mitigation {
    let absorbed = raw.min(target.defense);
    target.defense -= absorbed;
    let dealt = (raw - absorbed).max(floor);
    target.take_damage(dealt);
    Mitigation { absorbed, dealt }
}

/// Rolls and applies one hit.
pub fn strike(
    attacker: &mut Combatant,
    target: &mut Combatant,
    ctx: &AttackContext,
    config: &BattleConfig,
    rng: &mut dyn RngOracle,
) -> HitReport {
    let roll = roll_damage(attacker, target.attribute, ctx, config, rng);
    let mitigation = absorb(target, roll.raw, config.damage_floor);
    HitReport {
        target: target.id,
        roll,
        absorbed: mitigation.absorbed,
        dealt: mitigation.dealt,
        remaining_hp: target.current_hp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PlayerProfile, ReplayRng};
    use crate::state::{BaseClass, Side, Timing};

    /// Raw 99 never passes a percentage check below 100.
    const NO_CRIT: u32 = 99;

    fn fighter(id: u64, class: BaseClass, mental: u32, physical: u32) -> Combatant {
        let profile = PlayerProfile::new(format!("F{id}"), class).with_stats(mental, physical);
        Combatant::from_profile(CombatantId(id), &profile, Side::A, &BattleConfig::default())
    }

    #[test]
    fn defense_absorbs_and_is_consumed() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Spellblade, 0, 8);
        let mut target = fighter(2, BaseClass::Swordsman, 0, 20);
        target.defense = 5;

        let ctx = AttackContext::basic(AttackStyle::Melee, BaseClass::Spellblade.baseline(), &config);
        let mut rng = ReplayRng::constant(NO_CRIT);
        let report = strike(&mut attacker, &mut target, &ctx, &config, &mut rng);

        assert_eq!(report.roll.raw, 8);
        assert_eq!(report.absorbed, 5);
        assert_eq!(report.dealt, 3);
        assert_eq!(target.defense, 0);
        assert_eq!(target.current_hp, target.max_hp - 3);
    }

    #[test]
    fn floor_applies_after_full_absorption() {
        let mut target = fighter(2, BaseClass::Swordsman, 0, 0);
        target.defense = 50;
        let mitigation = absorb(&mut target, 8, 1);
        assert_eq!(mitigation, Mitigation { absorbed: 8, dealt: 1 });
        assert_eq!(target.defense, 42);
        assert_eq!(target.current_hp, 9);
    }

    #[test]
    fn multiplier_priority() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Swordsman, 0, 10);
        attacker.charges = 1;
        attacker.effects.grant(
            StatusEffectKind::NextAttackMultiplier(Multiplier::from_percent(300)),
            Timing::Immediate,
        );
        let ctx = AttackContext::basic(AttackStyle::Melee, BaseClass::Swordsman.baseline(), &config);
        let mut rng = ReplayRng::constant(NO_CRIT);

        let first = roll_damage(&mut attacker, None, &ctx, &config, &mut rng);
        assert_eq!(first.source, MultiplierSource::Empowered);
        assert_eq!(first.raw, 30);
        assert_eq!(attacker.charges, 1);

        let second = roll_damage(&mut attacker, None, &ctx, &config, &mut rng);
        assert_eq!(second.source, MultiplierSource::Charged);
        assert_eq!(attacker.charges, 0);

        let third = roll_damage(&mut attacker, None, &ctx, &config, &mut rng);
        assert_eq!(third.source, MultiplierSource::Normal);
        assert_eq!(third.raw, 12);
    }

    #[test]
    fn charges_are_melee_only() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Spellblade, 6, 0);
        attacker.charges = 2;
        let ctx = AttackContext::basic(AttackStyle::Ranged, BaseClass::Spellblade.baseline(), &config);
        let roll = roll_damage(&mut attacker, None, &ctx, &config, &mut ReplayRng::constant(NO_CRIT));
        assert_eq!(roll.source, MultiplierSource::Normal);
        assert_eq!(attacker.charges, 2);
    }

    #[test]
    fn crit_roll_uses_context_chance() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Spellblade, 0, 5);
        let ctx = AttackContext::basic(AttackStyle::Melee, Multiplier::ONE, &config);
        // d100 roll of 1 is a crit at 10%.
        let roll = roll_damage(&mut attacker, None, &ctx, &config, &mut ReplayRng::constant(0));
        assert_eq!(roll.source, MultiplierSource::Critical);
        assert_eq!(roll.raw, 10);
    }

    #[test]
    fn elemental_swing_both_ways() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Spellblade, 0, 10);
        attacker.attribute = Some(Attribute::Wit);
        attacker.level = 3;
        let ctx = AttackContext::basic(AttackStyle::Melee, Multiplier::ONE, &config);

        // Draws: secondary (0..=0) uses none; crit d100 -> 100; swing 0..=3 -> 2.
        let mut rng = ReplayRng::new([99, 2], NO_CRIT);
        let up = roll_damage(&mut attacker, Some(Attribute::Gut), &ctx, &config, &mut rng);
        assert_eq!((up.matchup, up.swing, up.raw), (Matchup::Advantage, 2, 12));

        let mut rng = ReplayRng::new([99, 2], NO_CRIT);
        let down = roll_damage(&mut attacker, Some(Attribute::Heart), &ctx, &config, &mut rng);
        assert_eq!((down.matchup, down.swing, down.raw), (Matchup::Disadvantage, -2, 8));
    }

    #[test]
    fn huge_stats_saturate_instead_of_wrapping() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Swordsman, u32::MAX, u32::MAX);
        attacker.stats.gear_bonus = u32::MAX;
        attacker.attribute = Some(Attribute::Wit);
        let ctx = AttackContext::basic(AttackStyle::Melee, Multiplier::from_percent(200), &config);
        let roll = roll_damage(
            &mut attacker,
            Some(Attribute::Gut),
            &ctx,
            &config,
            &mut ReplayRng::constant(NO_CRIT),
        );
        assert_eq!(roll.base, u32::MAX);
        assert_eq!(roll.raw, u32::MAX);
    }

    #[test]
    fn skills_leave_buffs_alone() {
        let config = BattleConfig::default();
        let mut attacker = fighter(1, BaseClass::Swordsman, 0, 4);
        attacker.effects.grant(StatusEffectKind::GuaranteedCrit, Timing::Immediate);
        let ctx = AttackContext::flat(AttackStyle::Melee, Multiplier::from_percent(150));
        let roll = roll_damage(&mut attacker, None, &ctx, &config, &mut ReplayRng::constant(NO_CRIT));
        assert_eq!(roll.raw, 6);
        assert!(attacker.effects.has(StatusTag::GuaranteedCrit));
    }
}
