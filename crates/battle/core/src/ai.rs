//! Monster behavior for encounters.
//!
//! Each monster turn draws one intent from the configured weights and resolves
//! it immediately against the hunter. There is no lookahead: a monster never
//! reasons about the player's buffs or its own HP.

use strum::Display;

use crate::config::{BattleConfig, MonsterPolicyWeights};
use crate::env::RngOracle;
use crate::state::{BattleSession, Combatant, CombatantId, Role};

/// Action a monster takes on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterIntent {
    Strike,
    Guard,
    Heavy,
}

impl MonsterIntent {
    /// Draws an intent with probability proportional to its weight.
    pub fn choose(weights: &MonsterPolicyWeights, rng: &mut dyn RngOracle) -> Self {
        let total = weights.total();
        if total == 0 {
            return MonsterIntent::Strike;
        }
        let roll = rng.range(1, total);
        if roll <= weights.strike {
            MonsterIntent::Strike
        } else if roll <= weights.strike + weights.guard {
            MonsterIntent::Guard
        } else {
            MonsterIntent::Heavy
        }
    }
}

/// What one monster turn did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterReport {
    pub monster: CombatantId,
    pub intent: MonsterIntent,
    pub target: Option<CombatantId>,
    /// Damage before the target's ward.
    pub raw: u32,
    pub absorbed: u32,
    pub dealt: u32,
    /// Shield gained by guarding.
    pub shield: u32,
}

/// Runs the turn of monster `id` against the first living player.
///
/// Returns `None` when `id` is not a living monster or nothing is left to hit.
pub fn take_turn(
    session: &mut BattleSession,
    id: CombatantId,
    config: &BattleConfig,
    rng: &mut dyn RngOracle,
) -> Option<MonsterReport> {
    let monster = session.combatant(id).filter(|c| c.is_alive())?;
    let Role::Monster { power, .. } = monster.role else {
        return None;
    };
    let level = monster.level;
    let target = session.living_opponents(id).first().copied()?;

    let intent = MonsterIntent::choose(&config.monster_policy, rng);
    let mut report = MonsterReport {
        monster: id,
        intent,
        target: None,
        raw: 0,
        absorbed: 0,
        dealt: 0,
        shield: 0,
    };

    if intent == MonsterIntent::Guard {
        let monster = session.combatant_mut(id)?;
        let shield = monster.percent_of_max_hp(config.monster_shield_percent);
        monster.defense += shield;
        report.shield = shield;
        let line = format!("{} braces itself (+{shield} defense)", monster.name);
        session.log.push(line);
        return Some(report);
    }

    let mut raw = claw(power, level, rng);
    if intent == MonsterIntent::Heavy {
        raw *= 2;
    }
    let victim = session.combatant_mut(target)?;
    let (absorbed, dealt) = land(victim, raw, config.damage_floor);
    report.target = Some(target);
    report.raw = raw;
    report.absorbed = absorbed;
    report.dealt = dealt;

    let verb = match intent {
        MonsterIntent::Heavy => "smashes",
        _ => "hits",
    };
    let mut line = format!(
        "{} {verb} {} for {dealt}",
        session.name_of(id),
        session.name_of(target)
    );
    if absorbed > 0 {
        line.push_str(&format!(" (ward blocked {absorbed})"));
    }
    session.log.push(line);
    if session.combatant(target).is_some_and(|c| !c.is_alive()) {
        let line = format!("{} falls!", session.name_of(target));
        session.log.push(line);
    }
    Some(report)
}

/// `power +/- rand(0, level)`, at least 1.
fn claw(power: u32, level: u32, rng: &mut dyn RngOracle) -> u32 {
    let spread = i64::from(rng.range(0, level.saturating_mul(2))) - i64::from(level);
    u32::try_from((i64::from(power) + spread).max(1)).unwrap_or(u32::MAX)
}

/// A ward soaks up to its whole value from the hit and is then gone. The
/// damage floor only applies to hits no ward touched.
fn land(victim: &mut Combatant, raw: u32, floor: u32) -> (u32, u32) {
    if victim.ward > 0 {
        let absorbed = raw.min(victim.ward);
        victim.ward = 0;
        let dealt = victim.take_damage(raw - absorbed);
        return (absorbed, dealt);
    }
    let dealt = raw.max(floor);
    victim.take_damage(dealt);
    (0, dealt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ReplayRng;

    #[test]
    fn weights_partition_the_roll() {
        let weights = MonsterPolicyWeights::default();
        // range(1, 100) maps a raw draw v to 1 + v % 100.
        let cases = [
            (0, MonsterIntent::Strike),
            (59, MonsterIntent::Strike),
            (60, MonsterIntent::Guard),
            (89, MonsterIntent::Guard),
            (90, MonsterIntent::Heavy),
            (99, MonsterIntent::Heavy),
        ];
        for (draw, expected) in cases {
            let mut rng = ReplayRng::constant(draw);
            assert_eq!(MonsterIntent::choose(&weights, &mut rng), expected, "draw {draw}");
        }
    }

    #[test]
    fn claw_spreads_around_power() {
        // range(0, 4) with draw 0 gives 0: power - level.
        let mut low = ReplayRng::constant(0);
        assert_eq!(claw(8, 2, &mut low), 6);
        let mut high = ReplayRng::constant(4);
        assert_eq!(claw(8, 2, &mut high), 10);
        let mut floor = ReplayRng::constant(0);
        assert_eq!(claw(1, 5, &mut floor), 1);
    }
}
