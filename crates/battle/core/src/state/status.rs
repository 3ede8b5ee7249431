//! Status effects attached to a combatant.
//!
//! # Lifecycle
//!
//! An effect is granted either `Immediate` (active right away) or for the
//! bearer's next turn start (`Pending` until then). At each turn start of the
//! bearer, [`StatusEffects::begin_turn`] runs in this order:
//!
//! 1. Active one-shot effects left over from the previous turn are dropped.
//! 2. Pending effects become active.
//! 3. Heal-over-time ticks and loses one turn of duration.
//!
//! One-shot effects therefore last at most one of the bearer's turns unless
//! consumed earlier. Heal-over-time is the only persistent kind and lives
//! until its own counter runs out.

use arrayvec::ArrayVec;
use strum::EnumDiscriminants;

use crate::combat::Multiplier;
use crate::config::BattleConfig;

/// Status effects carried by one combatant. At most one instance per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub phase: EffectPhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(StatusTag), derive(Hash))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    /// Added to class mobility (floored at 1).
    MobilityModifier(i32),

    /// Added to the action budget granted at turn start.
    ActionPointModifier(i32),

    /// Heals `amount` at each of the next `remaining` turn starts.
    HealOverTime { amount: u32, remaining: u32 },

    /// Replaces the multiplier of the next basic attack.
    NextAttackMultiplier(Multiplier),

    /// Next basic attack is a critical hit.
    GuaranteedCrit,

    /// Scales the elemental swing of the next basic attack.
    AttributeMultiplier(Multiplier),
}

impl StatusEffectKind {
    pub fn tag(&self) -> StatusTag {
        self.into()
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, StatusEffectKind::HealOverTime { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPhase {
    /// Waiting for the bearer's next turn start.
    Pending,
    Active,
}

/// When a newly granted effect takes hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timing {
    Immediate,
    NextTurnStart,
}

/// What the turn controller must apply after [`StatusEffects::begin_turn`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnStartEffects {
    pub heal: u32,
    pub action_point_modifier: i32,
    pub heal_expired: bool,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Grants an effect, replacing any existing effect of the same kind.
    ///
    /// An active one-shot effect that has not been used yet wins over a
    /// pending grant of its kind; the pending one is dropped.
    pub fn grant(&mut self, kind: StatusEffectKind, timing: Timing) {
        let phase = match timing {
            Timing::Immediate => EffectPhase::Active,
            Timing::NextTurnStart => EffectPhase::Pending,
        };
        let effect = StatusEffect { kind, phase };

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind.tag() == kind.tag()) {
            let unused_one_shot =
                existing.phase == EffectPhase::Active && !existing.kind.is_persistent();
            if !(unused_one_shot && effect.phase == EffectPhase::Pending) {
                *existing = effect;
            }
            return;
        }
        // One slot per kind, so capacity is never exceeded.
        if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    pub fn remove(&mut self, tag: StatusTag) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind.tag() == tag)?;
        Some(self.effects.remove(index))
    }

    pub fn get(&self, tag: StatusTag) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind.tag() == tag)
    }

    /// Active effect of the given kind, if any.
    pub fn active(&self, tag: StatusTag) -> Option<StatusEffectKind> {
        self.get(tag)
            .filter(|e| e.phase == EffectPhase::Active)
            .map(|e| e.kind)
    }

    pub fn has(&self, tag: StatusTag) -> bool {
        self.active(tag).is_some()
    }

    /// Removes and returns an active effect.
    pub fn consume(&mut self, tag: StatusTag) -> Option<StatusEffectKind> {
        let kind = self.active(tag)?;
        self.remove(tag);
        Some(kind)
    }

    pub fn mobility_modifier(&self) -> i32 {
        match self.active(StatusTag::MobilityModifier) {
            Some(StatusEffectKind::MobilityModifier(delta)) => delta,
            _ => 0,
        }
    }

    /// Advances effects to the bearer's turn start.
    pub fn begin_turn(&mut self) -> TurnStartEffects {
        self.effects
            .retain(|e| e.phase == EffectPhase::Pending || e.kind.is_persistent());

        for effect in self.effects.iter_mut() {
            effect.phase = EffectPhase::Active;
        }

        let mut report = TurnStartEffects::default();
        for effect in self.effects.iter_mut() {
            if let StatusEffectKind::HealOverTime { amount, remaining } = &mut effect.kind {
                report.heal = *amount;
                *remaining = remaining.saturating_sub(1);
                report.heal_expired = *remaining == 0;
            }
        }
        if report.heal_expired {
            self.remove(StatusTag::HealOverTime);
        }

        if let Some(StatusEffectKind::ActionPointModifier(delta)) =
            self.active(StatusTag::ActionPointModifier)
        {
            report.action_point_modifier = delta;
        }
        report
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}
