//! Combat math: elemental matchups, multipliers and the damage pipeline.

pub mod damage;
pub mod element;

pub use damage::{
    AttackContext, DamageRoll, ElementalRule, HitReport, Mitigation, MultiplierSource, absorb,
    roll_damage, strike,
};
pub use element::{Attribute, Matchup};

use core::fmt;

/// Melee attacks scale off physical, ranged off mental.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackStyle {
    Melee,
    Ranged,
}

/// Damage multiplier stored as an integer percentage (150 = x1.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Multiplier = Multiplier(100);

    pub const fn from_percent(percent: u32) -> Self {
        Self(percent)
    }

    pub const fn percent(self) -> u32 {
        self.0
    }

    /// Scales `value`, rounding halves to even.
    pub fn apply(self, value: u32) -> u32 {
        let scaled = u64::from(value) * u64::from(self.0);
        let quotient = scaled / 100;
        let remainder = scaled % 100;
        let rounded = if remainder > 50 || (remainder == 50 && quotient % 2 == 1) {
            quotient + 1
        } else {
            quotient
        };
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}.{}", self.0 / 100, (self.0 % 100) / 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_rounds_half_to_even() {
        let m = Multiplier::from_percent(150);
        assert_eq!(m.apply(3), 4); // 4.5
        assert_eq!(m.apply(5), 8); // 7.5
        assert_eq!(m.apply(1), 2); // 1.5
        assert_eq!(Multiplier::from_percent(120).apply(5), 6);
        assert_eq!(Multiplier::ONE.apply(8), 8);
    }

    #[test]
    fn multiplier_display() {
        assert_eq!(Multiplier::from_percent(150).to_string(), "x1.5");
        assert_eq!(Multiplier::from_percent(200).to_string(), "x2.0");
    }
}
