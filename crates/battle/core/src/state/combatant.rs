use core::fmt;

use strum::{Display, EnumString};

use crate::combat::{AttackStyle, Attribute, Multiplier};
use crate::config::BattleConfig;
use crate::env::{MonsterKind, PlayerProfile};
use crate::state::{Cell, StatusEffects};

/// Unique identifier for a combatant within a session.
///
/// Players use their external account id; the encounter monster uses
/// [`CombatantId::MONSTER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u64);

impl CombatantId {
    pub const MONSTER: CombatantId = CombatantId(u64::MAX);

    pub fn is_monster(self) -> bool {
        self == Self::MONSTER
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_monster() {
            f.write_str("monster")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Side of the battle. Duel and Encounter put one combatant on each side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseClass {
    Mage,
    Spellblade,
    Swordsman,
}

impl BaseClass {
    pub const fn mobility(self) -> u32 {
        match self {
            BaseClass::Mage | BaseClass::Spellblade => 1,
            BaseClass::Swordsman => 2,
        }
    }

    /// Multiplier used when no buff, charge or critical applies.
    pub const fn baseline(self) -> Multiplier {
        match self {
            BaseClass::Mage | BaseClass::Swordsman => Multiplier::from_percent(120),
            BaseClass::Spellblade => Multiplier::ONE,
        }
    }

    /// Attack style available at `distance`, if the target is in reach.
    pub fn style_at(self, distance: u32) -> Option<AttackStyle> {
        match (self, distance) {
            (BaseClass::Swordsman | BaseClass::Spellblade, 1) => Some(AttackStyle::Melee),
            (BaseClass::Mage | BaseClass::Spellblade, 2..=3) => Some(AttackStyle::Ranged),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdvancedClass {
    Caster,
    Healer,
    Hunter,
    Joker,
    Warrior,
    Defender,
    Pioneer,
    Granter,
    Commander,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Adventurer {
        class: BaseClass,
        advanced: Option<AdvancedClass>,
    },
    Monster {
        kind: MonsterKind,
        /// Base damage of a monster strike.
        power: u32,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub mental: u32,
    pub physical: u32,
    /// Flat bonus from equipped gear, added to the primary stat of every roll.
    pub gear_bonus: u32,
}

impl Stats {
    /// Primary and secondary stat for an attack style.
    pub const fn for_style(&self, style: AttackStyle) -> (u32, u32) {
        match style {
            AttackStyle::Melee => (self.physical, self.mental),
            AttackStyle::Ranged => (self.mental, self.physical),
        }
    }
}

/// Runtime fighter state. Derived once at session start and never written
/// back to the profile store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub symbol: String,
    pub color_tag: String,
    pub side: Side,
    pub role: Role,
    pub attribute: Option<Attribute>,
    pub level: u32,
    pub stats: Stats,
    pub max_hp: u32,
    pub current_hp: u32,
    /// Grid cell. `None` in encounters, which have no grid.
    pub position: Option<Cell>,
    pub cooldown: u32,
    /// Absorption pool consumed by incoming hits.
    pub defense: u32,
    /// Encounter-only shield that absorbs the whole next monster hit.
    pub ward: u32,
    /// Stacked melee buff charges.
    pub charges: u32,
    pub effects: StatusEffects,
}

impl Combatant {
    /// Builds a player combatant from a profile snapshot.
    pub fn from_profile(
        id: CombatantId,
        profile: &PlayerProfile,
        side: Side,
        config: &BattleConfig,
    ) -> Self {
        let level = profile.level();
        let max_hp = profile.max_hp(config);
        Self {
            id,
            name: profile.name.clone(),
            symbol: profile.symbol.clone(),
            color_tag: profile.color_tag.clone(),
            side,
            role: Role::Adventurer {
                class: profile.base_class,
                advanced: profile.advanced_class,
            },
            attribute: profile.attribute,
            level,
            stats: Stats {
                mental: profile.mental,
                physical: profile.physical,
                gear_bonus: profile.equipped_gear_bonus,
            },
            max_hp,
            current_hp: max_hp,
            position: None,
            cooldown: 0,
            defense: 0,
            ward: 0,
            charges: 0,
            effects: StatusEffects::empty(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn base_class(&self) -> Option<BaseClass> {
        match self.role {
            Role::Adventurer { class, .. } => Some(class),
            Role::Monster { .. } => None,
        }
    }

    pub fn advanced_class(&self) -> Option<AdvancedClass> {
        match self.role {
            Role::Adventurer { advanced, .. } => advanced,
            Role::Monster { .. } => None,
        }
    }

    /// Max cells per move: class mobility plus active modifier, at least 1.
    pub fn mobility(&self) -> u32 {
        let base = self.base_class().map_or(0, BaseClass::mobility) as i32;
        (base + self.effects.mobility_modifier()).max(1) as u32
    }

    /// Attack style used in encounters, where range is not checked.
    pub fn encounter_style(&self) -> AttackStyle {
        match self.base_class() {
            Some(BaseClass::Swordsman) => AttackStyle::Melee,
            _ if self.stats.physical >= self.stats.mental => AttackStyle::Melee,
            _ => AttackStyle::Ranged,
        }
    }

    /// Lowers HP, clamped at zero. Returns HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Raises HP, clamped at max. Returns HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.current_hp);
        self.current_hp += restored;
        restored
    }

    /// Pays HP as an ability cost. Never drops below 1.
    pub fn pay_hp(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.current_hp.saturating_sub(1));
        self.current_hp -= paid;
        paid
    }

    /// Percentage of max HP, rounded down and at least 1.
    pub fn percent_of_max_hp(&self, percent: u32) -> u32 {
        let share = u64::from(self.max_hp) * u64::from(percent) / 100;
        u32::try_from(share).unwrap_or(u32::MAX).max(1)
    }
}
