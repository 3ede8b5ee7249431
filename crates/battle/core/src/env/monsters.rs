use strum::{Display, EnumString};

use crate::combat::Attribute;
use crate::env::RngOracle;
use crate::state::{Combatant, CombatantId, Role, Side, StatusEffects, Stats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterKind {
    Slime,
    Goblin,
    Imp,
}

impl MonsterKind {
    pub const fn attribute(self) -> Attribute {
        match self {
            MonsterKind::Slime => Attribute::Heart,
            MonsterKind::Goblin => Attribute::Gut,
            MonsterKind::Imp => Attribute::Wit,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            MonsterKind::Slime => "S",
            MonsterKind::Goblin => "G",
            MonsterKind::Imp => "I",
        }
    }

    /// Spawns a monster scaled to `player`.
    ///
    /// `hp = round(avg * U(3.5, 5.0))` where `avg = (physical + mental) / 2 + level`,
    /// and strike power `= round(player max HP / U(4.5, 6.0))`. Both are at least 1.
    pub fn spawn(self, player: &Combatant, rng: &mut dyn RngOracle) -> Combatant {
        let average = f64::from(player.stats.physical + player.stats.mental) / 2.0
            + f64::from(player.level);
        let hp = ((average * rng.uniform(3.5, 5.0)).round() as u32).max(1);
        let power = ((f64::from(player.max_hp) / rng.uniform(4.5, 6.0)).round() as u32).max(1);

        Combatant {
            id: CombatantId::MONSTER,
            name: self.to_string(),
            symbol: self.symbol().to_owned(),
            color_tag: String::new(),
            side: Side::B,
            role: Role::Monster { kind: self, power },
            attribute: Some(self.attribute()),
            level: player.level,
            stats: Stats::default(),
            max_hp: hp,
            current_hp: hp,
            position: None,
            cooldown: 0,
            defense: 0,
            ward: 0,
            charges: 0,
            effects: StatusEffects::empty(),
        }
    }
}

/// A named hunting ground and the monsters that roam it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HuntingGround {
    pub id: String,
    pub pool: Vec<MonsterKind>,
}

impl HuntingGround {
    pub fn new(id: impl Into<String>, pool: impl IntoIterator<Item = MonsterKind>) -> Self {
        Self {
            id: id.into(),
            pool: pool.into_iter().collect(),
        }
    }

    pub fn pick(&self, rng: &mut dyn RngOracle) -> Option<MonsterKind> {
        if self.pool.is_empty() {
            return None;
        }
        self.pool.get(rng.pick(self.pool.len())).copied()
    }
}

/// Catalog of hunting grounds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bestiary {
    grounds: Vec<HuntingGround>,
}

impl Bestiary {
    pub fn new(grounds: impl IntoIterator<Item = HuntingGround>) -> Self {
        Self {
            grounds: grounds.into_iter().collect(),
        }
    }

    pub fn ground(&self, id: &str) -> Option<&HuntingGround> {
        self.grounds.iter().find(|g| g.id.eq_ignore_ascii_case(id))
    }

    pub fn grounds(&self) -> impl Iterator<Item = &HuntingGround> {
        self.grounds.iter()
    }
}

impl Default for Bestiary {
    fn default() -> Self {
        Self::new([
            HuntingGround::new(
                "meadow",
                [MonsterKind::Slime, MonsterKind::Goblin, MonsterKind::Imp],
            ),
            HuntingGround::new("burrow", [MonsterKind::Goblin]),
            HuntingGround::new("ruins", [MonsterKind::Imp, MonsterKind::Slime]),
        ])
    }
}
