use crate::combat::Attribute;
use crate::config::BattleConfig;
use crate::state::{AdvancedClass, BaseClass};

/// Snapshot of a player's persistent attributes, taken at battle start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProfile {
    pub name: String,
    pub symbol: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color_tag: String,
    pub base_class: BaseClass,
    pub advanced_class: Option<AdvancedClass>,
    pub attribute: Option<Attribute>,
    pub mental: u32,
    pub physical: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipped_gear_bonus: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rest_buff_active: bool,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>, base_class: BaseClass) -> Self {
        Self {
            name: name.into(),
            symbol: "@".to_owned(),
            color_tag: String::new(),
            base_class,
            advanced_class: None,
            attribute: None,
            mental: 0,
            physical: 0,
            equipped_gear_bonus: 0,
            rest_buff_active: false,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_stats(mut self, mental: u32, physical: u32) -> Self {
        self.mental = mental;
        self.physical = physical;
        self
    }

    pub fn with_advanced(mut self, class: AdvancedClass) -> Self {
        self.advanced_class = Some(class);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn with_gear_bonus(mut self, bonus: u32) -> Self {
        self.equipped_gear_bonus = bonus;
        self
    }

    pub fn with_rest_buff(mut self) -> Self {
        self.rest_buff_active = true;
        self
    }

    pub fn level(&self) -> u32 {
        1 + self.mental.saturating_add(self.physical) / 5
    }

    /// Max HP for one battle, including the rest buff when active.
    pub fn max_hp(&self, config: &BattleConfig) -> u32 {
        let level = self.level();
        let base = level.saturating_mul(10).saturating_add(self.physical).max(1);
        if self.rest_buff_active {
            base.saturating_add(self.rest_bonus(config))
        } else {
            base
        }
    }

    pub fn rest_bonus(&self, config: &BattleConfig) -> u32 {
        config.rest_hp_per_level.saturating_mul(self.level())
    }
}
