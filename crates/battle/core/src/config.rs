use crate::combat::Multiplier;

/// Battle rules and balance values.
///
/// Structural values (grid shape, log capacity, action budget, cooldown) are
/// associated constants because session layout depends on them. Balance values
/// are plain fields so hosts can tune them without touching the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Percent chance that a basic attack is critical.
    pub crit_chance: u32,
    /// Multiplier applied on a critical basic attack.
    pub crit_multiplier: Multiplier,
    /// Percent chance that fleeing an encounter succeeds.
    pub flee_chance: u32,
    /// Minimum damage dealt by any connecting hit.
    pub damage_floor: u32,
    /// Elemental swing is drawn from `0..=elemental_factor * level`.
    pub elemental_factor: u32,
    /// Max-HP bonus per level granted by an active rest buff.
    pub rest_hp_per_level: u32,
    /// Monster action weights.
    pub monster_policy: MonsterPolicyWeights,
    /// Shield granted by a monster's defend action, as percent of its max HP.
    pub monster_shield_percent: u32,
}

/// Relative weights of the three monster actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterPolicyWeights {
    pub strike: u32,
    pub guard: u32,
    pub heavy: u32,
}

impl MonsterPolicyWeights {
    pub const fn total(&self) -> u32 {
        self.strike + self.guard + self.heavy
    }
}

impl Default for MonsterPolicyWeights {
    fn default() -> Self {
        Self {
            strike: 60,
            guard: 30,
            heavy: 10,
        }
    }
}

impl BattleConfig {
    // ========================================================================
    // Grid
    // ========================================================================

    /// Cells per row.
    pub const GRID_WIDTH: usize = 5;

    /// Total cells (three rows of five).
    pub const GRID_CELLS: usize = 15;

    // ========================================================================
    // Turn structure
    // ========================================================================

    /// Action points granted at the start of every turn before modifiers.
    pub const BASE_ACTION_POINTS: i32 = 2;

    /// Turns a special or skill stays unavailable after use.
    pub const ABILITY_COOLDOWN: u32 = 2;

    /// Battle log entries retained per session.
    pub const LOG_CAPACITY: usize = 5;

    /// Status effect slots per combatant (one per effect kind).
    pub const MAX_STATUS_EFFECTS: usize = 6;

    // ========================================================================
    // Defaults
    // ========================================================================

    pub const DEFAULT_CRIT_CHANCE: u32 = 10;
    pub const DEFAULT_CRIT_MULTIPLIER: Multiplier = Multiplier::from_percent(200);
    pub const DEFAULT_FLEE_CHANCE: u32 = 50;
    pub const DEFAULT_DAMAGE_FLOOR: u32 = 1;
    pub const DEFAULT_ELEMENTAL_FACTOR: u32 = 1;
    pub const DEFAULT_REST_HP_PER_LEVEL: u32 = 5;
    pub const DEFAULT_MONSTER_SHIELD_PERCENT: u32 = 20;

    pub fn new() -> Self {
        Self {
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            flee_chance: Self::DEFAULT_FLEE_CHANCE,
            damage_floor: Self::DEFAULT_DAMAGE_FLOOR,
            elemental_factor: Self::DEFAULT_ELEMENTAL_FACTOR,
            rest_hp_per_level: Self::DEFAULT_REST_HP_PER_LEVEL,
            monster_policy: MonsterPolicyWeights::default(),
            monster_shield_percent: Self::DEFAULT_MONSTER_SHIELD_PERCENT,
        }
    }

    pub fn with_crit_chance(mut self, percent: u32) -> Self {
        self.crit_chance = percent.min(100);
        self
    }

    pub fn with_flee_chance(mut self, percent: u32) -> Self {
        self.flee_chance = percent.min(100);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
