//! Session construction for each variant.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::BattleConfig;
use crate::env::{HuntingGround, PlayerProfile, RngOracle};
use crate::state::{
    ArenaId, BattleLog, BattleSession, Cell, Combatant, CombatantId, Grid, Phase, Side,
    TurnState, Variant,
};

/// A player entering a battle with the profile snapshot taken for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrant {
    pub id: CombatantId,
    pub profile: PlayerProfile,
}

impl Entrant {
    pub fn new(id: CombatantId, profile: PlayerProfile) -> Self {
        Self { id, profile }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("{0} appears more than once")]
    DuplicateParticipant(CombatantId),

    #[error("{0} is reserved")]
    ReservedId(CombatantId),

    #[error("unknown hunting ground '{0}'")]
    UnknownGround(String),

    #[error("hunting ground '{0}' has no monsters")]
    EmptyGround(String),
}

/// Team start cells: first and second member of side A, then of side B.
const TEAM_LAYOUT: [(Side, usize, usize); 4] =
    [(Side::A, 0, 0), (Side::A, 1, 10), (Side::B, 0, 4), (Side::B, 1, 14)];

impl BattleSession {
    /// 1v1. Players take the two opposite corners in random order and a
    /// random player opens.
    pub fn duel(
        arena: ArenaId,
        challenger: &Entrant,
        opponent: &Entrant,
        config: &BattleConfig,
        rng: &mut dyn RngOracle,
    ) -> Result<Self, SetupError> {
        check_entrants(&[challenger, opponent])?;

        let mut log = BattleLog::new();
        let mut first = enter(challenger, Side::A, config, &mut log);
        let mut second = enter(opponent, Side::B, config, &mut log);

        let (a, b) = if rng.pick(2) == 0 {
            (Cell::FIRST, Cell::LAST)
        } else {
            (Cell::LAST, Cell::FIRST)
        };
        let mut grid = Grid::new();
        first.position = Some(a);
        second.position = Some(b);
        grid.place(a, first.id);
        grid.place(b, second.id);

        let order = if rng.pick(2) == 0 {
            vec![first.id, second.id]
        } else {
            vec![second.id, first.id]
        };
        log.push(format!("Duel: {} vs {}", first.name, second.name));

        Ok(Self::assemble(arena, Variant::Duel, grid, vec![first, second], order, log))
    }

    /// 2v2 on fixed corners. A coin flip picks which side opens; turns then
    /// alternate sides.
    pub fn team(
        arena: ArenaId,
        side_a: [&Entrant; 2],
        side_b: [&Entrant; 2],
        config: &BattleConfig,
        rng: &mut dyn RngOracle,
    ) -> Result<Self, SetupError> {
        check_entrants(&[side_a[0], side_a[1], side_b[0], side_b[1]])?;

        let mut log = BattleLog::new();
        let mut grid = Grid::new();
        let mut combatants = Vec::with_capacity(4);
        for (side, slot, index) in TEAM_LAYOUT {
            let entrant = match side {
                Side::A => side_a[slot],
                Side::B => side_b[slot],
            };
            let mut combatant = enter(entrant, side, config, &mut log);
            if let Some(cell) = Cell::new(index) {
                combatant.position = Some(cell);
                grid.place(cell, combatant.id);
            }
            combatants.push(combatant);
        }

        let (a0, a1, b0, b1) = (side_a[0].id, side_a[1].id, side_b[0].id, side_b[1].id);
        let order = if rng.pick(2) == 0 {
            vec![a0, b0, a1, b1]
        } else {
            vec![b0, a0, b1, a1]
        };
        log.push(format!(
            "Team battle: {} & {} vs {} & {}",
            side_a[0].profile.name, side_a[1].profile.name, side_b[0].profile.name, side_b[1].profile.name
        ));

        Ok(Self::assemble(arena, Variant::Team, grid, combatants, order, log))
    }

    /// Player versus a monster drawn from `ground`. The player opens.
    pub fn encounter(
        arena: ArenaId,
        player: &Entrant,
        ground: &HuntingGround,
        config: &BattleConfig,
        rng: &mut dyn RngOracle,
    ) -> Result<Self, SetupError> {
        check_entrants(&[player])?;
        let kind = ground
            .pick(rng)
            .ok_or_else(|| SetupError::EmptyGround(ground.id.clone()))?;

        let mut log = BattleLog::new();
        let hunter = enter(player, Side::A, config, &mut log);
        let monster = kind.spawn(&hunter, rng);
        log.push(format!(
            "A wild {} (HP {}) appears before {}",
            monster.name, monster.max_hp, hunter.name
        ));

        let order = vec![hunter.id, monster.id];
        Ok(Self::assemble(
            arena,
            Variant::Encounter,
            Grid::new(),
            vec![hunter, monster],
            order,
            log,
        ))
    }

    fn assemble(
        arena: ArenaId,
        variant: Variant,
        grid: Grid,
        combatants: Vec<Combatant>,
        order: Vec<CombatantId>,
        mut log: BattleLog,
    ) -> Self {
        let turn = TurnState::new(order, BattleConfig::BASE_ACTION_POINTS);
        let opener = combatants
            .iter()
            .find(|c| c.id == turn.current)
            .map_or("?", |c| c.name.as_str());
        log.push(format!("{opener}'s turn"));

        Self {
            arena,
            variant,
            phase: Phase::Active,
            grid,
            combatants,
            turn,
            log,
            prompt: None,
            nonce: 0,
        }
    }
}

fn check_entrants(entrants: &[&Entrant]) -> Result<(), SetupError> {
    let mut seen = HashSet::new();
    for entrant in entrants {
        if entrant.id.is_monster() {
            return Err(SetupError::ReservedId(entrant.id));
        }
        if !seen.insert(entrant.id) {
            return Err(SetupError::DuplicateParticipant(entrant.id));
        }
    }
    Ok(())
}

fn enter(entrant: &Entrant, side: Side, config: &BattleConfig, log: &mut BattleLog) -> Combatant {
    if entrant.profile.rest_buff_active {
        log.push(format!(
            "{} is well rested (+{} max HP)",
            entrant.profile.name,
            entrant.profile.rest_bonus(config)
        ));
    }
    Combatant::from_profile(entrant.id, &entrant.profile, side, config)
}
