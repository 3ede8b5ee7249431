#![allow(dead_code)]

use battle_core::{
    ActionOutcome, AdvancedClass, ArenaId, Attribute, BaseClass, BattleConfig, BattleEngine,
    BattleEnv, BattleSession, Cell, Command, CombatantId, Entrant, ExecuteError, HuntingGround,
    MonsterKind, PlayerProfile, ReplayRng, RngOracle,
};

pub const ALICE: CombatantId = CombatantId(1);
pub const BOB: CombatantId = CombatantId(2);
pub const CARA: CombatantId = CombatantId(3);
pub const DREW: CombatantId = CombatantId(4);

/// A d100 never rolls under 100, so no percentage check below 100 succeeds.
pub fn no_luck() -> ReplayRng {
    ReplayRng::constant(99)
}

/// A d100 always rolls 1, so every percentage check above 0 succeeds.
pub fn all_luck() -> ReplayRng {
    ReplayRng::constant(0)
}

pub fn profile(name: &str, class: BaseClass, mental: u32, physical: u32) -> PlayerProfile {
    PlayerProfile::new(name, class).with_stats(mental, physical)
}

pub fn entrant(id: CombatantId, profile: PlayerProfile) -> Entrant {
    Entrant::new(id, profile)
}

pub fn advanced(
    name: &str,
    class: BaseClass,
    skill: AdvancedClass,
    attribute: Attribute,
) -> PlayerProfile {
    profile(name, class, 4, 8)
        .with_advanced(skill)
        .with_attribute(attribute)
}

/// Alice at cell 0 opens against Bob at cell 14.
pub fn duel(alice: PlayerProfile, bob: PlayerProfile) -> BattleSession {
    let config = BattleConfig::default();
    let mut rng = ReplayRng::constant(0);
    BattleSession::duel(
        ArenaId(1),
        &entrant(ALICE, alice),
        &entrant(BOB, bob),
        &config,
        &mut rng,
    )
    .expect("duel setup")
}

/// Rotation Alice, Cara, Bob, Drew; Alice and Bob form side A.
pub fn team(profiles: [PlayerProfile; 4]) -> BattleSession {
    let config = BattleConfig::default();
    let mut rng = ReplayRng::constant(0);
    let [a, b, c, d] = profiles;
    let (a, b, c, d) = (
        entrant(ALICE, a),
        entrant(BOB, b),
        entrant(CARA, c),
        entrant(DREW, d),
    );
    BattleSession::team(ArenaId(2), [&a, &b], [&c, &d], &config, &mut rng).expect("team setup")
}

/// Single-monster encounter against a Slime.
pub fn encounter(hunter: PlayerProfile) -> BattleSession {
    let config = BattleConfig::default();
    let ground = HuntingGround::new("pond", [MonsterKind::Slime]);
    let mut rng = ReplayRng::constant(50);
    BattleSession::encounter(ArenaId(3), &entrant(ALICE, hunter), &ground, &config, &mut rng)
        .expect("encounter setup")
}

/// Moves `id` to `index`, bypassing the rules.
pub fn place(session: &mut BattleSession, id: CombatantId, index: usize) {
    let to = Cell::new(index).expect("cell on grid");
    let from = session.position_of(id).expect("placed combatant");
    assert!(session.grid.relocate(from, to), "cell {index} must be free");
    session.combatant_mut(id).expect("combatant").position = Some(to);
}

pub fn execute(
    session: &mut BattleSession,
    rng: &mut dyn RngOracle,
    command: Command,
) -> Result<ActionOutcome, ExecuteError> {
    let config = BattleConfig::default();
    BattleEngine::new(session).execute(BattleEnv::new(&config, rng), &command)
}

pub fn hp(session: &BattleSession, id: CombatantId) -> u32 {
    session.combatant(id).expect("combatant").current_hp
}
