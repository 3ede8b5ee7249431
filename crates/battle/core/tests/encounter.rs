mod common;

use battle_core::{
    ActionError, ActionResult, AdvancedClass, ArenaId, Attribute, BaseClass, BattleConfig,
    BattleSession, Bestiary, Command, CombatantId, CommandKind, ConclusionReason, Direction,
    MonsterIntent, MonsterKind, MoveAction, ReplayRng, Role, SetupError, Side, SkillOutcome,
    TurnProgress, Variant,
};

use common::*;

fn tough_monster(session: &mut BattleSession, power: u32) {
    let monster = session.combatant_mut(CombatantId::MONSTER).unwrap();
    monster.max_hp = 500;
    monster.current_hp = 500;
    monster.role = Role::Monster {
        kind: MonsterKind::Slime,
        power,
    };
}

#[test]
fn default_bestiary_knows_its_grounds() {
    let bestiary = Bestiary::default();
    assert!(bestiary.ground("meadow").is_some());
    assert!(bestiary.ground("MEADOW").is_some());

    let config = BattleConfig::default();
    let hunter = entrant(ALICE, profile("Alice", BaseClass::Swordsman, 0, 8));
    let mut rng = ReplayRng::constant(0);
    let session = bestiary
        .ground("burrow")
        .map(|ground| BattleSession::encounter(ArenaId(5), &hunter, ground, &config, &mut rng))
        .unwrap()
        .unwrap();
    let monster = session.combatant(CombatantId::MONSTER).unwrap();
    assert_eq!(monster.name, "Goblin");
    assert_eq!(monster.attribute, Some(Attribute::Gut));
    assert_eq!(monster.side, Side::B);

    assert!(bestiary.ground("swamp").is_none());
    assert_eq!(
        SetupError::UnknownGround("swamp".into()).to_string(),
        "unknown hunting ground 'swamp'"
    );
}

#[test]
fn attack_ends_the_turn_and_the_monster_answers() {
    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    tough_monster(&mut session, 6);
    let start = hp(&session, ALICE);

    // Crit roll misses, monster picks a strike, spread draws low.
    let mut rng = ReplayRng::new([99, 0, 0], 0);
    let outcome = execute(&mut session, &mut rng, Command::attack(ALICE, None)).unwrap();

    assert!(matches!(outcome.result, ActionResult::Attacked(_)));
    assert_eq!(outcome.monster_turns.len(), 1);
    let report = &outcome.monster_turns[0];
    assert_eq!(report.intent, MonsterIntent::Strike);
    assert_eq!(report.target, Some(ALICE));
    // Level 2 hunter: power 6 minus spread 2.
    assert_eq!(report.dealt, 4);
    assert_eq!(hp(&session, ALICE), start - 4);
    assert_eq!(
        outcome.progress,
        TurnProgress::Advanced {
            actor: ALICE,
            serial: 2
        }
    );
    assert_eq!(session.turn.actions_left, 2);
}

#[test]
fn grid_commands_are_rejected() {
    let mut session = encounter(profile("Alice", BaseClass::Mage, 0, 0));
    let before = session.clone();

    let err = execute(
        &mut session,
        &mut no_luck(),
        Command::Move(MoveAction::new(ALICE, vec![Direction::Up])),
    )
    .unwrap_err();
    assert_eq!(
        err.action_error(),
        Some(&ActionError::WrongVariant {
            command: CommandKind::Move,
            variant: Variant::Encounter
        })
    );
    let err = execute(&mut session, &mut no_luck(), Command::special(ALICE)).unwrap_err();
    assert_eq!(err.command(), Some(CommandKind::Special));
    assert_eq!(session, before);
}

#[test]
fn ward_soaks_the_next_monster_hit() {
    let mut session = encounter(
        profile("Alice", BaseClass::Swordsman, 0, 8).with_advanced(AdvancedClass::Defender),
    );
    tough_monster(&mut session, 5);
    let start = hp(&session, ALICE);

    let mut rng = ReplayRng::new([0, 0], 0);
    let outcome = execute(&mut session, &mut rng, Command::skill(ALICE, 1, None)).unwrap();

    assert_eq!(
        outcome.result,
        ActionResult::Skill(SkillOutcome::Shielded {
            target: ALICE,
            amount: 8
        })
    );
    let report = &outcome.monster_turns[0];
    assert_eq!(report.raw, 3);
    assert_eq!(report.absorbed, 3);
    assert_eq!(report.dealt, 0);
    assert_eq!(hp(&session, ALICE), start);
    assert_eq!(session.combatant(ALICE).unwrap().ward, 0);
}

#[test]
fn guarding_monster_raises_its_defense() {
    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    tough_monster(&mut session, 5);

    // Crit miss, then a roll of 61 lands in the guard band.
    let mut rng = ReplayRng::new([99, 60], 0);
    let outcome = execute(&mut session, &mut rng, Command::attack(ALICE, None)).unwrap();
    let report = &outcome.monster_turns[0];
    assert_eq!(report.intent, MonsterIntent::Guard);
    assert_eq!(report.shield, 100);
    assert_eq!(
        session.combatant(CombatantId::MONSTER).unwrap().defense,
        100
    );
}

#[test]
fn flee_outcomes() {
    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    let outcome = execute(&mut session, &mut all_luck(), Command::flee(ALICE)).unwrap();
    assert_eq!(outcome.result, ActionResult::Fled { escaped: true });
    let conclusion = session.conclusion().unwrap();
    assert_eq!(conclusion.winner, None);
    assert_eq!(conclusion.reason, ConclusionReason::Fled(ALICE));
    assert!(session.winners().is_empty());

    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    tough_monster(&mut session, 1);
    let outcome = execute(&mut session, &mut no_luck(), Command::flee(ALICE)).unwrap();
    assert_eq!(outcome.result, ActionResult::Fled { escaped: false });
    assert_eq!(outcome.monster_turns.len(), 1);
    assert!(session.is_active());
    assert_eq!(session.turn.current, ALICE);
}

#[test]
fn flee_is_encounter_only() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let err = execute(&mut session, &mut all_luck(), Command::flee(ALICE)).unwrap_err();
    assert_eq!(
        err.action_error(),
        Some(&ActionError::WrongVariant {
            command: CommandKind::Flee,
            variant: Variant::Duel
        })
    );
}

#[test]
fn forfeit_is_a_loss_for_the_hunter() {
    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    execute(&mut session, &mut no_luck(), Command::forfeit(ALICE)).unwrap();
    assert_eq!(session.winners(), vec![CombatantId::MONSTER]);
}

#[test]
fn slaying_the_monster_wins() {
    let mut session = encounter(profile("Alice", BaseClass::Swordsman, 0, 8));
    session
        .combatant_mut(CombatantId::MONSTER)
        .unwrap()
        .current_hp = 1;
    let outcome = execute(&mut session, &mut no_luck(), Command::attack(ALICE, None)).unwrap();
    assert!(outcome.monster_turns.is_empty());
    let TurnProgress::Concluded(conclusion) = outcome.progress else {
        panic!("expected conclusion");
    };
    assert_eq!(conclusion.winner, Some(Side::A));
    assert_eq!(conclusion.reason, ConclusionReason::Defeat);
}
