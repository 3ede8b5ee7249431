mod common;

use battle_core::combat::MultiplierSource;
use battle_core::{
    ActionError, ActionResult, AdvancedClass, Attribute, BaseClass, BattleConfig, BattleEngine,
    Cell, Command, CommandKind, ConclusionReason, Direction, ExecuteError, MoveAction, Side,
    SkillOutcome, SpecialOutcome, StatusEffectKind, StatusTag, TurnProgress, Variant,
};

use common::*;

fn walk(actor: battle_core::CombatantId, path: &[Direction]) -> Command {
    Command::Move(MoveAction::new(actor, path.to_vec()))
}

fn rejection(err: ExecuteError) -> ActionError {
    err.action_error().cloned().expect("transition rejection")
}

#[test]
fn illegal_moves_leave_the_session_untouched() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let before = session.clone();

    let cases = [
        (vec![Direction::Left], ActionError::OffGrid { step: 1 }),
        (vec![Direction::Up], ActionError::OffGrid { step: 1 }),
        (
            vec![Direction::Right, Direction::Right, Direction::Right],
            ActionError::TooManySteps {
                steps: 3,
                mobility: 2,
            },
        ),
        (Vec::new(), ActionError::NoSteps),
    ];
    for (path, expected) in cases {
        let err = execute(&mut session, &mut no_luck(), walk(ALICE, &path)).unwrap_err();
        assert_eq!(rejection(err), expected);
        assert_eq!(session, before);
    }

    place(&mut session, BOB, 2);
    let err = execute(
        &mut session,
        &mut no_luck(),
        walk(ALICE, &[Direction::Right, Direction::Right]),
    )
    .unwrap_err();
    assert_eq!(rejection(err), ActionError::Occupied(Cell::new(2).unwrap()));
}

#[test]
fn moves_never_wrap_rows() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    place(&mut session, ALICE, 4);
    let err = execute(&mut session, &mut no_luck(), walk(ALICE, &[Direction::Right])).unwrap_err();
    assert_eq!(rejection(err), ActionError::OffGrid { step: 1 });

    let outcome = execute(
        &mut session,
        &mut no_luck(),
        walk(ALICE, &[Direction::Down, Direction::Left]),
    )
    .unwrap();
    assert_eq!(outcome.result, ActionResult::Moved(Cell::new(8).unwrap()));
    assert_eq!(session.grid.occupant(Cell::new(8).unwrap()), Some(ALICE));
    assert!(session.grid.is_free(Cell::new(4).unwrap()));
}

#[test]
fn only_the_current_actor_may_act() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let err = execute(&mut session, &mut no_luck(), Command::forfeit(BOB)).unwrap_err();
    assert_eq!(
        err,
        ExecuteError::ActorNotCurrent {
            actor: BOB,
            current_actor: ALICE
        }
    );
    let err = execute(&mut session, &mut no_luck(), Command::forfeit(DREW)).unwrap_err();
    assert_eq!(err, ExecuteError::NotParticipant(DREW));
    assert!(session.is_active());
}

#[test]
fn spending_both_points_passes_the_turn() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    execute(&mut session, &mut no_luck(), walk(ALICE, &[Direction::Right])).unwrap();
    let outcome = execute(&mut session, &mut no_luck(), walk(ALICE, &[Direction::Down])).unwrap();
    assert_eq!(
        outcome.progress,
        TurnProgress::Advanced {
            actor: BOB,
            serial: 2
        }
    );
    assert_eq!(session.turn.actions_left, 2);
    assert_eq!(session.nonce, 2);
    assert_eq!(session.log.latest(), Some("Bob's turn"));
}

#[test]
fn knockout_concludes_the_duel() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 6),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    place(&mut session, BOB, 1);
    session.combatant_mut(BOB).unwrap().current_hp = 1;

    let outcome = execute(&mut session, &mut no_luck(), Command::attack(ALICE, None)).unwrap();
    let TurnProgress::Concluded(conclusion) = outcome.progress else {
        panic!("expected conclusion, got {:?}", outcome.progress);
    };
    assert_eq!(conclusion.winner, Some(Side::A));
    assert_eq!(conclusion.reason, ConclusionReason::Defeat);
    assert_eq!(hp(&session, BOB), 0);
    assert_eq!(session.winners(), vec![ALICE]);
}

#[test]
fn forfeit_hands_victory_to_the_opponent() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let outcome = execute(&mut session, &mut no_luck(), Command::forfeit(ALICE)).unwrap();
    assert_eq!(outcome.result, ActionResult::Forfeited);
    let conclusion = session.conclusion().unwrap();
    assert_eq!(conclusion.winner, Some(Side::B));
    assert_eq!(conclusion.reason, ConclusionReason::Forfeit(ALICE));
}

#[test]
fn teleport_prompt_blocks_everything_else() {
    let mut session = duel(
        profile("Alice", BaseClass::Mage, 0, 0),
        profile("Bob", BaseClass::Swordsman, 0, 0),
    );

    let outcome = execute(&mut session, &mut no_luck(), Command::special(ALICE)).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::Special(SpecialOutcome::TeleportPending)
    );
    assert!(matches!(outcome.progress, TurnProgress::AwaitingCell { .. }));
    assert_eq!(session.turn.actions_left, 2);

    let blocked = ExecuteError::PromptPending { actor: ALICE };
    let err = execute(&mut session, &mut no_luck(), Command::forfeit(BOB)).unwrap_err();
    assert_eq!(err, blocked);
    let err = execute(&mut session, &mut no_luck(), Command::attack(ALICE, None)).unwrap_err();
    assert_eq!(err, blocked);

    let err = execute(&mut session, &mut no_luck(), Command::choose_cell(ALICE, 14)).unwrap_err();
    assert_eq!(rejection(err), ActionError::Occupied(Cell::LAST));
    let err = execute(&mut session, &mut no_luck(), Command::choose_cell(ALICE, 15)).unwrap_err();
    assert_eq!(rejection(err), ActionError::InvalidCell(15));
    assert!(session.prompt.is_some());

    let outcome = execute(&mut session, &mut no_luck(), Command::choose_cell(ALICE, 7)).unwrap();
    let seven = Cell::new(7).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::CellChosen {
            subject: ALICE,
            cell: seven
        }
    );
    assert_eq!(outcome.progress, TurnProgress::Continues { actions_left: 1 });
    assert_eq!(session.position_of(ALICE), Some(seven));
    assert!(session.grid.is_free(Cell::FIRST));
    assert_eq!(session.combatant(ALICE).unwrap().cooldown, 2);
    assert!(session.prompt.is_none());
}

#[test]
fn expired_prompt_costs_nothing() {
    let mut session = duel(
        profile("Alice", BaseClass::Mage, 0, 0),
        profile("Bob", BaseClass::Swordsman, 0, 0),
    );
    execute(&mut session, &mut no_luck(), Command::special(ALICE)).unwrap();
    let nonce = session.prompt.unwrap().nonce;

    let mut engine = BattleEngine::new(&mut session);
    assert!(engine.expire_prompt(nonce + 1).is_none());
    assert!(engine.expire_prompt(nonce).is_some());

    assert!(session.prompt.is_none());
    assert_eq!(session.turn.actions_left, 2);
    assert_eq!(session.combatant(ALICE).unwrap().cooldown, 0);
    assert_eq!(session.turn.current, ALICE);
}

#[test]
fn blood_oath_charges_melee_hits() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 5),
        profile("Bob", BaseClass::Mage, 0, 10),
    );
    place(&mut session, BOB, 1);
    let start = hp(&session, ALICE);

    let outcome = execute(&mut session, &mut no_luck(), Command::special(ALICE)).unwrap();
    // Level 2 pays 2 HP.
    assert_eq!(
        outcome.result,
        ActionResult::Special(SpecialOutcome::BloodOath { paid: 2 })
    );
    assert_eq!(hp(&session, ALICE), start - 2);

    let outcome = execute(&mut session, &mut no_luck(), Command::attack(ALICE, None)).unwrap();
    let ActionResult::Attacked(report) = outcome.result else {
        panic!("expected a hit");
    };
    assert_eq!(report.roll.source, MultiplierSource::Charged);
    assert_eq!(report.roll.raw, 10);
    assert_eq!(session.combatant(ALICE).unwrap().charges, 1);

    // Cooldown still running on the next own turn.
    execute(&mut session, &mut no_luck(), walk(BOB, &[Direction::Down])).unwrap();
    execute(&mut session, &mut no_luck(), walk(BOB, &[Direction::Right])).unwrap();
    assert_eq!(session.turn.current, ALICE);
    assert_eq!(session.combatant(ALICE).unwrap().cooldown, 1);
    let err = execute(&mut session, &mut no_luck(), Command::special(ALICE)).unwrap_err();
    assert_eq!(rejection(err), ActionError::OnCooldown(1));
}

#[test]
fn guaranteed_critical_lands_on_the_next_attack() {
    let mut session = duel(
        advanced("Alice", BaseClass::Swordsman, AdvancedClass::Hunter, Attribute::Gut),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    place(&mut session, BOB, 1);

    let outcome = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 3, None)).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::Skill(SkillOutcome::Granted {
            targets: vec![ALICE],
            effect: StatusEffectKind::GuaranteedCrit
        })
    );
    let outcome = execute(&mut session, &mut no_luck(), Command::attack(ALICE, None)).unwrap();
    let ActionResult::Attacked(report) = outcome.result else {
        panic!("expected a hit");
    };
    assert_eq!(report.roll.source, MultiplierSource::Critical);
    assert!(!session.combatant(ALICE).unwrap().effects.has(StatusTag::GuaranteedCrit));
}

#[test]
fn action_point_drain_lands_on_the_targets_next_turn() {
    let mut session = duel(
        advanced("Alice", BaseClass::Swordsman, AdvancedClass::Warrior, Attribute::Gut),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    execute(&mut session, &mut no_luck(), Command::skill(ALICE, 2, None)).unwrap();
    let err = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 1, None)).unwrap_err();
    assert_eq!(rejection(err), ActionError::OnCooldown(2));

    let outcome = execute(&mut session, &mut no_luck(), walk(ALICE, &[Direction::Down])).unwrap();
    assert_eq!(
        outcome.progress,
        TurnProgress::Advanced {
            actor: BOB,
            serial: 2
        }
    );
    assert_eq!(session.turn.actions_left, 1);
}

#[test]
fn skills_need_an_advanced_class_and_a_valid_slot() {
    let mut session = duel(
        profile("Alice", BaseClass::Swordsman, 0, 0),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let err = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 1, None)).unwrap_err();
    assert_eq!(rejection(err), ActionError::NoAdvancedClass);

    let mut session = duel(
        advanced("Alice", BaseClass::Swordsman, AdvancedClass::Healer, Attribute::Heart),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let err = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 3, None)).unwrap_err();
    assert_eq!(rejection(err), ActionError::InvalidSkillSlot(3));

    let mut session = duel(
        advanced("Alice", BaseClass::Swordsman, AdvancedClass::Commander, Attribute::Wit),
        profile("Bob", BaseClass::Mage, 0, 0),
    );
    let err = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 2, Some(BOB))).unwrap_err();
    assert_eq!(
        rejection(err),
        ActionError::WrongVariant {
            command: CommandKind::Skill,
            variant: Variant::Duel
        }
    );
}

#[test]
fn heal_restores_an_ally_and_costs_a_point() {
    let mut session = team([
        advanced("Alice", BaseClass::Mage, AdvancedClass::Healer, Attribute::Heart),
        profile("Bob", BaseClass::Swordsman, 0, 10),
        profile("Cara", BaseClass::Swordsman, 0, 0),
        profile("Drew", BaseClass::Swordsman, 0, 0),
    ]);
    // Bob: level 3, max HP 40.
    session.combatant_mut(BOB).unwrap().current_hp = 10;

    let outcome = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 1, Some(BOB))).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::Skill(SkillOutcome::Healed {
            target: BOB,
            amount: 16
        })
    );
    assert_eq!(hp(&session, BOB), 26);
    assert_eq!(outcome.progress, TurnProgress::Continues { actions_left: 1 });

    let err = execute(&mut session, &mut no_luck(), Command::attack(ALICE, Some(BOB))).unwrap_err();
    assert_eq!(rejection(err), ActionError::InvalidTarget(BOB));
}

#[test]
fn commander_repositions_a_teammate() {
    let mut session = team([
        advanced("Alice", BaseClass::Swordsman, AdvancedClass::Commander, Attribute::Wit),
        profile("Bob", BaseClass::Swordsman, 0, 0),
        profile("Cara", BaseClass::Swordsman, 0, 0),
        profile("Drew", BaseClass::Swordsman, 0, 0),
    ]);

    let err = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 2, None)).unwrap_err();
    assert_eq!(rejection(err), ActionError::MissingTarget);

    let outcome = execute(&mut session, &mut no_luck(), Command::skill(ALICE, 2, Some(BOB))).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::Skill(SkillOutcome::RepositionPending { ally: BOB })
    );
    assert!(matches!(outcome.progress, TurnProgress::AwaitingCell { .. }));

    let err = execute(&mut session, &mut no_luck(), Command::choose_cell(BOB, 6)).unwrap_err();
    assert_eq!(err, ExecuteError::PromptPending { actor: ALICE });

    let outcome = execute(&mut session, &mut no_luck(), Command::choose_cell(ALICE, 6)).unwrap();
    assert_eq!(
        outcome.result,
        ActionResult::CellChosen {
            subject: BOB,
            cell: Cell::new(6).unwrap()
        }
    );
    assert_eq!(session.position_of(BOB), Cell::new(6));
    assert_eq!(session.position_of(ALICE), Some(Cell::FIRST));
    assert_eq!(session.combatant(ALICE).unwrap().cooldown, 2);
    assert_eq!(session.turn.actions_left, 1);
}

#[test]
fn defaults_are_the_documented_balance() {
    let config = BattleConfig::default();
    assert_eq!(config.crit_chance, 10);
    assert_eq!(config.flee_chance, 50);
    assert_eq!(config.damage_floor, 1);
    assert_eq!(config.monster_policy.total(), 100);
}
