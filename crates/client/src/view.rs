//! Plain-text rendering of a battle for the terminal driver.
use std::fmt::Write as _;

use arena_runtime::Presenter;
use battle_core::{BattleConfig, BattleSession, Cell, Combatant, Phase, Role, Variant};

/// Prints every session view to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present(&self, session: &BattleSession) {
        println!("{}", render(session));
    }
}

pub fn render(session: &BattleSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} · {} ==", session.arena, session.variant);

    if session.variant != Variant::Encounter {
        for row in 0..BattleConfig::GRID_CELLS / BattleConfig::GRID_WIDTH {
            for col in 0..BattleConfig::GRID_WIDTH {
                let symbol = Cell::new(row * BattleConfig::GRID_WIDTH + col)
                    .and_then(|cell| session.grid.occupant(cell))
                    .and_then(|id| session.combatant(id))
                    .map_or(".", |c| c.symbol.as_str());
                let _ = write!(out, "[{symbol:^3}]");
            }
            out.push('\n');
        }
    }

    for combatant in &session.combatants {
        out.push_str(&status_line(combatant));
        out.push('\n');
    }

    match session.phase {
        Phase::Active => {
            let actor = session.name_of(session.turn.current);
            let _ = writeln!(
                out,
                "-> {actor}'s turn, {} action point(s) left",
                session.turn.actions_left
            );
            if let Some(prompt) = session.prompt {
                let _ = writeln!(
                    out,
                    "-> {} must choose a cell (0-14)",
                    session.name_of(prompt.actor)
                );
            }
        }
        Phase::Concluded(_) => out.push_str("-> battle over\n"),
    }

    for line in session.log.iter() {
        let _ = writeln!(out, "  {line}");
    }
    out
}

fn status_line(c: &Combatant) -> String {
    let class = match c.role {
        Role::Adventurer {
            class,
            advanced: Some(advanced),
        } => format!("{class}/{advanced}"),
        Role::Adventurer { class, .. } => class.to_string(),
        Role::Monster { kind, .. } => kind.to_string(),
    };
    let mut line = format!(
        "{} {} [{class}] Lv{} HP {}/{}",
        c.symbol, c.name, c.level, c.current_hp, c.max_hp
    );
    if c.defense > 0 {
        let _ = write!(line, " DEF {}", c.defense);
    }
    if c.ward > 0 {
        let _ = write!(line, " WARD {}", c.ward);
    }
    if c.charges > 0 {
        let _ = write!(line, " x{}", c.charges);
    }
    if c.cooldown > 0 {
        let _ = write!(line, " CD {}", c.cooldown);
    }
    let effects: Vec<String> = c
        .effects
        .iter()
        .map(|effect| format!("{:?}", effect.kind.tag()))
        .collect();
    if !effects.is_empty() {
        let _ = write!(line, " {{{}}}", effects.join(", "));
    }
    if !c.is_alive() {
        line.push_str(" (down)");
    }
    line
}

#[cfg(test)]
mod tests {
    use battle_core::{
        ArenaId, BaseClass, CombatantId, Entrant, PlayerProfile, ReplayRng,
    };

    use super::*;

    #[test]
    fn duel_view_shows_the_grid_and_the_turn() {
        let alice = Entrant::new(
            CombatantId(1),
            PlayerProfile::new("Alice", BaseClass::Mage).with_symbol("A"),
        );
        let bob = Entrant::new(
            CombatantId(2),
            PlayerProfile::new("Bob", BaseClass::Swordsman).with_symbol("B"),
        );
        let mut rng = ReplayRng::constant(0);
        let session =
            BattleSession::duel(ArenaId(3), &alice, &bob, &BattleConfig::default(), &mut rng)
                .unwrap();

        let view = render(&session);
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines[0], "== arena-3 · Duel ==");
        assert_eq!(lines[1], "[ A ][ . ][ . ][ . ][ . ]");
        assert_eq!(lines[3], "[ . ][ . ][ . ][ . ][ B ]");
        assert_eq!(lines[4], "A Alice [Mage] Lv1 HP 10/10");
        assert!(view.contains("-> Alice's turn, 2 action point(s) left"));
        assert!(view.contains("  Alice's turn"));
    }
}
