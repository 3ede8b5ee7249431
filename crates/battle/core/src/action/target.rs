//! Target resolution and reach checks shared by attacks and skills.

use crate::action::{ActionError, CommandKind};
use crate::combat::AttackStyle;
use crate::state::{BattleSession, Combatant, CombatantId, Variant};

/// Distance band a strike can reach on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reach {
    /// Distance exactly 1.
    Melee,
    /// Distance 2 to 3.
    Ranged,
}

impl Reach {
    pub(crate) fn style(self) -> AttackStyle {
        match self {
            Reach::Melee => AttackStyle::Melee,
            Reach::Ranged => AttackStyle::Ranged,
        }
    }

    fn admits(self, distance: u32) -> bool {
        match self {
            Reach::Melee => distance == 1,
            Reach::Ranged => (2..=3).contains(&distance),
        }
    }
}

pub(super) fn reject_in(
    session: &BattleSession,
    command: CommandKind,
    variant: Variant,
) -> Result<(), ActionError> {
    if session.variant == variant {
        return Err(ActionError::WrongVariant {
            command,
            variant: session.variant,
        });
    }
    Ok(())
}

pub(super) fn only_in(
    session: &BattleSession,
    command: CommandKind,
    variant: Variant,
) -> Result<(), ActionError> {
    if session.variant != variant {
        return Err(ActionError::WrongVariant {
            command,
            variant: session.variant,
        });
    }
    Ok(())
}

pub(super) fn combatant(
    session: &BattleSession,
    id: CombatantId,
) -> Result<&Combatant, ActionError> {
    session
        .combatant(id)
        .ok_or(ActionError::UnknownCombatant(id))
}

/// Resolves a living opponent. Without an explicit target, Duel and
/// Encounter default to the sole opponent; Team requires one.
pub(super) fn enemy(
    session: &BattleSession,
    actor: CombatantId,
    target: Option<CombatantId>,
) -> Result<CombatantId, ActionError> {
    let id = match target {
        Some(id) => id,
        None => {
            let opponents = session.living_opponents(actor);
            match (session.variant, opponents.as_slice()) {
                (Variant::Duel | Variant::Encounter, [only]) => *only,
                _ => return Err(ActionError::MissingTarget),
            }
        }
    };

    let attacker = combatant(session, actor)?;
    let defender = session
        .combatant(id)
        .ok_or(ActionError::InvalidTarget(id))?;
    if defender.side == attacker.side {
        return Err(ActionError::InvalidTarget(id));
    }
    if !defender.is_alive() {
        return Err(ActionError::TargetDown(id));
    }
    Ok(id)
}

/// Resolves a living combatant on the actor's side. Defaults to the actor
/// itself when `allow_self` is set.
pub(super) fn ally(
    session: &BattleSession,
    actor: CombatantId,
    target: Option<CombatantId>,
    allow_self: bool,
) -> Result<CombatantId, ActionError> {
    let id = match (target, allow_self) {
        (Some(id), _) => id,
        (None, true) => actor,
        (None, false) => return Err(ActionError::MissingTarget),
    };
    if id == actor && !allow_self {
        return Err(ActionError::InvalidTarget(id));
    }

    let caster = combatant(session, actor)?;
    let friend = session
        .combatant(id)
        .ok_or(ActionError::InvalidTarget(id))?;
    if friend.side != caster.side {
        return Err(ActionError::InvalidTarget(id));
    }
    if !friend.is_alive() {
        return Err(ActionError::TargetDown(id));
    }
    Ok(id)
}

/// Checks grid distance against `reach`. Encounters have no grid and skip it.
pub(super) fn within(
    session: &BattleSession,
    actor: CombatantId,
    target: CombatantId,
    reach: Reach,
) -> Result<(), ActionError> {
    if session.variant == Variant::Encounter {
        return Ok(());
    }
    let distance = distance(session, actor, target)?;
    if reach.admits(distance) {
        Ok(())
    } else {
        Err(ActionError::OutOfRange { distance })
    }
}

pub(super) fn distance(
    session: &BattleSession,
    actor: CombatantId,
    target: CombatantId,
) -> Result<u32, ActionError> {
    let from = session
        .position_of(actor)
        .ok_or(ActionError::Unplaced(actor))?;
    let to = session
        .position_of(target)
        .ok_or(ActionError::Unplaced(target))?;
    Ok(from.distance(to))
}
