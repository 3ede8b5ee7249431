use crate::action::target::{combatant, reject_in};
use crate::action::{ActionError, ActionTransition, CommandKind};
use crate::env::BattleEnv;
use crate::state::{BattleSession, Cell, CombatantId, Direction, Variant};

/// Walks a path of orthogonal steps. Costs one action point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: CombatantId,
    pub path: Vec<Direction>,
}

impl MoveAction {
    pub fn new(actor: CombatantId, path: Vec<Direction>) -> Self {
        Self { actor, path }
    }

    /// Parses direction tokens (`w`, `a`, `s`, `d`). A single token may also
    /// carry several letters, e.g. `"wd"`.
    pub fn parse<'t>(
        actor: CombatantId,
        tokens: impl IntoIterator<Item = &'t str>,
    ) -> Result<Self, ActionError> {
        let mut path = Vec::new();
        for token in tokens {
            if let Ok(direction) = token.parse::<Direction>() {
                path.push(direction);
                continue;
            }
            for letter in token.chars() {
                let direction = letter
                    .to_string()
                    .parse::<Direction>()
                    .map_err(|_| ActionError::MalformedDirection(token.to_owned()))?;
                path.push(direction);
            }
        }
        Ok(Self::new(actor, path))
    }

    /// Cell the path ends on, checking bounds and row wrapping on every step.
    fn destination(&self, start: Cell) -> Result<Cell, ActionError> {
        self.path
            .iter()
            .enumerate()
            .try_fold(start, |cell, (i, direction)| {
                cell.step(*direction)
                    .ok_or(ActionError::OffGrid { step: i + 1 })
            })
    }
}

impl ActionTransition for MoveAction {
    type Result = Cell;

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        reject_in(session, CommandKind::Move, Variant::Encounter)?;
        if self.path.is_empty() {
            return Err(ActionError::NoSteps);
        }

        let mover = combatant(session, self.actor)?;
        let mobility = mover.mobility();
        if self.path.len() > mobility as usize {
            return Err(ActionError::TooManySteps {
                steps: self.path.len(),
                mobility,
            });
        }

        let start = mover.position.ok_or(ActionError::Unplaced(self.actor))?;
        let destination = self.destination(start)?;
        if !session.grid.is_free(destination) {
            return Err(ActionError::Occupied(destination));
        }
        Ok(())
    }

    fn apply(&self, session: &mut BattleSession, _env: &mut BattleEnv<'_>) -> Result<Cell, ActionError> {
        let start = session
            .position_of(self.actor)
            .ok_or(ActionError::Unplaced(self.actor))?;
        let destination = self.destination(start)?;
        if !session.grid.relocate(start, destination) {
            return Err(ActionError::Occupied(destination));
        }

        let mover = session
            .combatant_mut(self.actor)
            .ok_or(ActionError::UnknownCombatant(self.actor))?;
        mover.position = Some(destination);
        let line = format!("{} moves to cell {destination}", mover.name);
        session.log.push(line);
        Ok(destination)
    }

    fn post_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        let cell = session
            .position_of(self.actor)
            .ok_or(ActionError::Unplaced(self.actor))?;
        match session.grid.occupant(cell) {
            Some(id) if id == self.actor => Ok(()),
            _ => Err(ActionError::Occupied(cell)),
        }
    }
}
