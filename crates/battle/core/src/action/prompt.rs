use crate::action::{ActionError, ActionTransition};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::state::{BattleSession, Cell, CombatantId, PendingPrompt};

/// Answers a pending cell prompt (teleport or reposition). Pays the action
/// point and cooldown the prompting ability deferred.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseCellAction {
    pub actor: CombatantId,
    pub cell: usize,
}

impl ChooseCellAction {
    fn prompt(&self, session: &BattleSession) -> Result<PendingPrompt, ActionError> {
        session
            .prompt
            .filter(|prompt| prompt.actor == self.actor)
            .ok_or(ActionError::NoPendingPrompt)
    }

    fn cell(&self) -> Result<Cell, ActionError> {
        Cell::new(self.cell).ok_or(ActionError::InvalidCell(self.cell))
    }
}

impl ActionTransition for ChooseCellAction {
    type Result = (CombatantId, Cell);

    fn actor(&self) -> CombatantId {
        self.actor
    }

    fn pre_validate(&self, session: &BattleSession, _env: &BattleEnv<'_>) -> Result<(), ActionError> {
        self.prompt(session)?;
        let cell = self.cell()?;
        if !session.grid.is_free(cell) {
            return Err(ActionError::Occupied(cell));
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        _env: &mut BattleEnv<'_>,
    ) -> Result<(CombatantId, Cell), ActionError> {
        let prompt = self.prompt(session)?;
        let cell = self.cell()?;
        let subject = prompt.purpose.subject(self.actor);
        let from = session
            .position_of(subject)
            .ok_or(ActionError::Unplaced(subject))?;
        if !session.grid.relocate(from, cell) {
            return Err(ActionError::Occupied(cell));
        }

        let moved = session
            .combatant_mut(subject)
            .ok_or(ActionError::UnknownCombatant(subject))?;
        moved.position = Some(cell);
        let moved_name = moved.name.clone();

        let actor = session
            .combatant_mut(self.actor)
            .ok_or(ActionError::UnknownCombatant(self.actor))?;
        actor.cooldown = BattleConfig::ABILITY_COOLDOWN;
        let line = if subject == self.actor {
            format!("{moved_name} teleports to cell {cell}")
        } else {
            format!("{} repositions {moved_name} to cell {cell}", actor.name)
        };

        session.prompt = None;
        session.log.push(line);
        Ok((subject, cell))
    }
}
