use core::fmt;

use strum::Display;

use crate::state::{BattleLog, Cell, Combatant, CombatantId, Grid, Side, TurnState};

/// Chat context hosting at most one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaId(pub u64);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    Duel,
    Team,
    Encounter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Active,
    Concluded(Conclusion),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conclusion {
    /// `None` when nobody wins (a successful flee).
    pub winner: Option<Side>,
    pub reason: ConclusionReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConclusionReason {
    /// Every member of the losing side reached 0 HP.
    Defeat,
    Forfeit(CombatantId),
    Fled(CombatantId),
    Timeout(CombatantId),
}

/// A follow-up cell choice the current actor owes before anything else
/// can happen in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingPrompt {
    pub actor: CombatantId,
    pub purpose: PromptPurpose,
    /// Session nonce when the prompt opened; identifies it to expiry timers.
    pub nonce: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PromptPurpose {
    /// Move the actor itself.
    Teleport,
    /// Move a teammate.
    Reposition { ally: CombatantId },
}

impl PromptPurpose {
    pub fn subject(&self, actor: CombatantId) -> CombatantId {
        match self {
            PromptPurpose::Teleport => actor,
            PromptPurpose::Reposition { ally } => *ally,
        }
    }
}

/// One battle in one arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    pub arena: ArenaId,
    pub variant: Variant,
    pub phase: Phase,
    pub grid: Grid,
    pub combatants: Vec<Combatant>,
    pub turn: TurnState,
    pub log: BattleLog,
    pub prompt: Option<PendingPrompt>,
    /// Incremented after every accepted command.
    pub nonce: u64,
}

impl BattleSession {
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    pub fn conclusion(&self) -> Option<Conclusion> {
        match self.phase {
            Phase::Active => None,
            Phase::Concluded(conclusion) => Some(conclusion),
        }
    }

    /// Ends the battle. Clears any pending prompt.
    pub fn conclude(&mut self, conclusion: Conclusion) {
        if !self.is_active() {
            return;
        }
        self.phase = Phase::Concluded(conclusion);
        self.prompt = None;
        let line = match conclusion.winner {
            Some(side) => {
                let names: Vec<&str> = self.members(side).map(|c| c.name.as_str()).collect();
                format!("Battle over: {} win(s)", names.join(" & "))
            }
            None => "Battle over: no winner".to_owned(),
        };
        self.log.push(line);
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn current(&self) -> Option<&Combatant> {
        self.combatant(self.turn.current)
    }

    pub fn is_participant(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some()
    }

    pub fn members(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.side == side)
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.members(side).all(|c| !c.is_alive())
    }

    /// Living combatants on the other side from `id`.
    pub fn living_opponents(&self, id: CombatantId) -> Vec<CombatantId> {
        let Some(side) = self.combatant(id).map(|c| c.side) else {
            return Vec::new();
        };
        self.members(side.opponent())
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    /// Same-side combatants other than `id`.
    pub fn teammates(&self, id: CombatantId) -> Vec<CombatantId> {
        let Some(side) = self.combatant(id).map(|c| c.side) else {
            return Vec::new();
        };
        self.members(side)
            .filter(|c| c.id != id)
            .map(|c| c.id)
            .collect()
    }

    /// Ids on the winning side, empty while active or after a flee.
    pub fn winners(&self) -> Vec<CombatantId> {
        match self.conclusion().and_then(|c| c.winner) {
            Some(side) => self.members(side).map(|c| c.id).collect(),
            None => Vec::new(),
        }
    }

    /// Mutable access to two distinct combatants at once.
    pub fn pair_mut(
        &mut self,
        first: CombatantId,
        second: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        let i = self.combatants.iter().position(|c| c.id == first)?;
        let j = self.combatants.iter().position(|c| c.id == second)?;
        if i == j {
            return None;
        }
        if i < j {
            let (head, tail) = self.combatants.split_at_mut(j);
            Some((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.combatants.split_at_mut(i);
            Some((&mut tail[0], &mut head[j]))
        }
    }

    pub fn position_of(&self, id: CombatantId) -> Option<Cell> {
        self.combatant(id).and_then(|c| c.position)
    }

    pub fn distance(&self, a: CombatantId, b: CombatantId) -> Option<u32> {
        Some(self.position_of(a)?.distance(self.position_of(b)?))
    }

    pub fn name_of(&self, id: CombatantId) -> &str {
        self.combatant(id).map_or("?", |c| c.name.as_str())
    }
}
