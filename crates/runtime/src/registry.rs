//! Arena to session registry.
//!
//! An arena hosts at most one battle. Concluded sessions leave the registry
//! at once, so an occupied entry always holds an active session. Removing an
//! entry drops its timers, which cancels them.
use std::collections::HashMap;

use battle_core::{ArenaId, BattleSession};
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::timer::Timer;

/// A hosted session and the timers armed for it.
pub struct ArenaEntry {
    session: BattleSession,
    epoch: u64,
    turn_timer: Option<Timer>,
    prompt_timer: Option<Timer>,
}

impl ArenaEntry {
    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut BattleSession {
        &mut self.session
    }

    /// Distinguishes this session from earlier ones in the same arena.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_turn_timer(&self) -> bool {
        self.turn_timer.is_some()
    }

    pub fn has_prompt_timer(&self) -> bool {
        self.prompt_timer.is_some()
    }

    pub(crate) fn set_turn_timer(&mut self, timer: Timer) {
        self.turn_timer = Some(timer);
    }

    pub(crate) fn set_prompt_timer(&mut self, timer: Timer) {
        self.prompt_timer = Some(timer);
    }

    pub(crate) fn disarm_prompt_timer(&mut self) {
        self.prompt_timer = None;
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    arenas: HashMap<ArenaId, ArenaEntry>,
    next_epoch: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts `session` in its arena.
    pub fn start(&mut self, session: BattleSession) -> Result<&mut ArenaEntry> {
        let arena = session.arena;
        if self.arenas.contains_key(&arena) {
            return Err(RuntimeError::ArenaBusy(arena));
        }

        self.next_epoch += 1;
        debug!(target: "arena::registry", %arena, epoch = self.next_epoch, "session registered");
        let entry = ArenaEntry {
            session,
            epoch: self.next_epoch,
            turn_timer: None,
            prompt_timer: None,
        };
        Ok(self.arenas.entry(arena).or_insert(entry))
    }

    pub fn get(&self, arena: ArenaId) -> Option<&BattleSession> {
        self.arenas.get(&arena).map(ArenaEntry::session)
    }

    pub fn entry(&self, arena: ArenaId) -> Option<&ArenaEntry> {
        self.arenas.get(&arena)
    }

    pub fn entry_mut(&mut self, arena: ArenaId) -> Option<&mut ArenaEntry> {
        self.arenas.get_mut(&arena)
    }

    /// Entry for `arena`, only while it still hosts the session from `epoch`.
    pub fn current_mut(&mut self, arena: ArenaId, epoch: u64) -> Option<&mut ArenaEntry> {
        self.arenas
            .get_mut(&arena)
            .filter(|entry| entry.epoch == epoch)
    }

    /// Removes the session and cancels its timers.
    pub fn end(&mut self, arena: ArenaId) -> Option<BattleSession> {
        let entry = self.arenas.remove(&arena)?;
        debug!(target: "arena::registry", %arena, epoch = entry.epoch, "session removed");
        Some(entry.session)
    }

    pub fn contains(&self, arena: ArenaId) -> bool {
        self.arenas.contains_key(&arena)
    }

    pub fn len(&self) -> usize {
        self.arenas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arenas.is_empty()
    }
}
