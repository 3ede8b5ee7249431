//! Events emitted by the arena worker for front-ends to observe.
//!
//! Consumers subscribe through [`crate::ArenaHandle::subscribe`]; publishing
//! never blocks the worker and events with no subscriber are dropped.
use battle_core::{
    ActionOutcome, ArenaId, CombatantId, Conclusion, PendingPrompt, Variant,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArenaEvent {
    SessionStarted {
        arena: ArenaId,
        variant: Variant,
        participants: Vec<CombatantId>,
    },
    /// A player's turn began and its timer was armed.
    TurnStarted {
        arena: ArenaId,
        actor: CombatantId,
        serial: u64,
    },
    ActionResolved {
        arena: ArenaId,
        actor: CombatantId,
        outcome: ActionOutcome,
    },
    PromptOpened {
        arena: ArenaId,
        prompt: PendingPrompt,
    },
    /// The prompt went unanswered and was cancelled at no cost.
    PromptExpired {
        arena: ArenaId,
        prompt: PendingPrompt,
    },
    SessionConcluded {
        arena: ArenaId,
        conclusion: Conclusion,
        winners: Vec<CombatantId>,
    },
    /// The rest buff was applied but could not be cleared in the repository.
    RestBuffWriteFailed {
        arena: ArenaId,
        player: CombatantId,
        error: String,
    },
}

impl ArenaEvent {
    pub fn arena(&self) -> ArenaId {
        match self {
            ArenaEvent::SessionStarted { arena, .. }
            | ArenaEvent::TurnStarted { arena, .. }
            | ArenaEvent::ActionResolved { arena, .. }
            | ArenaEvent::PromptOpened { arena, .. }
            | ArenaEvent::PromptExpired { arena, .. }
            | ArenaEvent::SessionConcluded { arena, .. }
            | ArenaEvent::RestBuffWriteFailed { arena, .. } => *arena,
        }
    }
}
