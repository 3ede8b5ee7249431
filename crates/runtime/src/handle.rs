//! Cloneable façade for issuing commands to the arena worker.
//!
//! [`ArenaHandle`] hides the channel plumbing. Every method is a request to
//! the worker and resolves once the worker has processed it.
use battle_core::{ActionOutcome, ArenaId, BattleSession, Command as BattleCommand, CombatantId};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::{Result, RuntimeError};
use crate::events::ArenaEvent;
use crate::worker::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct ArenaHandle {
    command_tx: mpsc::Sender<Command>,
    events: broadcast::Sender<ArenaEvent>,
}

impl ArenaHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        events: broadcast::Sender<ArenaEvent>,
    ) -> Self {
        Self { command_tx, events }
    }

    /// Starts a duel once both players agreed to it.
    pub async fn challenge(
        &self,
        arena: ArenaId,
        challenger: CombatantId,
        opponent: CombatantId,
    ) -> Result<BattleSession> {
        self.request(|reply| Command::Challenge {
            arena,
            challenger,
            opponent,
            reply,
        })
        .await?
    }

    /// Starts a 2v2 battle once all four players agreed to it.
    pub async fn team_challenge(
        &self,
        arena: ArenaId,
        side_a: [CombatantId; 2],
        side_b: [CombatantId; 2],
    ) -> Result<BattleSession> {
        self.request(|reply| Command::TeamChallenge {
            arena,
            side_a,
            side_b,
            reply,
        })
        .await?
    }

    /// Starts an encounter against a monster from `ground`.
    pub async fn hunt(
        &self,
        arena: ArenaId,
        hunter: CombatantId,
        ground: impl Into<String>,
    ) -> Result<BattleSession> {
        let ground = ground.into();
        self.request(|reply| Command::Hunt {
            arena,
            hunter,
            ground,
            reply,
        })
        .await?
    }

    /// Applies `command` to the battle in `arena`.
    pub async fn submit(&self, arena: ArenaId, command: BattleCommand) -> Result<ActionOutcome> {
        self.request(|reply| Command::Submit {
            arena,
            command,
            reply,
        })
        .await?
    }

    /// Snapshot of the battle in `arena`, if one is running.
    pub async fn session(&self, arena: ArenaId) -> Result<Option<BattleSession>> {
        self.request(|reply| Command::Query { arena, reply }).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.events.subscribe()
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
