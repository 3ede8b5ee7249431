//! Arena worker that owns every live [`BattleSession`].
//!
//! All commands for all arenas go through one queue and run to completion one
//! at a time, so a session never sees two mutations at once. Timers post their
//! expiry back into the same queue.
use std::sync::Arc;

use battle_core::{
    ActionOutcome, ArenaId, BattleEngine, BattleEnv, BattleSession, Bestiary,
    Command as BattleCommand, CombatantId, Conclusion, Entrant, PcgRng, SetupError, TurnProgress,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::ArenaEvent;
use crate::presenter::Presenter;
use crate::registry::SessionRegistry;
use crate::repository::PlayerRepository;
use crate::timer::Timer;

/// Commands processed by the arena worker.
pub(crate) enum Command {
    /// Start a duel between two players.
    Challenge {
        arena: ArenaId,
        challenger: CombatantId,
        opponent: CombatantId,
        reply: oneshot::Sender<Result<BattleSession>>,
    },
    /// Start a 2v2 battle.
    TeamChallenge {
        arena: ArenaId,
        side_a: [CombatantId; 2],
        side_b: [CombatantId; 2],
        reply: oneshot::Sender<Result<BattleSession>>,
    },
    /// Start an encounter on a hunting ground.
    Hunt {
        arena: ArenaId,
        hunter: CombatantId,
        ground: String,
        reply: oneshot::Sender<Result<BattleSession>>,
    },
    /// Apply a battle command to the arena's session.
    Submit {
        arena: ArenaId,
        command: BattleCommand,
        reply: oneshot::Sender<Result<ActionOutcome>>,
    },
    /// Read-only snapshot of the arena's session.
    Query {
        arena: ArenaId,
        reply: oneshot::Sender<Option<BattleSession>>,
    },
    /// Turn timer expiry.
    Timeout {
        arena: ArenaId,
        epoch: u64,
        serial: u64,
    },
    /// Cell prompt timer expiry.
    PromptExpired {
        arena: ArenaId,
        epoch: u64,
        nonce: u64,
    },
}

pub(crate) struct ArenaWorker {
    registry: SessionRegistry,
    config: RuntimeConfig,
    rng: PcgRng,
    bestiary: Bestiary,
    repository: Arc<dyn PlayerRepository>,
    presenter: Arc<dyn Presenter>,
    command_rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::WeakSender<Command>,
    events: broadcast::Sender<ArenaEvent>,
}

pub(crate) struct WorkerParts {
    pub config: RuntimeConfig,
    pub seed: u64,
    pub bestiary: Bestiary,
    pub repository: Arc<dyn PlayerRepository>,
    pub presenter: Arc<dyn Presenter>,
}

impl ArenaWorker {
    pub(crate) fn new(
        parts: WorkerParts,
        command_rx: mpsc::Receiver<Command>,
        timer_tx: mpsc::WeakSender<Command>,
        events: broadcast::Sender<ArenaEvent>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(),
            config: parts.config,
            rng: PcgRng::new(parts.seed),
            bestiary: parts.bestiary,
            repository: parts.repository,
            presenter: parts.presenter,
            command_rx,
            timer_tx,
            events,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    self.handle_command(command).await;
                }
                else => break,
            }
        }
        debug!(
            target: "arena::worker",
            open_sessions = self.registry.len(),
            "command channel closed, worker stopping"
        );
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Challenge {
                arena,
                challenger,
                opponent,
                reply,
            } => {
                let result = self.start_duel(arena, challenger, opponent).await;
                respond(reply, result, "Challenge");
            }
            Command::TeamChallenge {
                arena,
                side_a,
                side_b,
                reply,
            } => {
                let result = self.start_team(arena, side_a, side_b).await;
                respond(reply, result, "TeamChallenge");
            }
            Command::Hunt {
                arena,
                hunter,
                ground,
                reply,
            } => {
                let result = self.start_hunt(arena, hunter, &ground).await;
                respond(reply, result, "Hunt");
            }
            Command::Submit {
                arena,
                command,
                reply,
            } => {
                let result = self.submit(arena, &command);
                respond(reply, result, "Submit");
            }
            Command::Query { arena, reply } => {
                let snapshot = self.registry.get(arena).cloned();
                respond(reply, snapshot, "Query");
            }
            Command::Timeout {
                arena,
                epoch,
                serial,
            } => self.time_out(arena, epoch, serial),
            Command::PromptExpired {
                arena,
                epoch,
                nonce,
            } => self.expire_prompt(arena, epoch, nonce),
        }
    }

    // ------------------------------------------------------------------------
    // Session start
    // ------------------------------------------------------------------------

    async fn start_duel(
        &mut self,
        arena: ArenaId,
        challenger: CombatantId,
        opponent: CombatantId,
    ) -> Result<BattleSession> {
        self.ensure_free(arena)?;
        let entrants = self.load_entrants(&[challenger, opponent]).await?;
        let session = BattleSession::duel(
            arena,
            &entrants[0],
            &entrants[1],
            &self.config.battle,
            &mut self.rng,
        )?;
        self.open(session, &entrants).await
    }

    async fn start_team(
        &mut self,
        arena: ArenaId,
        side_a: [CombatantId; 2],
        side_b: [CombatantId; 2],
    ) -> Result<BattleSession> {
        self.ensure_free(arena)?;
        let entrants = self
            .load_entrants(&[side_a[0], side_a[1], side_b[0], side_b[1]])
            .await?;
        let session = BattleSession::team(
            arena,
            [&entrants[0], &entrants[1]],
            [&entrants[2], &entrants[3]],
            &self.config.battle,
            &mut self.rng,
        )?;
        self.open(session, &entrants).await
    }

    async fn start_hunt(
        &mut self,
        arena: ArenaId,
        hunter: CombatantId,
        ground_id: &str,
    ) -> Result<BattleSession> {
        self.ensure_free(arena)?;
        let ground = self
            .bestiary
            .ground(ground_id)
            .ok_or_else(|| SetupError::UnknownGround(ground_id.to_owned()))?;
        let entrants = self.load_entrants(&[hunter]).await?;
        let session = BattleSession::encounter(
            arena,
            &entrants[0],
            ground,
            &self.config.battle,
            &mut self.rng,
        )?;
        self.open(session, &entrants).await
    }

    fn ensure_free(&self, arena: ArenaId) -> Result<()> {
        if self.registry.contains(arena) {
            debug!(target: "arena::worker", %arena, "arena busy");
            return Err(RuntimeError::ArenaBusy(arena));
        }
        Ok(())
    }

    async fn load_entrants(&self, ids: &[CombatantId]) -> Result<Vec<Entrant>> {
        let mut entrants = Vec::with_capacity(ids.len());
        for &id in ids {
            let profile = self.repository.get_profile(id).await?;
            entrants.push(Entrant::new(id, profile));
        }
        Ok(entrants)
    }

    /// Registers the session, arms the first turn timer, then clears rest
    /// buffs that were applied.
    async fn open(
        &mut self,
        session: BattleSession,
        entrants: &[Entrant],
    ) -> Result<BattleSession> {
        let arena = session.arena;
        let snapshot = session.clone();
        let (actor, serial) = (session.turn.current, session.turn.serial);

        let entry = self.registry.start(session)?;
        let epoch = entry.epoch();
        entry.set_turn_timer(turn_timer(&self.config, &self.timer_tx, arena, epoch, serial));
        self.presenter.present(entry.session());

        info!(
            target: "arena::worker",
            %arena,
            variant = %snapshot.variant,
            epoch,
            "session started"
        );
        self.publish(ArenaEvent::SessionStarted {
            arena,
            variant: snapshot.variant,
            participants: snapshot.combatants.iter().map(|c| c.id).collect(),
        });
        self.publish(ArenaEvent::TurnStarted {
            arena,
            actor,
            serial,
        });

        for entrant in entrants.iter().filter(|e| e.profile.rest_buff_active) {
            if let Err(error) = self.repository.consume_rest_buff(entrant.id).await {
                warn!(
                    target: "arena::worker",
                    %arena,
                    player = %entrant.id,
                    %error,
                    "failed to clear rest buff"
                );
                self.publish(ArenaEvent::RestBuffWriteFailed {
                    arena,
                    player: entrant.id,
                    error: error.to_string(),
                });
            }
        }

        Ok(snapshot)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    fn submit(&mut self, arena: ArenaId, command: &BattleCommand) -> Result<ActionOutcome> {
        let actor = command.actor();
        let entry = self
            .registry
            .entry_mut(arena)
            .ok_or(RuntimeError::NoSession(arena))?;

        let env = BattleEnv::new(&self.config.battle, &mut self.rng);
        let outcome = match BattleEngine::new(entry.session_mut()).execute(env, command) {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!(
                    target: "arena::worker",
                    %arena,
                    %actor,
                    command = %command.kind(),
                    %error,
                    "command rejected"
                );
                return Err(error.into());
            }
        };

        let epoch = entry.epoch();
        let mut follow_up = Vec::new();
        match outcome.progress {
            TurnProgress::Continues { .. } => {}
            TurnProgress::Advanced { actor, serial } => {
                entry.set_turn_timer(turn_timer(
                    &self.config,
                    &self.timer_tx,
                    arena,
                    epoch,
                    serial,
                ));
                follow_up.push(ArenaEvent::TurnStarted {
                    arena,
                    actor,
                    serial,
                });
            }
            TurnProgress::AwaitingCell { prompt } => {
                entry.set_prompt_timer(Timer::arm(
                    self.config.prompt_timeout,
                    self.timer_tx.clone(),
                    Command::PromptExpired {
                        arena,
                        epoch,
                        nonce: prompt.nonce,
                    },
                ));
                follow_up.push(ArenaEvent::PromptOpened { arena, prompt });
            }
            TurnProgress::Concluded(_) => {}
        }
        if entry.session().prompt.is_none() {
            entry.disarm_prompt_timer();
        }
        self.presenter.present(entry.session());

        debug!(
            target: "arena::worker",
            %arena,
            %actor,
            command = %command.kind(),
            monster_turns = outcome.monster_turns.len(),
            "command resolved"
        );
        self.publish(ArenaEvent::ActionResolved {
            arena,
            actor,
            outcome: outcome.clone(),
        });
        for event in follow_up {
            self.publish(event);
        }
        if let TurnProgress::Concluded(conclusion) = outcome.progress {
            self.close(arena, conclusion);
        }

        Ok(outcome)
    }

    fn time_out(&mut self, arena: ArenaId, epoch: u64, serial: u64) {
        let Some(entry) = self.registry.current_mut(arena, epoch) else {
            trace!(target: "arena::timer", %arena, epoch, "timer outlived its session");
            return;
        };
        let Some(conclusion) = BattleEngine::new(entry.session_mut()).time_out(serial) else {
            trace!(target: "arena::timer", %arena, serial, "stale turn timer");
            return;
        };
        self.presenter.present(entry.session());

        info!(target: "arena::timer", %arena, serial, "turn timed out");
        self.close(arena, conclusion);
    }

    fn expire_prompt(&mut self, arena: ArenaId, epoch: u64, nonce: u64) {
        let Some(entry) = self.registry.current_mut(arena, epoch) else {
            return;
        };
        let Some(prompt) = BattleEngine::new(entry.session_mut()).expire_prompt(nonce) else {
            trace!(target: "arena::timer", %arena, nonce, "stale prompt timer");
            return;
        };
        entry.disarm_prompt_timer();
        self.presenter.present(entry.session());

        info!(
            target: "arena::timer",
            %arena,
            actor = %prompt.actor,
            "cell prompt expired"
        );
        self.publish(ArenaEvent::PromptExpired { arena, prompt });
    }

    /// Removes a concluded session; dropping its entry cancels its timers.
    fn close(&mut self, arena: ArenaId, conclusion: Conclusion) {
        let Some(session) = self.registry.end(arena) else {
            return;
        };
        let winners = session.winners();
        info!(
            target: "arena::worker",
            %arena,
            winner = ?conclusion.winner,
            reason = ?conclusion.reason,
            "session concluded"
        );
        self.publish(ArenaEvent::SessionConcluded {
            arena,
            conclusion,
            winners,
        });
    }

    fn publish(&self, event: ArenaEvent) {
        if self.events.send(event).is_err() {
            trace!(target: "arena::worker", "no event subscribers");
        }
    }
}

fn turn_timer(
    config: &RuntimeConfig,
    tx: &mpsc::WeakSender<Command>,
    arena: ArenaId,
    epoch: u64,
    serial: u64,
) -> Timer {
    Timer::arm(
        config.turn_timeout,
        tx.clone(),
        Command::Timeout {
            arena,
            epoch,
            serial,
        },
    )
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "arena::worker", command, "reply channel closed (caller dropped)");
    }
}
