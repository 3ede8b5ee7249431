//! High-level runtime orchestrator.
//!
//! The runtime owns the arena worker, wires up the command and event
//! channels, and exposes a builder-based API for hosts.
use std::sync::Arc;

use battle_core::Bestiary;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::ArenaEvent;
use crate::handle::ArenaHandle;
use crate::presenter::{NullPresenter, Presenter};
use crate::repository::PlayerRepository;
use crate::worker::{ArenaWorker, Command, WorkerParts};

/// Main runtime that hosts every arena.
///
/// [`ArenaHandle`] provides a cloneable façade for clients.
pub struct ArenaRuntime {
    handle: ArenaHandle,
    worker: JoinHandle<()>,
}

impl ArenaRuntime {
    pub fn builder() -> ArenaRuntimeBuilder {
        ArenaRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> ArenaHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.handle.subscribe()
    }

    /// Shuts the worker down once every outstanding handle is dropped.
    /// Running sessions are discarded along with their timers.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`ArenaRuntime`].
pub struct ArenaRuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn PlayerRepository>>,
    presenter: Arc<dyn Presenter>,
    bestiary: Bestiary,
}

impl ArenaRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            presenter: Arc::new(NullPresenter),
            bestiary: Bestiary::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required player repository
    pub fn repository(mut self, repository: impl PlayerRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set a player repository the host keeps a reference to
    pub fn shared_repository(mut self, repository: Arc<dyn PlayerRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Arc::new(presenter);
        self
    }

    pub fn shared_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Replace the default hunting grounds
    pub fn bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = bestiary;
        self
    }

    /// Build the runtime and spawn its worker on the current tokio runtime.
    pub async fn build(self) -> Result<ArenaRuntime> {
        let repository = self.repository.ok_or(RuntimeError::MissingRepository)?;
        let seed = self.config.rng_seed.unwrap_or_else(rand::random);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) = broadcast::channel::<ArenaEvent>(self.config.event_buffer_size);

        info!(
            target: "arena::worker",
            seed,
            turn_timeout = ?self.config.turn_timeout,
            prompt_timeout = ?self.config.prompt_timeout,
            "arena runtime starting"
        );

        let worker = ArenaWorker::new(
            WorkerParts {
                config: self.config,
                seed,
                bestiary: self.bestiary,
                repository,
                presenter: self.presenter,
            },
            command_rx,
            command_tx.downgrade(),
            event_tx.clone(),
        );
        let worker = tokio::spawn(worker.run());

        Ok(ArenaRuntime {
            handle: ArenaHandle::new(command_tx, event_tx),
            worker,
        })
    }
}
