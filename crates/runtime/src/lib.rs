//! Async orchestration for arena battles.
//!
//! `battle-core` resolves one command against one session; this crate owns
//! everything around it: the arena to session registry, per-turn and
//! sub-prompt timers, player profile lookup, and a single worker task that
//! applies commands one at a time. Consumers drive it through
//! [`ArenaHandle`] and observe it through the [`ArenaEvent`] stream.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`handle`] is the cloneable client façade
//! - [`registry`] tracks which arena hosts which session
//! - [`repository`] and [`presenter`] are the collaborator seams
pub mod config;
pub mod error;
pub mod events;
pub mod handle;
pub mod presenter;
pub mod registry;
pub mod repository;
pub mod runtime;

mod timer;
mod worker;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::ArenaEvent;
pub use handle::ArenaHandle;
pub use presenter::{NullPresenter, Presenter};
pub use registry::{ArenaEntry, SessionRegistry};
pub use repository::{InMemoryPlayerRepository, PlayerRepository, RepositoryError};
pub use runtime::{ArenaRuntime, ArenaRuntimeBuilder};
