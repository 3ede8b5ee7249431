//! Arena battle driver binary.
//!
//! Composition root for local play: loads `.env`, installs logging, builds
//! the arena runtime over a JSON profile file and feeds it lines from stdin.
//!
//! # Environment
//!
//! - `ARENA_PROFILES`: JSON array of `{ "id": .., "profile": {..} }` records
//!   (default `profiles.json`)
//! - `ARENA_*`: runtime settings, see `arena_runtime::RuntimeConfig::from_env`
//! - `RUST_LOG`: log filter, logs go to stderr
//!
//! # Input
//!
//! ```text
//! 1 1 challenge 2     # player 1 challenges player 2 in arena 1
//! 1 1 move d d        # player 1 moves right twice
//! 1 2 attack          # player 2 attacks
//! 2 3 hunt meadow     # player 3 hunts in arena 2
//! ```
mod input;
mod view;

use anyhow::{Context, Result};
use arena_runtime::{
    ArenaEvent, ArenaHandle, ArenaRuntime, InMemoryPlayerRepository, RuntimeConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use input::Request;
use view::TextPresenter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let profiles = std::env::var("ARENA_PROFILES").unwrap_or_else(|_| "profiles.json".into());
    let repository = InMemoryPlayerRepository::from_json_file(&profiles)
        .with_context(|| format!("loading player profiles from {profiles}"))?;
    info!(path = %profiles, players = repository.len(), "profiles loaded");

    let runtime = ArenaRuntime::builder()
        .config(config)
        .repository(repository)
        .presenter(TextPresenter)
        .build()
        .await?;
    let handle = runtime.handle();
    tokio::spawn(log_events(runtime.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Request>() {
            Ok(request) => {
                if let Err(error) = dispatch(&handle, request).await {
                    println!("!! {error}");
                }
            }
            Err(error) => println!("?? {error}"),
        }
    }

    drop(handle);
    runtime.shutdown().await?;
    info!("input closed, arena driver stopped");
    Ok(())
}

async fn dispatch(handle: &ArenaHandle, request: Request) -> arena_runtime::Result<()> {
    match request {
        Request::Challenge {
            arena,
            challenger,
            opponent,
        } => {
            handle.challenge(arena, challenger, opponent).await?;
        }
        Request::TeamChallenge {
            arena,
            side_a,
            side_b,
        } => {
            handle.team_challenge(arena, side_a, side_b).await?;
        }
        Request::Hunt {
            arena,
            hunter,
            ground,
        } => {
            handle.hunt(arena, hunter, ground).await?;
        }
        Request::Battle { arena, command } => {
            handle.submit(arena, command).await?;
        }
        Request::Show { arena } => match handle.session(arena).await? {
            Some(session) => println!("{}", view::render(&session)),
            None => println!("-- no battle in {arena}"),
        },
    }
    Ok(())
}

/// Mirrors the event stream into the debug log and reports timeouts, which
/// happen without any input line to answer.
async fn log_events(mut events: broadcast::Receiver<ArenaEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Ok(json) = serde_json::to_string(&event) {
                    debug!(target: "arena::client", event = %json, "arena event");
                }
                match event {
                    ArenaEvent::SessionConcluded {
                        arena, conclusion, ..
                    } => println!("-- {arena} concluded: {:?}", conclusion.reason),
                    ArenaEvent::PromptExpired { arena, prompt } => {
                        println!("-- {arena}: cell choice for {} lapsed", prompt.actor)
                    }
                    ArenaEvent::RestBuffWriteFailed { player, error, .. } => {
                        warn!(target: "arena::client", %player, %error, "rest buff not cleared")
                    }
                    _ => {}
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(target: "arena::client", missed, "event stream lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
