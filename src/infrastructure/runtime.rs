//! Engine runtime - Assembles a running ward engine for one participant
//!
//! Starting a runtime registers the engine on a fresh dispatcher, reconciles
//! the characters the host already knows, then spawns the expiry sweeper and
//! the socket listener. `start_coordinator` does the same for a headless
//! coordinator seated in a room of this relay.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::application::ports::WardPorts;
use crate::application::services::{ArcaneWardService, NotificationDispatcher};
use crate::domain::value_objects::{ParticipantId, ParticipantRole};
use crate::infrastructure::broadcast::Inbox;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::memory_host::{InMemoryHost, ScriptedDialogs};
use crate::infrastructure::participants::SessionRoster;
use crate::infrastructure::random_adapter::ThreadRandom;
use crate::infrastructure::relay_bridge;
use crate::infrastructure::state::AppState;
use crate::infrastructure::workers::{expiry_sweeper, socket_listener};

pub struct EngineRuntime {
    pub participant: ParticipantId,
    pub engine: Arc<ArcaneWardService>,
    pub dispatcher: Arc<NotificationDispatcher>,
    workers: Vec<JoinHandle<()>>,
}

impl EngineRuntime {
    /// Register, reconcile and start the background workers
    pub async fn start<I>(config: &AppConfig, ports: WardPorts, inbox: I) -> Result<Self>
    where
        I: Inbox + 'static,
    {
        let participant = ports.participants.local_participant();
        let engine = ArcaneWardService::new(ports, config.engine_settings());
        let dispatcher = Arc::new(NotificationDispatcher::new());
        engine.register(&dispatcher).await;

        let reconciled = engine
            .initialize()
            .await
            .context("Startup reconciliation failed")?;
        tracing::info!(%participant, reconciled, "Ward engine started");

        let sweeper = {
            let dispatcher = dispatcher.clone();
            let interval = config.sweep_interval();
            tokio::spawn(async move {
                expiry_sweeper(dispatcher, interval).await;
            })
        };
        let listener = {
            let engine = engine.clone();
            tokio::spawn(async move {
                socket_listener(engine, inbox).await;
            })
        };

        Ok(Self {
            participant,
            engine,
            dispatcher,
            workers: vec![sweeper, listener],
        })
    }

    /// Stop the background workers
    pub fn shutdown(self) {
        for worker in self.workers {
            worker.abort();
        }
        tracing::info!(participant = %self.participant, "Ward engine stopped");
    }
}

/// Seat a headless coordinator in `room`
///
/// It keeps its own in-memory world, creates the chat messages players ask
/// for, and declines every prompt addressed to it.
pub async fn start_coordinator(state: &Arc<AppState>, room: &str) -> Result<EngineRuntime> {
    let config = &state.config;
    let localization = Arc::new(config.phrase_catalog()?);

    let participant = ParticipantId::new();
    let roster = SessionRoster::new();
    roster.join(participant, ParticipantRole::GameMaster);
    let (broadcast, inbox) =
        relay_bridge::attach(state.clone(), room, participant, ParticipantRole::GameMaster).await;

    let host = Arc::new(InMemoryHost::new());
    let ports = WardPorts {
        host: host.clone(),
        geometry: host.clone(),
        participants: Arc::new(roster.view(participant)),
        broadcast: Arc::new(broadcast),
        dialogs: Arc::new(ScriptedDialogs::new()),
        chat: host,
        localization,
        random: Arc::new(ThreadRandom::new()),
    };
    EngineRuntime::start(config, ports, inbox).await
}
