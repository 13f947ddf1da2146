//! Session coordinator: owns one player's engine tasks from login to logout.

use std::sync::Arc;

use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    config::CoordinatorConfig,
    dao::{
        backend::{DuelStore, QuestionSource},
        realtime::RealtimeHub,
    },
    dto::{duel::DuelId, invite::InviteId, ui::UiEvent},
    error::ServiceError,
    services::{expiry, ingestor, respond},
    state::{SessionState, SharedSession},
};

/// One logged-in player's invite coordination engine.
///
/// Construction resolves the player's profile, builds the session state, and
/// spawns the realtime ingestor and the countdown driver against it. All
/// collaborators are injected; two coordinators for two players can run side
/// by side against the same store and hub without touching each other.
pub struct SessionCoordinator {
    state: SharedSession,
    store: Arc<dyn DuelStore>,
    questions: Arc<dyn QuestionSource>,
    config: CoordinatorConfig,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionCoordinator {
    /// Resolve the profile behind `auth_id` and start the engine for it.
    pub async fn start(
        auth_id: &str,
        store: Arc<dyn DuelStore>,
        questions: Arc<dyn QuestionSource>,
        realtime: &RealtimeHub,
        config: CoordinatorConfig,
    ) -> Result<Self, ServiceError> {
        let profile = store.resolve_profile(auth_id).await?;
        info!(profile = %profile.id, nickname = %profile.nickname, "session starting");

        let state = SessionState::new(profile, config.ui_channel_capacity);
        let tasks = vec![
            tokio::spawn(ingestor::run(
                state.clone(),
                store.clone(),
                config.clone(),
                realtime.subscribe_invites(),
                realtime.subscribe_duels(),
            )),
            tokio::spawn(expiry::run(state.clone(), store.clone(), config.clone())),
        ];

        Ok(Self {
            state,
            store,
            questions,
            config,
            tasks,
        })
    }

    /// Shared state handle, for watchers and direct inspection.
    pub fn state(&self) -> &SharedSession {
        &self.state
    }

    /// Subscribe to notices, navigation, and banner events.
    pub fn ui_events(&self) -> broadcast::Receiver<UiEvent> {
        self.state.ui().subscribe()
    }

    /// Accept the displayed invite, creating the duel.
    pub async fn accept(&self) -> Result<DuelId, ServiceError> {
        respond::accept_current(
            &self.state,
            self.store.as_ref(),
            self.questions.as_ref(),
            &self.config,
        )
        .await
    }

    /// Decline the displayed invite.
    pub async fn reject(&self) -> Result<(), ServiceError> {
        respond::reject_current(&self.state, self.store.as_ref()).await
    }

    /// Pull a queued invite into the display slot.
    pub async fn select_invite(&self, id: InviteId) -> bool {
        self.state.select_invite(id).await
    }

    /// Dismiss the displayed invite locally without answering it.
    pub async fn dismiss(&self) {
        self.state.dismiss_current().await;
    }

    /// Tear the session down: drop all local invites, signal the engine
    /// tasks, and wait for them to exit.
    pub async fn shutdown(self) {
        info!(profile = %self.state.profile_id(), "session shutting down");
        self.state.dismiss_all().await;
        self.state.begin_shutdown();
        for task in self.tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "engine task aborted during shutdown");
            }
        }
    }
}
