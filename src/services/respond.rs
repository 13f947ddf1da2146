//! Accept/reject side effects for the displayed invite.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    config::CoordinatorConfig,
    dao::backend::{CreateDuel, DuelStore, QuestionSource},
    dto::{
        duel::DuelId,
        invite::{Invite, InviteStatus},
        ui::{Route, UiEvent},
    },
    error::ServiceError,
    state::SharedSession,
};

const ACCEPT_FAILED_NOTICE: &str = "Could not start the duel. Please try again.";
const REJECT_FAILED_NOTICE: &str = "Could not decline the invite. Please try again.";

/// Accept the currently displayed invite.
///
/// Generates the question set, creates the duel through the remote procedure,
/// marks the invite accepted, dismisses it locally, and schedules navigation
/// to the duel list. Any step's failure aborts the sequence, emits exactly
/// one destructive notice, and leaves the invite displayed so the player can
/// retry. No partial-state cleanup is attempted: questions generated before a
/// later failure are simply discarded, they are never persisted on their own.
pub async fn accept_current(
    state: &SharedSession,
    store: &dyn DuelStore,
    questions: &dyn QuestionSource,
    config: &CoordinatorConfig,
) -> Result<DuelId, ServiceError> {
    let invite = state
        .current_invite()
        .await
        .ok_or(ServiceError::NoCurrentInvite)?;

    match run_accept(state, store, questions, config, &invite).await {
        Ok(duel_id) => Ok(duel_id),
        Err(err) => {
            warn!(invite = %invite.id, error = %err, "accept sequence failed");
            if !state.is_shutting_down() && !matches!(err, ServiceError::ShuttingDown) {
                state.ui().broadcast(UiEvent::destructive(ACCEPT_FAILED_NOTICE));
            }
            Err(err)
        }
    }
}

async fn run_accept(
    state: &SharedSession,
    store: &dyn DuelStore,
    questions: &dyn QuestionSource,
    config: &CoordinatorConfig,
    invite: &Invite,
) -> Result<DuelId, ServiceError> {
    let generated = questions
        .generate(invite.topic, config.question_count)
        .await
        .map_err(|source| ServiceError::QuestionGeneration { source })?;
    if generated.is_empty() {
        return Err(ServiceError::EmptyQuestionSet);
    }

    if state.is_shutting_down() {
        return Err(ServiceError::ShuttingDown);
    }

    let duel_id = store
        .create_duel(CreateDuel {
            challenger_id: invite.challenger_id,
            challenged_id: invite.challenged_id,
            topic: invite.topic,
            questions: generated,
        })
        .await?;

    store
        .set_invite_status(invite.id, InviteStatus::Accepted)
        .await?;

    if state.is_shutting_down() {
        return Err(ServiceError::ShuttingDown);
    }

    state.dismiss_current().await;
    state.ui().broadcast(UiEvent::success("Duel accepted!"));
    info!(invite = %invite.id, duel = %duel_id, "invite accepted, duel created");

    sleep(config.accept_nav_delay).await;
    if state.is_shutting_down() {
        return Err(ServiceError::ShuttingDown);
    }
    state.ui().broadcast(UiEvent::Navigate(Route::DuelList));

    Ok(duel_id)
}

/// Decline the currently displayed invite.
///
/// The status mutation is awaited and its failure surfaced, so a silently
/// un-declined invite cannot linger on the challenger's side.
pub async fn reject_current(
    state: &SharedSession,
    store: &dyn DuelStore,
) -> Result<(), ServiceError> {
    let invite = state
        .current_invite()
        .await
        .ok_or(ServiceError::NoCurrentInvite)?;

    match store
        .set_invite_status(invite.id, InviteStatus::Rejected)
        .await
    {
        Ok(()) => {
            if state.is_shutting_down() {
                return Err(ServiceError::ShuttingDown);
            }
            state.dismiss_current().await;
            state.ui().broadcast(UiEvent::info("Invite declined."));
            info!(invite = %invite.id, "invite declined");
            Ok(())
        }
        Err(err) => {
            warn!(invite = %invite.id, error = %err, "failed to decline invite");
            if !state.is_shutting_down() {
                state.ui().broadcast(UiEvent::destructive(REJECT_FAILED_NOTICE));
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;
    use tokio::sync::broadcast::error::TryRecvError;
    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::{
            backend::{BackendError, BackendResult},
            memory::{MemoryStore, QuestionBank},
        },
        dto::{
            duel::{Duel, DuelStatus, Question},
            invite::{InviteId, ProfileId, Topic},
            profile::PlayerProfile,
            ui::NoticeKind,
        },
        state::SessionState,
    };

    fn profile(nickname: &str) -> PlayerProfile {
        PlayerProfile {
            id: Uuid::new_v4(),
            auth_id: format!("auth-{nickname}"),
            nickname: nickname.to_string(),
            level: 4,
            xp: 1200,
            avatar: None,
        }
    }

    /// Seed a store with a challenger profile plus a pending invite, and
    /// return the session state for the challenged player with that invite
    /// displayed.
    async fn displayed_invite(
        store: &MemoryStore,
    ) -> (SharedSession, PlayerProfile, PlayerProfile, InviteId) {
        let challenger = profile("ada");
        let challenged = profile("bo");
        store.insert_profile(challenger.clone());
        store.insert_profile(challenged.clone());
        let invite_id = store.push_invite(challenger.id, challenged.id, Topic::Saving);

        let state = SessionState::new(challenged.clone(), 16);
        let invite = store.fetch_invite(invite_id).await.unwrap();
        state.invite_arrived(invite).await;

        (state, challenger, challenged, invite_id)
    }

    struct EmptyQuestions;

    impl QuestionSource for EmptyQuestions {
        fn generate(
            &self,
            _topic: Topic,
            _count: usize,
        ) -> BoxFuture<'static, BackendResult<Vec<Question>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    struct BrokenStore;

    fn unreachable_store_error() -> BackendError {
        BackendError::unavailable(
            "store offline".into(),
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        )
    }

    impl DuelStore for BrokenStore {
        fn resolve_profile(
            &self,
            _auth_id: &str,
        ) -> BoxFuture<'static, BackendResult<PlayerProfile>> {
            Box::pin(async { Err(unreachable_store_error()) })
        }

        fn fetch_invite(&self, _id: InviteId) -> BoxFuture<'static, BackendResult<Invite>> {
            Box::pin(async { Err(unreachable_store_error()) })
        }

        fn set_invite_status(
            &self,
            _id: InviteId,
            _status: InviteStatus,
        ) -> BoxFuture<'static, BackendResult<()>> {
            Box::pin(async { Err(unreachable_store_error()) })
        }

        fn create_duel(
            &self,
            _request: CreateDuel,
        ) -> BoxFuture<'static, BackendResult<DuelId>> {
            Box::pin(async { Err(unreachable_store_error()) })
        }

        fn find_duel_between(
            &self,
            _a: ProfileId,
            _b: ProfileId,
            _status: DuelStatus,
        ) -> BoxFuture<'static, BackendResult<Option<Duel>>> {
            Box::pin(async { Ok(None) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn accept_creates_duel_and_navigates_after_delay() {
        let store = MemoryStore::new();
        let (state, challenger, challenged, invite_id) = displayed_invite(&store).await;
        let mut ui = state.ui().subscribe();
        let config = CoordinatorConfig::default();

        let duel_id = accept_current(&state, &store, &QuestionBank, &config)
            .await
            .unwrap();

        assert_eq!(store.invite_status(invite_id), Some(InviteStatus::Accepted));
        let duel = store
            .find_duel_between(challenger.id, challenged.id, DuelStatus::Waiting)
            .await
            .unwrap()
            .expect("duel record created");
        assert_eq!(duel.id, duel_id);
        assert_eq!(duel.topic, Topic::Saving);

        assert!(state.current_invite().await.is_none());
        assert_eq!(ui.recv().await.unwrap(), UiEvent::success("Duel accepted!"));
        assert_eq!(
            ui.recv().await.unwrap(),
            UiEvent::Navigate(Route::DuelList)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_question_set_leaves_invite_retryable() {
        let store = MemoryStore::new();
        let (state, _, _, invite_id) = displayed_invite(&store).await;
        let mut ui = state.ui().subscribe();
        let config = CoordinatorConfig::default();

        let err = accept_current(&state, &store, &EmptyQuestions, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmptyQuestionSet));

        // the invite is still displayed and still pending remotely
        assert_eq!(
            state.current_invite().await.map(|invite| invite.id),
            Some(invite_id)
        );
        assert_eq!(store.invite_status(invite_id), Some(InviteStatus::Pending));

        // exactly one destructive notice
        match ui.recv().await.unwrap() {
            UiEvent::Notice { kind, .. } => assert_eq!(kind, NoticeKind::Destructive),
            other => panic!("expected destructive notice, got {other:?}"),
        }
        assert_eq!(ui.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn duel_creation_failure_keeps_invite_displayed() {
        let seeded = MemoryStore::new();
        let (state, _, _, invite_id) = displayed_invite(&seeded).await;
        let mut ui = state.ui().subscribe();
        let config = CoordinatorConfig::default();

        let err = accept_current(&state, &BrokenStore, &QuestionBank, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        assert_eq!(
            state.current_invite().await.map(|invite| invite.id),
            Some(invite_id)
        );
        match ui.recv().await.unwrap() {
            UiEvent::Notice { kind, .. } => assert_eq!(kind, NoticeKind::Destructive),
            other => panic!("expected destructive notice, got {other:?}"),
        }
        assert_eq!(ui.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn reject_marks_remote_row_and_dismisses() {
        let store = MemoryStore::new();
        let (state, _, _, invite_id) = displayed_invite(&store).await;
        let mut ui = state.ui().subscribe();

        reject_current(&state, &store).await.unwrap();

        assert_eq!(store.invite_status(invite_id), Some(InviteStatus::Rejected));
        assert!(state.current_invite().await.is_none());
        assert_eq!(ui.recv().await.unwrap(), UiEvent::info("Invite declined."));
    }

    #[tokio::test]
    async fn reject_failure_is_surfaced_and_invite_stays() {
        let seeded = MemoryStore::new();
        let (state, _, _, invite_id) = displayed_invite(&seeded).await;
        let mut ui = state.ui().subscribe();

        let err = reject_current(&state, &BrokenStore).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        assert_eq!(
            state.current_invite().await.map(|invite| invite.id),
            Some(invite_id)
        );
        match ui.recv().await.unwrap() {
            UiEvent::Notice { kind, .. } => assert_eq!(kind, NoticeKind::Destructive),
            other => panic!("expected destructive notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn accept_without_displayed_invite_is_rejected() {
        let state = SessionState::new(profile("solo"), 16);
        let store = MemoryStore::new();
        let config = CoordinatorConfig::default();

        let err = accept_current(&state, &store, &QuestionBank, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoCurrentInvite));
    }
}
