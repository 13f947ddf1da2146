//! Countdown driver dismissing displayed invites that were never answered.

use std::sync::Arc;

use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::{
    config::CoordinatorConfig,
    dao::backend::DuelStore,
    dto::invite::InviteStatus,
    state::{
        DisplaySlot, SharedSession,
        countdown::{Countdown, Tick},
    },
};

/// Drive the auto-expiry countdown for one session.
///
/// Restarts at the configured value whenever the displayed invite's identity
/// changes (promotion included), ticks once per configured period, and on
/// zero dismisses the invite and issues a best-effort remote `expired` mark
/// so the authoritative row does not stay pending forever. Exits when the
/// session shuts down.
pub async fn run(state: SharedSession, store: Arc<dyn DuelStore>, config: CoordinatorConfig) {
    let mut current_rx = state.current_watcher();
    let mut shutdown_rx = state.shutdown_watcher();
    let mut countdown = Countdown::default();
    let mut ticker = interval(config.countdown_tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut displayed: DisplaySlot = *current_rx.borrow_and_update();
    sync_countdown(&state, &mut countdown, &mut ticker, displayed, &config);

    loop {
        tokio::select! {
            changed = current_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                // compare generations, not ids: a dismissed invite re-arriving
                // before this task wakes still needs a fresh countdown
                let next = *current_rx.borrow_and_update();
                if next != displayed {
                    displayed = next;
                    sync_countdown(&state, &mut countdown, &mut ticker, displayed, &config);
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick(), if countdown.is_running() => {
                match countdown.tick() {
                    Tick::Running(remaining) => state.set_remaining(remaining),
                    Tick::Expired => {
                        state.set_remaining(0);
                        let Some(id) = displayed.id else { continue };
                        info!(invite = %id, "invite expired without a response");
                        state.dismiss_current().await;
                        if state.is_shutting_down() {
                            break;
                        }
                        // the local transition already happened; the remote
                        // mark must not be able to block or undo it
                        if let Err(err) = store.set_invite_status(id, InviteStatus::Expired).await {
                            warn!(invite = %id, error = %err, "failed to mark invite expired remotely");
                        }
                    }
                    Tick::Idle => {}
                }
            }
        }
    }
}

fn sync_countdown(
    state: &SharedSession,
    countdown: &mut Countdown,
    ticker: &mut Interval,
    displayed: DisplaySlot,
    config: &CoordinatorConfig,
) {
    match displayed.id {
        Some(_) => {
            countdown.start(config.countdown_seconds);
            state.set_remaining(config.countdown_seconds);
            ticker.reset();
        }
        None => {
            countdown.clear();
            state.set_remaining(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use time::OffsetDateTime;
    use tokio::time::sleep;
    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::memory::MemoryStore,
        dto::{
            invite::{ChallengerProfile, Invite, InviteId, Topic},
            profile::PlayerProfile,
        },
        state::SessionState,
    };

    fn profile(nickname: &str) -> PlayerProfile {
        PlayerProfile {
            id: Uuid::new_v4(),
            auth_id: format!("auth-{nickname}"),
            nickname: nickname.to_string(),
            level: 2,
            xp: 300,
            avatar: None,
        }
    }

    fn invite(id: InviteId) -> Invite {
        Invite {
            id,
            challenger_id: Uuid::new_v4(),
            challenged_id: Uuid::new_v4(),
            topic: Topic::Credit,
            status: InviteStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
            challenger: ChallengerProfile {
                nickname: "rival".into(),
                level: 9,
                xp: 8000,
                avatar: None,
            },
        }
    }

    fn setup(store: &MemoryStore) -> (SharedSession, tokio::task::JoinHandle<()>) {
        let state = SessionState::new(profile("me"), 16);
        let handle = tokio::spawn(run(
            state.clone(),
            Arc::new(store.clone()),
            CoordinatorConfig::default(),
        ));
        (state, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_starts_at_configured_value_and_decrements() {
        let store = MemoryStore::new();
        let (state, handle) = setup(&store);
        let remaining = state.remaining_watcher();

        state.invite_arrived(invite(Uuid::new_v4())).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(*remaining.borrow(), 30);

        sleep(Duration::from_millis(3100)).await;
        assert_eq!(*remaining.borrow(), 27);

        state.begin_shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn promotion_resets_countdown_to_full_value() {
        let store = MemoryStore::new();
        let (state, handle) = setup(&store);
        let remaining = state.remaining_watcher();

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        state.invite_arrived(invite(first)).await;
        state.invite_arrived(invite(second)).await;

        sleep(Duration::from_millis(5100)).await;
        assert_eq!(*remaining.borrow(), 25);

        // answering the first invite promotes the second; the countdown must
        // read the full value again, whatever it was before
        state.dismiss_current().await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(
            state.current_invite().await.map(|i| i.id),
            Some(second)
        );
        assert_eq!(*remaining.borrow(), 30);

        state.begin_shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn redisplay_of_same_invite_restarts_countdown() {
        let store = MemoryStore::new();
        let (state, handle) = setup(&store);
        let remaining = state.remaining_watcher();

        let row = invite(Uuid::new_v4());
        state.invite_arrived(row.clone()).await;
        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(*remaining.borrow(), 25);

        // dismiss and re-display the same id back to back; the watch channel
        // coalesces both transitions into one wakeup, and the countdown must
        // still restart rather than resume where it left off
        state.dismiss_current().await;
        state.invite_arrived(row).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(*remaining.borrow(), 30);

        state.begin_shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_dismisses_and_promotes_next_invite() {
        let store = MemoryStore::new();
        let challenger = profile("ada");
        let challenged = profile("bo");
        store.insert_profile(challenger.clone());
        store.insert_profile(challenged.clone());
        let first = store.push_invite(challenger.id, challenged.id, Topic::Debt);

        let (state, handle) = setup(&store);
        let remaining = state.remaining_watcher();

        let first_invite = store.fetch_invite(first).await.unwrap();
        state.invite_arrived(first_invite).await;
        let second = Uuid::new_v4();
        state.invite_arrived(invite(second)).await;

        sleep(Duration::from_millis(30_500)).await;

        // first invite expired, second one took the display slot
        assert_eq!(
            state.current_invite().await.map(|i| i.id),
            Some(second)
        );
        assert_eq!(*remaining.borrow(), 30);
        assert_eq!(store.invite_status(first), Some(InviteStatus::Expired));

        // the expired invite is gone for good
        assert!(!state
            .queued_invites()
            .await
            .iter()
            .any(|queued| queued.id == first));

        state.begin_shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_with_empty_queue_leaves_nothing_displayed() {
        let store = MemoryStore::new();
        let (state, handle) = setup(&store);

        state.invite_arrived(invite(Uuid::new_v4())).await;
        sleep(Duration::from_millis(30_500)).await;

        assert!(state.current_invite().await.is_none());
        assert_eq!(*state.remaining_watcher().borrow(), 0);

        state.begin_shutdown();
        handle.await.unwrap();
    }
}
