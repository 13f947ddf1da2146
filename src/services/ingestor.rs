//! Realtime ingestion: turns row-change notifications into local state
//! transitions and UI events.

use std::sync::Arc;

use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::sleep,
};
use tracing::{debug, info, warn};

use crate::{
    config::CoordinatorConfig,
    dao::backend::DuelStore,
    dto::{
        duel::DuelStatus,
        invite::InviteStatus,
        realtime::{ChangeKind, DuelChange, InviteChange, InviteRow},
        ui::{Route, UiEvent},
    },
    state::{ArrivalOutcome, SharedSession},
};

const INVITE_ACCEPTED_NOTICE: &str = "Your duel invite was accepted!";
const INVITE_REJECTED_NOTICE: &str = "Your duel invite was declined.";

/// Consume the two realtime channels for one session until shutdown.
///
/// Changes are filtered by the session's profile id; everything concerning
/// other players is dropped here, before it can touch state. Handlers that
/// sleep (the duel poll, the navigation delay) run in their own tasks, so the
/// loop always drains the channels promptly. A lagged invite receiver means
/// notifications were overwritten before they could be read; that surfaces
/// the missed-invite banner, never a silent drop.
pub async fn run(
    state: SharedSession,
    store: Arc<dyn DuelStore>,
    config: CoordinatorConfig,
    mut invites_rx: broadcast::Receiver<InviteChange>,
    mut duels_rx: broadcast::Receiver<DuelChange>,
) {
    let mut shutdown_rx = state.shutdown_watcher();
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            received = invites_rx.recv() => match received {
                Ok(change) => handle_invite_change(&state, &store, &config, change).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "invite channel lagged; notifications were lost");
                    state.ui().broadcast(UiEvent::MissedInvite);
                }
                Err(RecvError::Closed) => break,
            },
            received = duels_rx.recv() => match received {
                Ok(change) => {
                    let state = state.clone();
                    let config = config.clone();
                    tokio::spawn(async move {
                        handle_duel_change(&state, &config, change).await;
                    });
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "duel channel lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn handle_invite_change(
    state: &SharedSession,
    store: &Arc<dyn DuelStore>,
    config: &CoordinatorConfig,
    change: InviteChange,
) {
    let me = state.profile_id();
    match change.kind {
        ChangeKind::Insert => {
            if change.row.challenged_id == me && change.row.status == InviteStatus::Pending {
                // handled inline so overlapping invites keep arrival order
                incoming_invite(state, store.as_ref(), config, &change.row).await;
            }
        }
        ChangeKind::Update => {
            if change.row.challenger_id != me {
                return;
            }
            match change.row.status {
                InviteStatus::Accepted => {
                    let state = state.clone();
                    let store = store.clone();
                    let config = config.clone();
                    tokio::spawn(async move {
                        invite_accepted(&state, store.as_ref(), &config, &change.row).await;
                    });
                }
                InviteStatus::Rejected => {
                    info!(invite = %change.row.id, "sent invite was declined");
                    state.ui().broadcast(UiEvent::info(INVITE_REJECTED_NOTICE));
                }
                InviteStatus::Pending | InviteStatus::Expired => {}
            }
        }
    }
}

/// Fetch the full invite (challenger join included) and dispatch it locally.
///
/// The notification row carries ids only, so a detail fetch is required
/// before anything can be shown. The fetch is retried on a bounded doubling
/// schedule; once exhausted the player is told an invite was missed instead
/// of the event vanishing silently.
async fn incoming_invite(
    state: &SharedSession,
    store: &dyn DuelStore,
    config: &CoordinatorConfig,
    row: &InviteRow,
) {
    let mut delay = config.invite_fetch_initial_delay;
    for attempt in 1..=config.invite_fetch_attempts {
        match store.fetch_invite(row.id).await {
            Ok(invite) => {
                if state.is_shutting_down() {
                    return;
                }
                match state.invite_arrived(invite).await {
                    ArrivalOutcome::Displayed => {
                        info!(invite = %row.id, "incoming invite displayed");
                    }
                    ArrivalOutcome::Enqueued => {
                        info!(invite = %row.id, "incoming invite queued behind the displayed one");
                    }
                    ArrivalOutcome::Duplicate => {
                        debug!(invite = %row.id, "duplicate invite notification ignored");
                    }
                }
                return;
            }
            Err(err) => {
                warn!(
                    invite = %row.id,
                    attempt,
                    error = %err,
                    "failed to fetch invite details"
                );
            }
        }
        if attempt < config.invite_fetch_attempts {
            sleep(delay).await;
            delay = (delay * 2).min(config.invite_fetch_max_delay);
        }
        if state.is_shutting_down() {
            return;
        }
    }
    if !state.is_shutting_down() {
        state.ui().broadcast(UiEvent::MissedInvite);
    }
}

/// React to one of this player's sent invites being accepted: announce it,
/// then poll for the duel row the acceptor is creating and navigate to it.
///
/// The duel is created by the other player after flipping the invite status,
/// so it may not exist yet when the notification lands. The poll schedule is
/// fixed; when it runs out the duel still shows up in the regular list and
/// nothing is lost beyond the automatic navigation.
async fn invite_accepted(
    state: &SharedSession,
    store: &dyn DuelStore,
    config: &CoordinatorConfig,
    row: &InviteRow,
) {
    info!(invite = %row.id, "sent invite was accepted");
    state.ui().broadcast(UiEvent::success(INVITE_ACCEPTED_NOTICE));

    for delay in &config.duel_poll_delays {
        sleep(*delay).await;
        if state.is_shutting_down() {
            return;
        }
        match store
            .find_duel_between(row.challenger_id, row.challenged_id, DuelStatus::Waiting)
            .await
        {
            Ok(Some(duel)) => {
                info!(duel = %duel.id, "duel found after accept; navigating");
                state.ui().broadcast(UiEvent::Navigate(Route::Duel { id: duel.id }));
                return;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(invite = %row.id, error = %err, "duel lookup failed");
            }
        }
    }
    warn!(invite = %row.id, "no duel appeared after accept; giving up on auto-navigation");
}

/// Navigate to a duel this player takes part in once it goes live.
///
/// The short pause keeps any toast from the accept flow readable before the
/// screen switches.
async fn handle_duel_change(state: &SharedSession, config: &CoordinatorConfig, change: DuelChange) {
    if !change.row.involves(state.profile_id()) {
        return;
    }
    if !matches!(change.row.status, DuelStatus::Waiting | DuelStatus::Active) {
        return;
    }
    sleep(config.duel_nav_delay).await;
    if state.is_shutting_down() {
        return;
    }
    info!(duel = %change.row.id, "duel is live; navigating");
    state
        .ui()
        .broadcast(UiEvent::Navigate(Route::Duel { id: change.row.id }));
}
