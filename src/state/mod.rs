//! Session-local mutable state: the invite dispatcher, countdown machine,
//! and the channels through which the rest of the engine observes them.

pub mod countdown;
pub mod invite_queue;
mod ui;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::dto::{
    invite::{Invite, InviteId, ProfileId},
    profile::PlayerProfile,
};

pub use self::invite_queue::{ArrivalOutcome, DismissOutcome, InviteQueue};
pub use self::ui::UiHub;

/// Shared handle to one session's state.
pub type SharedSession = Arc<SessionState>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Snapshot of the display slot carried on the current-invite channel.
///
/// `watch` receivers only ever see the latest value, so an id alone cannot
/// distinguish "nothing happened" from "dismissed and re-displayed before I
/// woke up". The generation is bumped on every slot change, making every
/// transition observable.
pub struct DisplaySlot {
    /// Incremented each time the displayed invite changes, re-displays of the
    /// same id included.
    pub generation: u64,
    /// Id of the displayed invite, if any.
    pub id: Option<InviteId>,
}

/// Mutable state owned by one logged-in player session.
///
/// Constructed explicitly at login and torn down at logout; nothing here is
/// ambient or shared across sessions. The invite queue is the single source
/// of local truth, and two `watch` channels derive from it: the id of the
/// displayed invite (driving the countdown) and the remaining seconds
/// (driving the rendered timer).
pub struct SessionState {
    profile: PlayerProfile,
    invites: RwLock<InviteQueue>,
    current: watch::Sender<DisplaySlot>,
    remaining: watch::Sender<u32>,
    ui: UiHub,
    shutdown: watch::Sender<bool>,
}

impl SessionState {
    /// Build the state for a freshly resolved profile, wrapped in an [`Arc`]
    /// so it can be cloned cheaply into the engine's tasks.
    pub fn new(profile: PlayerProfile, ui_capacity: usize) -> SharedSession {
        let (current, _) = watch::channel(DisplaySlot::default());
        let (remaining, _) = watch::channel(0);
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            profile,
            invites: RwLock::new(InviteQueue::new()),
            current,
            remaining,
            ui: UiHub::new(ui_capacity),
            shutdown,
        })
    }

    /// Profile this session belongs to.
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Internal profile id used to filter realtime events.
    pub fn profile_id(&self) -> ProfileId {
        self.profile.id
    }

    /// Dispatch a newly arrived invite into the display slot or the queue.
    pub async fn invite_arrived(&self, invite: Invite) -> ArrivalOutcome {
        let mut queue = self.invites.write().await;
        let outcome = queue.arrive(invite);
        self.publish_current(&queue);
        outcome
    }

    /// Dismiss the displayed invite, promoting the queue head when present.
    pub async fn dismiss_current(&self) -> DismissOutcome {
        let mut queue = self.invites.write().await;
        let outcome = queue.dismiss_current();
        self.publish_current(&queue);
        outcome
    }

    /// Display a queued invite, dropping whatever was displayed before.
    ///
    /// Returns `false` when the id is not queued.
    pub async fn select_invite(&self, id: InviteId) -> bool {
        let mut queue = self.invites.write().await;
        let selected = queue.select(id);
        self.publish_current(&queue);
        selected
    }

    /// Drop the displayed invite and the whole backlog.
    pub async fn dismiss_all(&self) {
        let mut queue = self.invites.write().await;
        queue.clear();
        self.publish_current(&queue);
    }

    /// Clone of the displayed invite, if any.
    pub async fn current_invite(&self) -> Option<Invite> {
        self.invites.read().await.current().cloned()
    }

    /// Clones of the queued invites in arrival order.
    pub async fn queued_invites(&self) -> Vec<Invite> {
        self.invites.read().await.queued().cloned().collect()
    }

    /// Watch the display slot, stamped so every transition is observable.
    pub fn current_watcher(&self) -> watch::Receiver<DisplaySlot> {
        self.current.subscribe()
    }

    /// Publish the seconds left on the displayed invite's countdown.
    pub fn set_remaining(&self, seconds: u32) {
        self.remaining.send_replace(seconds);
    }

    /// Watch the countdown seconds for display.
    pub fn remaining_watcher(&self) -> watch::Receiver<u32> {
        self.remaining.subscribe()
    }

    /// Hub carrying notices, navigation, and banner events.
    pub fn ui(&self) -> &UiHub {
        &self.ui
    }

    /// Flip the shutdown flag; engine tasks observe it and exit.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Whether teardown has started. Async continuations check this before
    /// applying any state mutation, so requests resolving after logout are
    /// discarded instead of mutating a dead session.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Watch the shutdown flag.
    pub fn shutdown_watcher(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    fn publish_current(&self, queue: &InviteQueue) {
        let id = queue.current_id();
        self.current.send_if_modified(|slot| {
            if slot.id != id {
                slot.generation = slot.generation.wrapping_add(1);
                slot.id = id;
                true
            } else {
                false
            }
        });
    }
}
