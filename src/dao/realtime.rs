//! Broadcast hub standing in for the external push transport.

use tokio::sync::broadcast;

use crate::dto::realtime::{DuelChange, InviteChange};

/// In-process representation of the external push transport.
///
/// The managed backend delivers row-change notifications over two logical
/// channels, one per watched table. A transport adapter feeds changes in via
/// the publish methods; sessions subscribe with their own receivers and apply
/// profile-id filtering on their side. Reconnection and backoff of the real
/// transport remain the transport's responsibility.
pub struct RealtimeHub {
    invites: broadcast::Sender<InviteChange>,
    duels: broadcast::Sender<DuelChange>,
}

impl RealtimeHub {
    /// Build the hub with per-channel capacities.
    pub fn new(invite_capacity: usize, duel_capacity: usize) -> Self {
        let (invites, _) = broadcast::channel(invite_capacity);
        let (duels, _) = broadcast::channel(duel_capacity);
        Self { invites, duels }
    }

    /// Register a subscriber for invite-table changes.
    pub fn subscribe_invites(&self) -> broadcast::Receiver<InviteChange> {
        self.invites.subscribe()
    }

    /// Register a subscriber for duel-table changes.
    pub fn subscribe_duels(&self) -> broadcast::Receiver<DuelChange> {
        self.duels.subscribe()
    }

    /// Fan an invite-table change out to all subscribers, ignoring delivery
    /// errors when nobody is listening.
    pub fn publish_invite(&self, change: InviteChange) {
        let _ = self.invites.send(change);
    }

    /// Fan a duel-table change out to all subscribers.
    pub fn publish_duel(&self, change: DuelChange) {
        let _ = self.duels.send(change);
    }
}
