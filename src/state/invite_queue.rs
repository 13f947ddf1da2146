//! Single-display invite dispatcher with a FIFO backlog.

use indexmap::IndexMap;

use crate::dto::invite::{Invite, InviteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an arriving invite was dispatched.
pub enum ArrivalOutcome {
    /// No invite was displayed; this one became current.
    Displayed,
    /// Another invite is displayed; this one joined the queue tail.
    Enqueued,
    /// The id is already current or queued; the arrival was ignored.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of dismissing the displayed invite.
pub enum DismissOutcome {
    /// The queue head was promoted into the display slot.
    Promoted(InviteId),
    /// The queue was empty; nothing is displayed anymore.
    Cleared,
    /// No invite was displayed in the first place.
    NothingDisplayed,
}

/// Dispatcher state for one session: the single displayed invite plus the
/// FIFO backlog of invites waiting behind it.
///
/// The queue is keyed by invite id in arrival order, so duplicate ids are
/// structurally impossible and promotion order matches arrival order.
#[derive(Debug, Default)]
pub struct InviteQueue {
    current: Option<Invite>,
    queued: IndexMap<InviteId, Invite>,
}

impl InviteQueue {
    /// Create an empty dispatcher state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The invite currently displayed, if any.
    pub fn current(&self) -> Option<&Invite> {
        self.current.as_ref()
    }

    /// Id of the displayed invite, if any.
    pub fn current_id(&self) -> Option<InviteId> {
        self.current.as_ref().map(|invite| invite.id)
    }

    /// Queued invites in arrival order, excluding the displayed one.
    pub fn queued(&self) -> impl Iterator<Item = &Invite> {
        self.queued.values()
    }

    /// Number of invites waiting behind the displayed one.
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Whether the id is present either as current or in the queue.
    pub fn contains(&self, id: InviteId) -> bool {
        self.current_id() == Some(id) || self.queued.contains_key(&id)
    }

    /// Whether neither a displayed invite nor a backlog exists.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queued.is_empty()
    }

    /// Dispatch a newly arrived invite: display it when the slot is free,
    /// queue it otherwise. An id already known to this session is ignored so
    /// the same invite can never be shown twice.
    pub fn arrive(&mut self, invite: Invite) -> ArrivalOutcome {
        if self.contains(invite.id) {
            return ArrivalOutcome::Duplicate;
        }

        if self.current.is_none() {
            self.current = Some(invite);
            ArrivalOutcome::Displayed
        } else {
            self.queued.insert(invite.id, invite);
            ArrivalOutcome::Enqueued
        }
    }

    /// Drop the displayed invite and promote the queue head when present.
    pub fn dismiss_current(&mut self) -> DismissOutcome {
        if self.current.take().is_none() {
            return DismissOutcome::NothingDisplayed;
        }

        match self.queued.shift_remove_index(0) {
            Some((id, invite)) => {
                self.current = Some(invite);
                DismissOutcome::Promoted(id)
            }
            None => DismissOutcome::Cleared,
        }
    }

    /// Move a queued invite into the display slot.
    ///
    /// Returns `false` when the id is not queued. The invite that was
    /// displayed, if any, is dropped rather than re-queued.
    pub fn select(&mut self, id: InviteId) -> bool {
        match self.queued.shift_remove(&id) {
            Some(invite) => {
                self.current = Some(invite);
                true
            }
            None => false,
        }
    }

    /// Drop the displayed invite and the whole backlog (logout).
    pub fn clear(&mut self) {
        self.current = None;
        self.queued.clear();
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::dto::invite::{ChallengerProfile, InviteStatus, Topic};

    fn invite(nickname: &str) -> Invite {
        Invite {
            id: Uuid::new_v4(),
            challenger_id: Uuid::new_v4(),
            challenged_id: Uuid::new_v4(),
            topic: Topic::Budgeting,
            status: InviteStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
            challenger: ChallengerProfile {
                nickname: nickname.to_string(),
                level: 3,
                xp: 900,
                avatar: None,
            },
        }
    }

    #[test]
    fn first_arrival_is_displayed_rest_are_queued() {
        let mut queue = InviteQueue::new();
        let a = invite("a");
        let b = invite("b");
        let c = invite("c");

        assert_eq!(queue.arrive(a.clone()), ArrivalOutcome::Displayed);
        assert_eq!(queue.arrive(b.clone()), ArrivalOutcome::Enqueued);
        assert_eq!(queue.arrive(c.clone()), ArrivalOutcome::Enqueued);

        assert_eq!(queue.current_id(), Some(a.id));
        assert_eq!(queue.queued_len(), 2);
    }

    #[test]
    fn dismissal_promotes_in_arrival_order() {
        let mut queue = InviteQueue::new();
        let a = invite("a");
        let b = invite("b");
        let c = invite("c");
        queue.arrive(a.clone());
        queue.arrive(b.clone());
        queue.arrive(c.clone());

        assert_eq!(queue.dismiss_current(), DismissOutcome::Promoted(b.id));
        assert_eq!(queue.current_id(), Some(b.id));
        assert_eq!(queue.dismiss_current(), DismissOutcome::Promoted(c.id));
        assert_eq!(queue.dismiss_current(), DismissOutcome::Cleared);
        assert_eq!(queue.dismiss_current(), DismissOutcome::NothingDisplayed);
        assert!(queue.is_empty());
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let mut queue = InviteQueue::new();
        let a = invite("a");
        let b = invite("b");
        queue.arrive(a.clone());
        queue.arrive(b.clone());

        assert_eq!(queue.arrive(a.clone()), ArrivalOutcome::Duplicate);
        assert_eq!(queue.arrive(b.clone()), ArrivalOutcome::Duplicate);
        assert_eq!(queue.queued_len(), 1);
        assert_eq!(queue.current_id(), Some(a.id));
    }

    #[test]
    fn select_moves_invite_out_of_queue_exactly_once() {
        let mut queue = InviteQueue::new();
        let a = invite("a");
        let b = invite("b");
        let c = invite("c");
        queue.arrive(a.clone());
        queue.arrive(b.clone());
        queue.arrive(c.clone());

        assert!(queue.select(c.id));
        assert_eq!(queue.current_id(), Some(c.id));
        // c must not linger in the queue, and a (the displaced current) is
        // dropped rather than re-queued.
        assert!(!queue.contains(a.id));
        assert_eq!(queue.queued().map(|i| i.id).collect::<Vec<_>>(), vec![b.id]);

        assert!(!queue.select(c.id));
        assert!(!queue.select(a.id));
    }

    #[test]
    fn clear_empties_both_slots() {
        let mut queue = InviteQueue::new();
        queue.arrive(invite("a"));
        queue.arrive(invite("b"));

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.current_id(), None);
    }

    #[test]
    fn at_most_one_current_for_any_arrival_sequence() {
        let mut queue = InviteQueue::new();
        for index in 0..10 {
            queue.arrive(invite(&format!("player-{index}")));
            let displayed = usize::from(queue.current().is_some());
            assert_eq!(displayed + queue.queued_len(), index + 1);
            assert_eq!(displayed, 1);
        }
    }
}
