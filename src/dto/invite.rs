//! Invite rows and the vocabulary types they share with the rest of the crate.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier of an invite row in the managed store.
pub type InviteId = Uuid;

/// Unique identifier of a player profile in the managed store.
pub type ProfileId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Lifecycle status of an invite as persisted remotely.
pub enum InviteStatus {
    /// Delivered but not yet answered.
    Pending,
    /// The challenged player accepted; a duel is being created.
    Accepted,
    /// The challenged player declined.
    Rejected,
    /// The invite timed out without an answer.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Quiz category a duel is played on.
pub enum Topic {
    /// Planning income and expenses.
    Budgeting,
    /// Emergency funds and savings habits.
    Saving,
    /// Stocks, funds, and long-term growth.
    Investing,
    /// Credit scores, cards, and borrowing.
    Credit,
    /// Loans and debt management.
    Debt,
    /// Income tax basics.
    Taxes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Challenger display data joined onto an invite at fetch time.
///
/// Not authoritative; this is a read-time denormalisation used purely for
/// rendering the invite card.
pub struct ChallengerProfile {
    /// Display name chosen by the challenger.
    pub nickname: String,
    /// Current level of the challenger.
    pub level: u32,
    /// Accumulated experience points.
    pub xp: u64,
    /// Storage reference of the challenger's avatar, if any.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A pending challenge from one player to another for a quiz duel.
pub struct Invite {
    /// Primary key of the invite row.
    pub id: InviteId,
    /// Profile of the player who sent the challenge.
    pub challenger_id: ProfileId,
    /// Profile of the player being challenged.
    pub challenged_id: ProfileId,
    /// Category the duel will be played on.
    pub topic: Topic,
    /// Remote lifecycle status at fetch time.
    pub status: InviteStatus,
    /// Creation timestamp of the invite row.
    pub created_at: OffsetDateTime,
    /// Joined challenger display data.
    pub challenger: ChallengerProfile,
}
