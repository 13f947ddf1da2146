//! Row-change notifications delivered over the push transport.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::dto::{
    duel::{DuelId, DuelStatus},
    invite::{InviteId, InviteStatus, ProfileId, Topic},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Kind of row change carried by a realtime notification.
pub enum ChangeKind {
    /// A new row was created.
    Insert,
    /// An existing row was updated.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Raw invite row as delivered by the push channel, without the challenger
/// join. Full details are fetched separately before the invite is shown.
pub struct InviteRow {
    /// Primary key of the invite.
    pub id: InviteId,
    /// Player who sent the challenge.
    pub challenger_id: ProfileId,
    /// Player being challenged.
    pub challenged_id: ProfileId,
    /// Category the duel will be played on.
    pub topic: Topic,
    /// Status after the change.
    pub status: InviteStatus,
    /// Creation timestamp of the row.
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Change notification for the invite table.
pub struct InviteChange {
    /// Whether the row was inserted or updated.
    pub kind: ChangeKind,
    /// The changed row.
    pub row: InviteRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Raw duel row as delivered by the push channel.
pub struct DuelRow {
    /// Primary key of the duel.
    pub id: DuelId,
    /// Player who issued the original invite.
    pub challenger_id: ProfileId,
    /// Player who accepted it.
    pub challenged_id: ProfileId,
    /// Status after the change.
    pub status: DuelStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Change notification for the duel table.
pub struct DuelChange {
    /// Whether the row was inserted or updated.
    pub kind: ChangeKind,
    /// The changed row.
    pub row: DuelRow,
}

impl DuelRow {
    /// Whether the given profile takes part in this duel.
    pub fn involves(&self, profile: ProfileId) -> bool {
        self.challenger_id == profile || self.challenged_id == profile
    }
}
