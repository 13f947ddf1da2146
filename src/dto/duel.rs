//! Duel records and the questions they are played with.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dto::invite::{ProfileId, Topic};

/// Unique identifier of a duel row in the managed store.
pub type DuelId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Lifecycle status of a duel record.
pub enum DuelStatus {
    /// Created, waiting for both players to join.
    Waiting,
    /// Both players are in; questions are being played.
    Active,
    /// All questions answered; scores are final.
    Finished,
}

impl DuelStatus {
    /// Lowercase wire token, as stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DuelStatus::Waiting => "waiting",
            DuelStatus::Active => "active",
            DuelStatus::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Head-to-head quiz session created once an invite is accepted.
///
/// This core never mutates duels; it only watches for their appearance to
/// trigger navigation.
pub struct Duel {
    /// Primary key of the duel row.
    pub id: DuelId,
    /// Player who issued the original invite.
    pub challenger_id: ProfileId,
    /// Player who accepted it.
    pub challenged_id: ProfileId,
    /// Category the duel is played on.
    pub topic: Topic,
    /// Remote lifecycle status.
    pub status: DuelStatus,
    /// Creation timestamp of the duel row.
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Single multiple-choice question produced by the content-generation service.
pub struct Question {
    /// Question text shown to both players.
    pub prompt: String,
    /// Answer options, in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub answer_index: usize,
    /// Optional explanation revealed after answering.
    pub explanation: Option<String>,
}
