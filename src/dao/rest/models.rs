//! Row shapes exchanged with the REST API, kept separate from the domain
//! types so API renames stay contained here.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::dto::{
    duel::{Duel, DuelId, DuelStatus, Question},
    invite::{ChallengerProfile, Invite, InviteId, InviteStatus, ProfileId, Topic},
    profile::PlayerProfile,
};

/// Table holding player profiles.
pub const PROFILE_TABLE: &str = "profiles";
/// Table holding duel invites.
pub const INVITE_TABLE: &str = "duel_invites";
/// Table holding duel records.
pub const DUEL_TABLE: &str = "duels";
/// Stored procedure that creates a duel with its question set atomically.
pub const CREATE_DUEL_PROCEDURE: &str = "create_duel_with_questions";
/// Serverless function generating question sets.
pub const QUIZ_FUNCTION: &str = "generate-quiz";

#[derive(Debug, Deserialize)]
pub struct ProfileRow {
    pub id: ProfileId,
    pub auth_id: String,
    pub nickname: String,
    pub level: u32,
    pub xp: u64,
    pub avatar: Option<String>,
}

impl From<ProfileRow> for PlayerProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            auth_id: row.auth_id,
            nickname: row.nickname,
            level: row.level,
            xp: row.xp,
            avatar: row.avatar,
        }
    }
}

/// Challenger columns embedded into an invite query via a foreign-key join.
#[derive(Debug, Deserialize)]
pub struct ChallengerJoin {
    pub nickname: String,
    pub level: u32,
    pub xp: u64,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteDetailRow {
    pub id: InviteId,
    pub challenger_id: ProfileId,
    pub challenged_id: ProfileId,
    pub topic: Topic,
    pub status: InviteStatus,
    pub created_at: OffsetDateTime,
    pub challenger: ChallengerJoin,
}

impl From<InviteDetailRow> for Invite {
    fn from(row: InviteDetailRow) -> Self {
        Self {
            id: row.id,
            challenger_id: row.challenger_id,
            challenged_id: row.challenged_id,
            topic: row.topic,
            status: row.status,
            created_at: row.created_at,
            challenger: ChallengerProfile {
                nickname: row.challenger.nickname,
                level: row.challenger.level,
                xp: row.challenger.xp,
                avatar: row.challenger.avatar,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DuelApiRow {
    pub id: DuelId,
    pub challenger_id: ProfileId,
    pub challenged_id: ProfileId,
    pub topic: Topic,
    pub status: DuelStatus,
    pub created_at: OffsetDateTime,
}

impl From<DuelApiRow> for Duel {
    fn from(row: DuelApiRow) -> Self {
        Self {
            id: row.id,
            challenger_id: row.challenger_id,
            challenged_id: row.challenged_id,
            topic: row.topic,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusPatch {
    pub status: InviteStatus,
}

#[derive(Debug, Serialize)]
pub struct CreateDuelParams {
    pub challenger_id: ProfileId,
    pub challenged_id: ProfileId,
    pub topic: Topic,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuizRequest {
    pub topic: Topic,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuizResponse {
    pub questions: Vec<Question>,
}
