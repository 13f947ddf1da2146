//! Player profile rows.

use serde::{Deserialize, Serialize};

use crate::dto::invite::{ChallengerProfile, ProfileId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Player profile row as resolved from the opaque authenticated-user handle.
pub struct PlayerProfile {
    /// Stable internal profile id used to filter realtime channels.
    pub id: ProfileId,
    /// Opaque handle assigned by the external auth provider.
    pub auth_id: String,
    /// Display name.
    pub nickname: String,
    /// Current level.
    pub level: u32,
    /// Accumulated experience points.
    pub xp: u64,
    /// Storage reference of the avatar, if any.
    pub avatar: Option<String>,
}

impl From<&PlayerProfile> for ChallengerProfile {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            nickname: profile.nickname.clone(),
            level: profile.level,
            xp: profile.xp,
            avatar: profile.avatar.clone(),
        }
    }
}
