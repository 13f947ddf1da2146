//! Events emitted towards whatever renders the session.

use serde::Serialize;

use crate::dto::duel::DuelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Visual style of a transient notice.
pub enum NoticeKind {
    /// Neutral informational message.
    Info,
    /// Positive confirmation.
    Success,
    /// Short-lived error styling; the invite card stays interactable.
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
/// Navigation target emitted towards the rendering layer.
pub enum Route {
    /// The list of duels for the current player.
    DuelList,
    /// A specific live duel.
    Duel {
        /// Identifier of the duel to open.
        id: DuelId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Event fanned out to whatever renders this session.
pub enum UiEvent {
    /// Toast-style message.
    Notice {
        /// Visual style of the notice.
        kind: NoticeKind,
        /// Human-readable text.
        message: String,
    },
    /// Request to move to another screen.
    Navigate(Route),
    /// Non-blocking banner shown when an invite notification could not be
    /// resolved and may have been lost.
    MissedInvite,
}

impl UiEvent {
    /// Neutral informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Positive confirmation notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Destructive-styled failure notice.
    pub fn destructive(message: impl Into<String>) -> Self {
        Self::Notice {
            kind: NoticeKind::Destructive,
            message: message.into(),
        }
    }
}
