//! Trait seams over the managed store and the content-generation service.

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dto::{
    duel::{Duel, DuelId, DuelStatus, Question},
    invite::{Invite, InviteId, InviteStatus, ProfileId, Topic},
    profile::PlayerProfile,
};

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Error raised by backend adapters regardless of the underlying transport.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or rejected the request.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failed operation.
        message: String,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The requested row does not exist.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing row.
        what: String,
    },
}

impl BackendError {
    /// Construct an unavailable error from any adapter failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        BackendError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a not-found error for the described row.
    pub fn not_found(what: impl Into<String>) -> Self {
        BackendError::NotFound { what: what.into() }
    }
}

/// Parameters of the atomic duel-creation procedure.
#[derive(Debug, Clone)]
pub struct CreateDuel {
    /// Player who issued the invite.
    pub challenger_id: ProfileId,
    /// Player who accepted it.
    pub challenged_id: ProfileId,
    /// Category the duel will be played on.
    pub topic: Topic,
    /// Question set the duel is played with.
    pub questions: Vec<Question>,
}

/// Abstraction over the managed store holding profiles, invites, and duels.
///
/// The engine never owns these rows; every mutation here targets the
/// authoritative remote state, and local session state is only a mirror.
pub trait DuelStore: Send + Sync {
    /// Resolve an opaque authenticated-user handle to a full profile.
    ///
    /// Required before subscribing to any realtime channel.
    fn resolve_profile(&self, auth_id: &str) -> BoxFuture<'static, BackendResult<PlayerProfile>>;
    /// Fetch an invite row together with its joined challenger display data.
    fn fetch_invite(&self, id: InviteId) -> BoxFuture<'static, BackendResult<Invite>>;
    /// Persist a new lifecycle status for an invite.
    fn set_invite_status(
        &self,
        id: InviteId,
        status: InviteStatus,
    ) -> BoxFuture<'static, BackendResult<()>>;
    /// Atomically create a duel record and return its id.
    fn create_duel(&self, request: CreateDuel) -> BoxFuture<'static, BackendResult<DuelId>>;
    /// Return the most recent duel between the two players matching `status`.
    fn find_duel_between(
        &self,
        a: ProfileId,
        b: ProfileId,
        status: DuelStatus,
    ) -> BoxFuture<'static, BackendResult<Option<Duel>>>;
}

/// External content-generation service producing duel question sets.
pub trait QuestionSource: Send + Sync {
    /// Generate `count` questions for the given topic.
    ///
    /// May fail, and may legitimately return an empty set; callers treat both
    /// as a reason to abort the accept sequence.
    fn generate(
        &self,
        topic: Topic,
        count: usize,
    ) -> BoxFuture<'static, BackendResult<Vec<Question>>>;
}
