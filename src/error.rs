//! Service-level error taxonomy.

use thiserror::Error;

use crate::dao::backend::BackendError;

/// Errors surfaced by the engine's service operations.
///
/// Every failure is caught at the boundary of the async operation that
/// produced it and converted into a log line or a notice event; nothing here
/// ever propagates far enough to take the session down.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The managed backend rejected or failed a request.
    #[error("backend unavailable")]
    Unavailable(#[from] BackendError),
    /// Accept or reject was requested while nothing is displayed.
    #[error("no invite is currently displayed")]
    NoCurrentInvite,
    /// The content-generation service failed.
    #[error("question generation failed")]
    QuestionGeneration {
        /// Underlying generation failure.
        #[source]
        source: BackendError,
    },
    /// The content-generation service returned no questions.
    #[error("question generation returned an empty set")]
    EmptyQuestionSet,
    /// The session began teardown while the operation was in flight; its
    /// result was discarded.
    #[error("session is shutting down")]
    ShuttingDown,
}
