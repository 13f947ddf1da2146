//! Error types shared by the REST backend adapter.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::backend::BackendError;

/// Convenient result alias returning [`RestError`] failures.
pub type RestResult<T> = Result<T, RestError>;

/// Failures that can occur while talking to the managed backend's REST API.
#[derive(Debug, Error)]
pub enum RestError {
    /// Required environment variable is missing.
    #[error("missing backend environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build backend HTTP client")]
    ClientBuilder {
        /// Client construction failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send backend request to `{path}`")]
    RequestSend {
        /// Path the request targeted.
        path: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The backend returned an unexpected status code.
    #[error("unexpected backend response status {status} for `{path}`")]
    RequestStatus {
        /// Path the request targeted.
        path: String,
        /// Status code received.
        status: StatusCode,
    },
    /// Response payload could not be parsed.
    #[error("failed to decode backend response for `{path}`")]
    DecodeResponse {
        /// Path the request targeted.
        path: String,
        /// Decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// A query expected to match a row matched none.
    #[error("no row matched `{path}`")]
    RowMissing {
        /// Query path that matched nothing.
        path: String,
    },
}

impl From<RestError> for BackendError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::RowMissing { path } => BackendError::not_found(path),
            other => BackendError::unavailable("backend REST request failed".into(), other),
        }
    }
}
