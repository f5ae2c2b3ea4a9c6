//! Error types for the mailer service client.

use reqwest::StatusCode;

/// Errors returned by mailer service operations.
///
/// The first two variants form the service contract: [`Error::AuthTokenRequired`]
/// is raised locally before any network I/O, and [`Error::InvalidServiceBehavior`]
/// means the server answered with a status the contract does not provide for.
/// The remaining variants wrap their underlying sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An authenticated operation was invoked on a client constructed without
    /// an auth token. No request was made.
    #[error("auth token required, but not provided")]
    AuthTokenRequired,

    /// The server responded with a status code other than the one expected
    /// for the operation. The code is carried for display only; the client
    /// does not interpret it further.
    #[error("unexpected response status {0} from the mailer service")]
    InvalidServiceBehavior(StatusCode),

    /// The request could not be completed: connection failure, timeout, DNS
    /// failure, or a malformed response. Distinct from
    /// [`Error::InvalidServiceBehavior`], which is a completed exchange with
    /// the wrong answer.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The template data for [`Client::send`](crate::Client::send) could not
    /// be encoded as JSON. No request was made.
    #[error("failed to encode template data: {0}")]
    Json(#[from] serde_json::Error),
}
