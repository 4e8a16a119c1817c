//! Error types for the workout API client.
//!
//! # Design
//! Exactly four kinds, one per thing a caller can meaningfully do about a
//! failed call: re-authenticate (`Unauthorized`), show the server's own
//! message (`RequestFailed`), distrust the response (`MalformedResponse`),
//! or treat the network as down (`TransportFailure`). The auth flow surfaces
//! these `Display` strings directly to the end user, so every message reads
//! as a sentence.

use thiserror::Error;

/// Errors surfaced by [`crate::transport::Transport`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401. By the time a caller observes this variant
    /// the transport has already cleared the session store.
    #[error("session expired, please log in again")]
    Unauthorized,

    /// The server rejected the request. Carries the `detail` message from
    /// the error envelope, or a generic fallback when the envelope lacks one.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// A 2xx response whose body could not be parsed as the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No response was obtained at all (connect failure, timeout, or a
    /// request body that never left the process).
    #[error("could not reach the server: {0}")]
    TransportFailure(String),
}
