//! Client-side core for a workout-tracking application.
//!
//! # Overview
//! Authenticates against a remote REST API, mirrors three small collections
//! (categories, exercises, workout records) in local caches, and exposes the
//! server-computed dashboard aggregate. Mutations are request-confirmed:
//! a mirror changes only after the server accepts the call.
//!
//! # Design
//! - [`Transport`] performs every HTTP round trip through the [`HttpExecute`]
//!   seam and normalizes outcomes into the four [`ApiError`] kinds; a 401
//!   clears the shared [`SessionStore`] as a side effect.
//! - Each entity cache owns an insertion-ordered mirror. Reads expose both
//!   the real `Result` and a lossy form that degrades to empty; writes
//!   report failure by sentinel (`None` / `false`) after logging it.
//! - [`WorkoutStore`] is the composition root: it wires session, transport,
//!   auth, caches, and stats together and carries the cross-cache patch that
//!   detaches exercises when their category is deleted.
//! - No retries, no backoff, no offline queue: one failed call is one failed
//!   operation.

pub mod auth;
pub mod categories;
pub mod config;
pub mod error;
pub mod exercises;
pub mod http;
pub mod records;
pub mod session;
pub mod stats;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthFlow, AuthState};
pub use categories::CategoryCache;
pub use config::ApiConfig;
pub use error::ApiError;
pub use exercises::ExerciseCache;
pub use http::{HttpExecute, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use records::RecordCache;
pub use session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};
pub use stats::StatsClient;
pub use store::WorkoutStore;
pub use transport::Transport;
pub use types::{
    Category, CategoryChange, Credentials, Exercise, NewCategory, NewExercise, NewRecord, Record,
    RecordDraft, Stats, User,
};
