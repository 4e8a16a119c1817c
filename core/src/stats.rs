//! Read-only access to the server-computed dashboard aggregate.

use std::sync::Arc;

use tracing::warn;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::Stats;

/// Fetches `/stats`. Never cached locally; every call is a fresh read.
pub struct StatsClient {
    transport: Arc<Transport>,
}

impl StatsClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn fetch(&self) -> Result<Stats, ApiError> {
        self.transport
            .get("/stats")?
            .ok_or_else(|| ApiError::MalformedResponse("empty stats body".to_string()))
    }

    /// Degraded read for the dashboard: zeroed totals on any failure.
    pub fn fetch_or_default(&self) -> Stats {
        self.fetch().unwrap_or_else(|e| {
            warn!(error = %e, "stats fetch failed, using zeroed totals");
            Stats::default()
        })
    }
}
