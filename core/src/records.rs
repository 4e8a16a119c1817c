//! Local mirror of the remote workout-record collection.

use std::sync::Arc;

use tracing::warn;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NewRecord, Record, RecordDraft};

/// Insertion-ordered mirror of `/records`.
///
/// Single-record writes follow the shared mirror contract; the multi-set
/// recording flow goes through [`Self::add_batch`], which filters draft rows
/// before any request leaves the process.
pub struct RecordCache {
    transport: Arc<Transport>,
    entries: Vec<Record>,
}

impl RecordCache {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            entries: Vec::new(),
        }
    }

    fn refresh(&mut self) -> Result<(), ApiError> {
        let fetched: Vec<Record> = self.transport.get("/records")?.unwrap_or_default();
        self.entries = fetched;
        Ok(())
    }

    pub fn fetch_all(&mut self) -> Result<&[Record], ApiError> {
        self.refresh()?;
        Ok(&self.entries)
    }

    /// Lossy fetch: failure shows as an empty list. See the category mirror
    /// for the rationale.
    pub fn fetch_all_or_empty(&mut self) -> &[Record] {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "record fetch failed, treating the list as empty");
            self.entries.clear();
        }
        &self.entries
    }

    /// Persist one record; the mirror gains the server-returned entity
    /// (with its computed name and volume) on acceptance.
    pub fn add(&mut self, record: &NewRecord) -> Option<Record> {
        match self.transport.post::<Record, _>("/records", record) {
            Ok(Some(created)) => {
                self.entries.push(created.clone());
                Some(created)
            }
            Ok(None) => {
                warn!("record create returned an empty body");
                None
            }
            Err(e) => {
                warn!(error = %e, "record create failed");
                None
            }
        }
    }

    /// Multi-set recording flow: coerce each draft row — dropping rows
    /// without a positive reps value before any network call — then submit
    /// the survivors one by one, collecting the accepted records.
    pub fn add_batch(&mut self, date: &str, exercise_id: i64, drafts: &[RecordDraft]) -> Vec<Record> {
        let candidates: Vec<NewRecord> = drafts
            .iter()
            .filter_map(|d| d.coerce(date, exercise_id))
            .collect();
        candidates.iter().filter_map(|c| self.add(c)).collect()
    }

    pub fn delete(&mut self, id: i64) -> bool {
        match self
            .transport
            .delete::<serde_json::Value>(&format!("/records/{id}"))
        {
            Ok(_) => {
                self.entries.retain(|r| r.id != id);
                true
            }
            Err(e) => {
                warn!(error = %e, id, "record delete failed");
                false
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Records for one exercise, mirror order.
    pub fn by_exercise(&self, exercise_id: i64) -> Vec<&Record> {
        self.entries
            .iter()
            .filter(|r| r.exercise_id == exercise_id)
            .collect()
    }

    /// Records whose date string equals `date` exactly, mirror order. A date
    /// with no matches yields an empty list, never an error.
    pub fn by_date(&self, date: &str) -> Vec<&Record> {
        self.entries.iter().filter(|r| r.date == date).collect()
    }

    pub fn all(&self) -> &[Record] {
        &self.entries
    }
}
