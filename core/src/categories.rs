//! Local mirror of the remote category collection.

use std::sync::Arc;

use tracing::warn;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Category, NewCategory};

/// Insertion-ordered mirror of `/categories`.
///
/// Mutations go through the server first and the mirror changes only after
/// the server accepts; reads are pure local lookups. Write paths report
/// failure through their return value (`None` / `false`) rather than an
/// error, logging the underlying cause.
pub struct CategoryCache {
    transport: Arc<Transport>,
    entries: Vec<Category>,
}

impl CategoryCache {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            entries: Vec::new(),
        }
    }

    fn refresh(&mut self) -> Result<(), ApiError> {
        let fetched: Vec<Category> = self.transport.get("/categories")?.unwrap_or_default();
        self.entries = fetched;
        Ok(())
    }

    /// Replace the mirror with the server's current listing. On failure the
    /// mirror keeps its last good contents and the error is returned.
    pub fn fetch_all(&mut self) -> Result<&[Category], ApiError> {
        self.refresh()?;
        Ok(&self.entries)
    }

    /// Lossy form of [`Self::fetch_all`]: a failed fetch leaves an empty
    /// mirror and is deliberately indistinguishable from an empty
    /// collection. Callers that need to tell the two apart use `fetch_all`.
    pub fn fetch_all_or_empty(&mut self) -> &[Category] {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "category fetch failed, treating the list as empty");
            self.entries.clear();
        }
        &self.entries
    }

    /// Create a category on the server, appending the returned entity to
    /// the mirror on acceptance.
    pub fn add(&mut self, name: &str) -> Option<Category> {
        let payload = NewCategory {
            name: name.to_string(),
        };
        match self.transport.post::<Category, _>("/categories", &payload) {
            Ok(Some(created)) => {
                self.entries.push(created.clone());
                Some(created)
            }
            Ok(None) => {
                warn!("category create returned an empty body");
                None
            }
            Err(e) => {
                warn!(error = %e, "category create failed");
                None
            }
        }
    }

    /// Delete a category by id. The mirror entry is removed only on server
    /// acceptance; on failure the mirror is untouched and `false` returned.
    ///
    /// Detaching exercises that referenced the category is the composition
    /// root's job, in the same call stack (see `WorkoutStore::delete_category`).
    pub fn delete(&mut self, id: i64) -> bool {
        match self
            .transport
            .delete::<serde_json::Value>(&format!("/categories/{id}"))
        {
            Ok(_) => {
                self.entries.retain(|c| c.id != id);
                true
            }
            Err(e) => {
                warn!(error = %e, id, "category delete failed");
                false
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Category> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Category] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::testing::FakeExecutor;

    fn cache(executor: Arc<FakeExecutor>) -> CategoryCache {
        let transport = Transport::new(
            "http://api.test",
            Arc::new(SessionStore::in_memory()),
            executor,
        );
        CategoryCache::new(Arc::new(transport))
    }

    #[test]
    fn fetch_all_replaces_mirror_wholesale() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"},{"id":2,"name":"Back"}]"#);
        executor.push_ok(200, r#"[{"id":2,"name":"Back"}]"#);
        let mut cache = cache(executor);

        assert_eq!(cache.fetch_all().unwrap().len(), 2);
        let second = cache.fetch_all().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, 2);
    }

    #[test]
    fn fetch_all_keeps_mirror_on_failure() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"}]"#);
        executor.push_transport_failure();
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.fetch_all().is_err());
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn fetch_all_or_empty_collapses_failure_to_empty() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"}]"#);
        executor.push_transport_failure();
        let mut cache = cache(executor);

        cache.fetch_all_or_empty();
        assert!(cache.fetch_all_or_empty().is_empty());
        assert!(cache.all().is_empty());
    }

    #[test]
    fn add_appends_server_entity_and_returns_it() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"{"id":5,"name":"Legs"}"#);
        let mut cache = cache(executor);

        let created = cache.add("Legs").unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(cache.get(5).unwrap().name, "Legs");
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn failed_add_leaves_mirror_unchanged() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"{"id":5,"name":"Legs"}"#);
        executor.push_ok(400, r#"{"detail":"name required"}"#);
        let mut cache = cache(executor);

        cache.add("Legs").unwrap();
        assert!(cache.add("").is_none());
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn delete_removes_matching_entry_on_acceptance() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"},{"id":2,"name":"Back"}]"#);
        executor.push_ok(200, r#"{"message":"Deleted"}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.delete(1));
        assert!(cache.get(1).is_none());
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn failed_delete_leaves_mirror_untouched() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"}]"#);
        executor.push_ok(404, r#"{"detail":"Category not found"}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(!cache.delete(1));
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn get_after_fetch_finds_present_and_misses_absent() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":1,"name":"Legs"}]"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.get(1).is_some());
        assert!(cache.get(99).is_none());
    }
}
