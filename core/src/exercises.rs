//! Local mirror of the remote exercise collection.

use std::sync::Arc;

use tracing::warn;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{CategoryChange, Exercise, NewExercise};

/// Insertion-ordered mirror of `/exercises`.
///
/// Same contract as the category mirror, plus the category foreign key:
/// a remote update via [`Self::set_category`] and a local-only patch via
/// [`Self::clear_category`] for when a category disappears.
pub struct ExerciseCache {
    transport: Arc<Transport>,
    entries: Vec<Exercise>,
}

impl ExerciseCache {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            entries: Vec::new(),
        }
    }

    fn refresh(&mut self) -> Result<(), ApiError> {
        let fetched: Vec<Exercise> = self.transport.get("/exercises")?.unwrap_or_default();
        self.entries = fetched;
        Ok(())
    }

    pub fn fetch_all(&mut self) -> Result<&[Exercise], ApiError> {
        self.refresh()?;
        Ok(&self.entries)
    }

    /// Lossy fetch: failure shows as an empty list. See the category mirror
    /// for the rationale.
    pub fn fetch_all_or_empty(&mut self) -> &[Exercise] {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "exercise fetch failed, treating the list as empty");
            self.entries.clear();
        }
        &self.entries
    }

    pub fn add(&mut self, name: &str, category_id: Option<i64>) -> Option<Exercise> {
        let payload = NewExercise {
            name: name.to_string(),
            category_id,
        };
        match self.transport.post::<Exercise, _>("/exercises", &payload) {
            Ok(Some(created)) => {
                self.entries.push(created.clone());
                Some(created)
            }
            Ok(None) => {
                warn!("exercise create returned an empty body");
                None
            }
            Err(e) => {
                warn!(error = %e, "exercise create failed");
                None
            }
        }
    }

    pub fn delete(&mut self, id: i64) -> bool {
        match self
            .transport
            .delete::<serde_json::Value>(&format!("/exercises/{id}"))
        {
            Ok(_) => {
                self.entries.retain(|e| e.id != id);
                true
            }
            Err(e) => {
                warn!(error = %e, id, "exercise delete failed");
                false
            }
        }
    }

    /// Move an exercise to a category, or detach it with `None`. The local
    /// mirror is only touched once the server accepts the update.
    pub fn set_category(&mut self, exercise_id: i64, category_id: Option<i64>) -> bool {
        let payload = CategoryChange { category_id };
        match self
            .transport
            .put::<Exercise, _>(&format!("/exercises/{exercise_id}"), &payload)
        {
            Ok(_) => {
                if let Some(exercise) = self.entries.iter_mut().find(|e| e.id == exercise_id) {
                    exercise.category_id = category_id;
                }
                true
            }
            Err(e) => {
                warn!(error = %e, exercise_id, "exercise category update failed");
                false
            }
        }
    }

    /// Local-only consistency patch for category deletion: detach every
    /// exercise still pointing at the category. No server call happens here.
    pub fn clear_category(&mut self, category_id: i64) {
        for exercise in &mut self.entries {
            if exercise.category_id == Some(category_id) {
                exercise.category_id = None;
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Exercise> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Exercises filed under `category_id`; pass `None` for the uncategorized
    /// bucket. Mirror order.
    pub fn by_category(&self, category_id: Option<i64>) -> Vec<&Exercise> {
        self.entries
            .iter()
            .filter(|e| e.category_id == category_id)
            .collect()
    }

    pub fn all(&self) -> &[Exercise] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::testing::FakeExecutor;

    fn cache(executor: Arc<FakeExecutor>) -> ExerciseCache {
        let transport = Transport::new(
            "http://api.test",
            Arc::new(SessionStore::in_memory()),
            executor,
        );
        ExerciseCache::new(Arc::new(transport))
    }

    fn seed(executor: &FakeExecutor) {
        executor.push_ok(
            200,
            r#"[{"id":1,"name":"Squat","category_id":10},
                {"id":2,"name":"Bench Press","category_id":20},
                {"id":3,"name":"Lunge","category_id":10},
                {"id":4,"name":"Plank","category_id":null}]"#,
        );
    }

    #[test]
    fn set_category_updates_mirror_after_acceptance() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        executor.push_ok(200, r#"{"id":4,"name":"Plank","category_id":10}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.set_category(4, Some(10)));
        assert_eq!(cache.get(4).unwrap().category_id, Some(10));
    }

    #[test]
    fn set_category_failure_leaves_mirror_untouched() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        executor.push_ok(404, r#"{"detail":"Exercise not found"}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(!cache.set_category(1, None));
        assert_eq!(cache.get(1).unwrap().category_id, Some(10));
    }

    #[test]
    fn set_category_detaches_with_none() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        executor.push_ok(200, r#"{"id":1,"name":"Squat","category_id":null}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.set_category(1, None));
        assert_eq!(cache.get(1).unwrap().category_id, None);
    }

    #[test]
    fn clear_category_detaches_every_reference_locally() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        let mut cache = cache(executor.clone());

        cache.fetch_all().unwrap();
        cache.clear_category(10);

        assert!(cache.all().iter().all(|e| e.category_id != Some(10)));
        assert_eq!(cache.get(2).unwrap().category_id, Some(20));
        // Purely local: the fetch was the only request.
        assert_eq!(executor.request_count(), 1);
    }

    #[test]
    fn by_category_filters_in_mirror_order() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        let legs: Vec<i64> = cache.by_category(Some(10)).iter().map(|e| e.id).collect();
        assert_eq!(legs, [1, 3]);

        let uncategorized: Vec<i64> = cache.by_category(None).iter().map(|e| e.id).collect();
        assert_eq!(uncategorized, [4]);
    }

    #[test]
    fn add_appends_on_acceptance_only() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"{"id":9,"name":"Dip","category_id":null}"#);
        executor.push_transport_failure();
        let mut cache = cache(executor);

        assert!(cache.add("Dip", None).is_some());
        assert!(cache.add("Curl", None).is_none());
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn delete_removes_entry_on_acceptance() {
        let executor = Arc::new(FakeExecutor::new());
        seed(&executor);
        executor.push_ok(200, r#"{"message":"Deleted"}"#);
        let mut cache = cache(executor);

        cache.fetch_all().unwrap();
        assert!(cache.delete(2));
        assert!(cache.get(2).is_none());
        assert_eq!(cache.all().len(), 3);
    }
}
