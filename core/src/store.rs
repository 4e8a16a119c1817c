//! Composition root: one injectable object owning every client component.

use std::sync::Arc;

use crate::auth::AuthFlow;
use crate::categories::CategoryCache;
use crate::config::ApiConfig;
use crate::exercises::ExerciseCache;
use crate::http::{HttpExecute, UreqExecutor};
use crate::records::RecordCache;
use crate::session::{FileTokenStorage, SessionStore, TokenStorage};
use crate::stats::StatsClient;
use crate::transport::Transport;

/// The whole client-side state in one place: session, auth flow, the three
/// entity mirrors, and stats access, all sharing a single transport. Nothing
/// here is global; tests construct one per scenario with their own storage
/// and executor.
pub struct WorkoutStore {
    pub auth: AuthFlow,
    pub categories: CategoryCache,
    pub exercises: ExerciseCache,
    pub records: RecordCache,
    pub stats: StatsClient,
    session: Arc<SessionStore>,
}

impl WorkoutStore {
    /// Production wiring: file-backed session, ureq executor.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_parts(
            config,
            Box::new(FileTokenStorage::new(FileTokenStorage::default_path())),
            Arc::new(UreqExecutor::new()),
        )
    }

    /// Explicit wiring for tests and embedders.
    pub fn with_parts(
        config: &ApiConfig,
        storage: Box<dyn TokenStorage>,
        executor: Arc<dyn HttpExecute>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let transport = Arc::new(Transport::new(&config.base_url, session.clone(), executor));
        Self {
            auth: AuthFlow::new(transport.clone(), session.clone()),
            categories: CategoryCache::new(transport.clone()),
            exercises: ExerciseCache::new(transport.clone()),
            records: RecordCache::new(transport.clone()),
            stats: StatsClient::new(transport),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Delete a category and, once the server accepts, detach every cached
    /// exercise that still referenced it — same call stack, no subscription
    /// machinery. The server is not assumed to cascade on its own.
    pub fn delete_category(&mut self, id: i64) -> bool {
        if self.categories.delete(id) {
            self.exercises.clear_category(id);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStorage;
    use crate::testing::FakeExecutor;

    fn store(executor: Arc<FakeExecutor>) -> WorkoutStore {
        WorkoutStore::with_parts(
            &ApiConfig::new("http://api.test"),
            Box::new(MemoryTokenStorage::default()),
            executor,
        )
    }

    #[test]
    fn category_deletion_cascades_to_cached_exercises() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":10,"name":"Legs"}]"#);
        executor.push_ok(
            200,
            r#"[{"id":1,"name":"Squat","category_id":10},
                {"id":2,"name":"Bench Press","category_id":20},
                {"id":3,"name":"Lunge","category_id":10}]"#,
        );
        executor.push_ok(200, r#"{"message":"Deleted"}"#);
        let mut store = store(executor);

        store.categories.fetch_all().unwrap();
        store.exercises.fetch_all().unwrap();

        assert!(store.delete_category(10));

        assert!(store.categories.get(10).is_none());
        assert!(store.exercises.all().iter().all(|e| e.category_id != Some(10)));
        assert_eq!(store.exercises.get(2).unwrap().category_id, Some(20));
    }

    #[test]
    fn rejected_category_deletion_touches_nothing() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"[{"id":10,"name":"Legs"}]"#);
        executor.push_ok(200, r#"[{"id":1,"name":"Squat","category_id":10}]"#);
        executor.push_ok(404, r#"{"detail":"Category not found"}"#);
        let mut store = store(executor);

        store.categories.fetch_all().unwrap();
        store.exercises.fetch_all().unwrap();

        assert!(!store.delete_category(10));

        assert!(store.categories.get(10).is_some());
        assert_eq!(store.exercises.get(1).unwrap().category_id, Some(10));
    }

    #[test]
    fn components_share_one_session() {
        let executor = Arc::new(FakeExecutor::new());
        executor.push_ok(200, r#"{"access_token":"tok","token_type":"bearer"}"#);
        executor.push_ok(401, r#"{"detail":"expired"}"#);
        let mut store = store(executor);

        store.auth.login("a@b.c", "pw").unwrap();
        assert!(store.session().is_authenticated());

        // A 401 on a cache read clears the shared session.
        assert!(store.categories.fetch_all().is_err());
        assert!(!store.session().is_authenticated());
        assert_eq!(store.auth.state(), crate::auth::AuthState::Anonymous);
    }
}
