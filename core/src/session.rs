//! Bearer-token session state and its persistence.
//!
//! The current token lives in memory behind a `Mutex` and is mirrored to a
//! [`TokenStorage`] backend so a session survives process restarts. Storage
//! is best-effort: failures are logged and otherwise ignored.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

/// Where the session token lives between process runs.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn remove(&self);
}

/// Token persisted as a single file.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<data_dir>/workout-tracker/token`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("workout-tracker")
            .join("token")
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(token.to_string())
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), error = %e, "could not create token directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            warn!(path = %self.path.display(), error = %e, "could not persist token");
        }
    }

    fn remove(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "could not remove token file");
            }
        }
    }
}

/// Storage that forgets everything at process exit. Used by tests and by
/// embedders that opt out of persistence.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn remove(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// Holds the current bearer credential and keeps storage in sync with it.
///
/// Shared via `Arc` between the transport (which reads it on every call and
/// clears it on 401) and the auth flow (which sets it on login).
pub struct SessionStore {
    token: Mutex<Option<String>>,
    storage: Box<dyn TokenStorage>,
}

impl SessionStore {
    /// Loads any persisted token so a previous session resumes after restart.
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let token = Mutex::new(storage.load());
        Self { token, storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    pub fn set(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
        self.storage.save(token);
    }

    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
        self.storage.remove();
    }
}
