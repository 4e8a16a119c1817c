//! Login, registration, logout, and session resumption.
//!
//! The flow owns the state machine between anonymous and authenticated; the
//! transport owns the 401 path that can force it back to anonymous from
//! anywhere. Errors returned here are meant for end-user display — their
//! `Display` strings carry the server's `detail` message where one exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::types::{Credentials, User};

/// Where the client currently stands with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Form body for the login endpoint. The server speaks OAuth2 password-form
/// conventions, so the email travels as `username`.
#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct AuthFlow {
    transport: Arc<Transport>,
    session: Arc<SessionStore>,
    state: AuthState,
    user: Option<User>,
}

impl AuthFlow {
    pub fn new(transport: Arc<Transport>, session: Arc<SessionStore>) -> Self {
        Self {
            transport,
            session,
            state: AuthState::Anonymous,
            user: None,
        }
    }

    /// Current state. A 401 on any call clears the session store, so a
    /// remembered `Authenticated` downgrades to `Anonymous` the moment the
    /// credential is gone — without this flow being told.
    pub fn state(&self) -> AuthState {
        if self.state == AuthState::Authenticated && !self.session.is_authenticated() {
            return AuthState::Anonymous;
        }
        self.state
    }

    /// The account behind the session, when a register or resume has
    /// materialized it. A plain login leaves this unset.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Exchange credentials for a bearer token and store it. On any failure
    /// the state stays anonymous and the returned error's `Display` is the
    /// message to show the user.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let form = LoginForm {
            username: email,
            password,
        };
        let token: TokenResponse = self
            .transport
            .post_form("/auth/login", &form)?
            .ok_or_else(|| ApiError::MalformedResponse("empty login response".to_string()))?;

        self.session.set(&token.access_token);
        self.state = AuthState::Authenticated;
        info!(email, "logged in");
        Ok(())
    }

    /// Create an account, then log in with the same credentials. The
    /// register call fully completes before the login starts; if the login
    /// then fails, the net state is anonymous with the login error.
    pub fn register(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user: User = self
            .transport
            .post("/auth/register", &credentials)?
            .ok_or_else(|| ApiError::MalformedResponse("empty register response".to_string()))?;

        self.login(email, password)?;
        self.user = Some(user);
        Ok(())
    }

    /// Drop the session locally. Always succeeds; no remote call is made,
    /// so this works offline.
    pub fn logout(&mut self) {
        self.session.clear();
        self.state = AuthState::Anonymous;
        self.user = None;
        info!("logged out");
    }

    /// Startup probe: try to turn a persisted token into a live session.
    /// Any failure — a rejected token (which the transport has already
    /// cleared) or an unreachable server — lands on anonymous.
    pub fn resume(&mut self) -> AuthState {
        if self.session.token().is_none() {
            self.state = AuthState::Anonymous;
            return self.state;
        }
        match self.me() {
            Ok(user) => {
                info!(email = %user.email, "session resumed");
                self.user = Some(user);
                self.state = AuthState::Authenticated;
            }
            Err(e) => {
                warn!(error = %e, "stored session could not be resumed");
                self.user = None;
                self.state = AuthState::Anonymous;
            }
        }
        self.state
    }

    fn me(&self) -> Result<User, ApiError> {
        self.transport
            .get("/auth/me")?
            .ok_or_else(|| ApiError::MalformedResponse("empty profile response".to_string()))
    }
}
