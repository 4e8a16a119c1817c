//! Authenticated HTTP calls with uniform outcome handling.
//!
//! # Design
//! Every call funnels through one checked round trip: attach the bearer
//! token when one is present, force cache-bypassing headers, then normalize
//! the outcome into `Ok(Some(value))`, `Ok(None)` for an empty 2xx body, or
//! one of the four [`ApiError`] kinds. A 401 clears the session store before
//! the error is returned, so callers observe both the failure and the
//! now-absent credential.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpExecute, HttpMethod, HttpRequest, HttpResponse};
use crate::session::SessionStore;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Issues authenticated requests against the API base URL.
pub struct Transport {
    base_url: String,
    session: Arc<SessionStore>,
    executor: Arc<dyn HttpExecute>,
}

impl Transport {
    pub fn new(base_url: &str, session: Arc<SessionStore>, executor: Arc<dyn HttpExecute>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            executor,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// GET `path`, expecting a JSON body of type `T`.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Get, path, None)
    }

    /// POST `path` with a JSON body.
    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = encode_json(body)?;
        self.request(HttpMethod::Post, path, Some((body, JSON)))
    }

    /// PUT `path` with a JSON body.
    pub fn put<T, B>(&self, path: &str, body: &B) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = encode_json(body)?;
        self.request(HttpMethod::Put, path, Some((body, JSON)))
    }

    /// DELETE `path`.
    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Delete, path, None)
    }

    /// POST `path` with a form-urlencoded body. Only the login endpoint
    /// speaks this encoding.
    pub fn post_form<T, B>(&self, path: &str, form: &B) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| ApiError::TransportFailure(format!("request body: {e}")))?;
        self.request(HttpMethod::Post, path, Some((body, FORM)))
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<(String, &'static str)>,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        // No intermediary may serve a stale mirror.
        let mut headers = vec![
            ("Cache-Control".to_string(), "no-store".to_string()),
            ("Pragma".to_string(), "no-cache".to_string()),
        ];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match body {
            Some((body, content_type)) => {
                headers.push(("Content-Type".to_string(), content_type.to_string()));
                Some(body)
            }
            None => None,
        };

        debug!(method = method.as_str(), %url, "api request");
        let response = self.executor.execute(HttpRequest {
            method,
            url,
            headers,
            body,
        })?;
        self.interpret(response)
    }

    fn interpret<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        if response.status == 401 {
            warn!("received 401, clearing stored session");
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }
        if !(200..300).contains(&response.status) {
            let message = envelope_detail(&response.body)
                .unwrap_or_else(|| format!("request failed with status {}", response.status));
            return Err(ApiError::RequestFailed {
                status: response.status,
                message,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

fn encode_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::TransportFailure(format!("request body: {e}")))
}

/// Extract the `detail` message from a server error envelope, if any.
fn envelope_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}
