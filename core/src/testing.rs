//! Shared test doubles for the executor seam.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ApiError;
use crate::http::{HttpExecute, HttpRequest, HttpResponse};

/// Scripted executor: hands out canned outcomes in push order and records
/// every request it was asked to perform.
#[derive(Default)]
pub struct FakeExecutor {
    script: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, status: u16, body: &str) {
        self.script.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_transport_failure(&self) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(ApiError::TransportFailure(
                "connection refused".to_string(),
            )));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl HttpExecute for FakeExecutor {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left for request")
    }
}
