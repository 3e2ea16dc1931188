//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::transport::{Request, Response, Transport};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, response: Response) -> &Self {
        self.responses.lock().expect("lock").push_back(Ok(response));
        self
    }

    pub(crate) fn push_json(&self, body: &Value) -> &Self {
        self.push(Response::json_body(body))
    }

    pub(crate) fn push_status(&self, status: u16, body: &str) -> &Self {
        self.push(Response::new(status, Vec::<(String, String)>::new(), body))
    }

    pub(crate) fn push_created(&self, location: &str) -> &Self {
        self.push(Response::new(201, [("Location", location)], ""))
    }

    pub(crate) fn push_error(&self, error: ApiError) -> &Self {
        self.responses.lock().expect("lock").push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("lock").clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn request(&self, request: Request) -> Result<Response> {
        let (method, path) = (request.method, request.path.clone());
        self.requests.lock().expect("lock").push(request);
        let next = self
            .responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::protocol(format!("no scripted response for {method} {path}"))));
        next.map(|response| response.for_request(method, path))
    }
}
