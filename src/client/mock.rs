//! In-memory transport for unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ApiRequest, BackendClient, Method, Transport};
use crate::error::FetchError;

pub(crate) enum Reply {
    Json(Value),
    Delayed(Duration, Value),
    Unreachable,
}

/// Replies are queued per "METHOD path" (or "METHOD path?query" for an exact
/// query match); the last reply for a route repeats.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    routes: Arc<Mutex<HashMap<String, VecDeque<Arc<Reply>>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("{} {}", method, path))
            .or_default()
            .push_back(Arc::new(reply));
        self
    }

    pub(crate) fn json(&self, method: Method, path: &str, body: Value) -> &Self {
        self.reply(method, path, Reply::Json(body))
    }

    pub(crate) fn reply_with_query(&self, method: Method, path: &str, query: &str, reply: Reply) -> &Self {
        self.reply(method, &format!("{}?{}", path, query), reply)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub(crate) fn client(&self) -> BackendClient {
        BackendClient::new(Arc::new(self.clone()), "/api")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, FetchError> {
        let endpoint = request.endpoint();
        let query: Vec<String> = request.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let with_query = format!("{}?{}", endpoint, query.join("&"));
        self.requests.lock().unwrap().push(request);

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let key = if routes.contains_key(&with_query) { with_query } else { endpoint.clone() };
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply.as_deref() {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Delayed(delay, body)) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
            Some(Reply::Unreachable) | None => Err(FetchError::Transport {
                endpoint,
                reason: "connection refused".to_string(),
            }),
        }
    }
}
