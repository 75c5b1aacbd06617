use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;
use url::Url;

use super::{ApiRequest, Method, Transport};
use crate::error::{DashboardError, FetchError};

/// reqwest-backed transport rooted at the backend base URL
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL + path, with every query pair appended (keys may repeat)
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, FetchError> {
        let endpoint = request.endpoint();
        let transport_error = |reason: String| FetchError::Transport {
            endpoint: endpoint.clone(),
            reason,
        };

        let url = self
            .url_for(&request)
            .map_err(|e| transport_error(format!("invalid URL: {}", e)))?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Error statuses still carry an envelope; let the caller read it
            warn!("🌐 [CLIENT] {} returned {}", endpoint, status);
        }

        let text = response
            .text()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            endpoint: endpoint.clone(),
            source,
        })
    }
}
