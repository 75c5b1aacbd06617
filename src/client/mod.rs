//! Backend fetcher
//!
//! `Transport` is the seam between the dashboard and the network: it moves
//! one request and hands back the decoded JSON body. `BackendClient` sits on
//! top, unwraps the `{ok, data, error}` envelope and exposes one typed method
//! per backend endpoint. Failures come back as `FetchError`, never as panics.

pub mod envelope;
pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::{
    Config, ConfigUpdate, ForecastResult, HistoryEntry, HistoryPage, NewTicker, Portfolio,
    PredictorConfig, Recommendation, RecommendationList, Report, ReportSummary, SchedulerStatus,
};

pub use envelope::{Ack, Envelope};
pub use http::HttpTransport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// One backend call: method, absolute path, repeatable query pairs, JSON body
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self { method: Method::Post, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, FetchError> {
        let value = serde_json::to_value(body).map_err(|source| FetchError::Decode {
            endpoint: self.path.clone(),
            source,
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// "METHOD /path" for logs and error context
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and parse the response body as JSON. Network failures
    /// and non-JSON bodies are `Transport`/`Decode` errors.
    async fn send(&self, request: ApiRequest) -> Result<Value, FetchError>;
}

/// Typed access to the analytics backend
#[derive(Clone)]
pub struct BackendClient {
    transport: Arc<dyn Transport>,
    api_prefix: String,
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>, api_prefix: &str) -> Self {
        let api_prefix = format!("/{}", api_prefix.trim_matches('/'));
        let api_prefix = if api_prefix == "/" { String::new() } else { api_prefix };
        Self { transport, api_prefix }
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_prefix, path)
    }

    /// Raw envelope round-trip
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<T>, FetchError> {
        let endpoint = request.endpoint();
        debug!("🌐 [CLIENT] {}", endpoint);
        let body = self.transport.send(request).await.inspect_err(|e| {
            warn!("🌐 [CLIENT] {} transport failure: {}", endpoint, e);
        })?;
        let envelope = Envelope::decode(&endpoint, body)?;
        if !envelope.ok {
            debug!(
                "🌐 [CLIENT] {} returned ok=false: {:?}",
                endpoint,
                envelope.error.as_deref().or(envelope.message.as_deref())
            );
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, FetchError> {
        let endpoint = request.endpoint();
        self.call::<T>(request).await?.into_data(&endpoint)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Ack, FetchError> {
        let endpoint = request.endpoint();
        self.call::<Value>(request).await?.into_ack(&endpoint)
    }

    // ============= Report view =============

    /// `ok: false` here means no report has been generated yet
    pub async fn today_report(&self) -> Result<Report, FetchError> {
        self.fetch(ApiRequest::get(self.api("/report/today"))).await
    }

    pub async fn report_summary(&self) -> Result<ReportSummary, FetchError> {
        self.fetch(ApiRequest::get(self.api("/report/summary"))).await
    }

    pub async fn recommendations(&self) -> Result<Vec<Recommendation>, FetchError> {
        let list: RecommendationList = self.fetch(ApiRequest::get(self.api("/recommendations"))).await?;
        Ok(list.items)
    }

    /// Synchronous report regeneration
    pub async fn run_now(&self) -> Result<Ack, FetchError> {
        self.execute(ApiRequest::post("/scheduler/run-now")).await
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerStatus, FetchError> {
        self.fetch(ApiRequest::get("/scheduler/status")).await
    }

    // ============= Forecast view =============

    pub async fn predictor_config(&self) -> Result<PredictorConfig, FetchError> {
        self.fetch(ApiRequest::get("/predictor/config")).await
    }

    /// Empty `tickers` asks for the backend's default company set
    pub async fn forecast(&self, tickers: &[String]) -> Result<ForecastResult, FetchError> {
        let request = tickers
            .iter()
            .fold(ApiRequest::get("/predictor/signal"), |req, t| req.query("tickers", t.as_str()));
        self.fetch(request).await
    }

    pub async fn forecast_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, FetchError> {
        let request = ApiRequest::get("/predictor/history").query("limit", limit.to_string());
        let page: HistoryPage = self.fetch(request).await?;
        Ok(page.items)
    }

    // ============= Settings view =============

    /// `Ok(None)` when the backend has no portfolio stored yet
    pub async fn portfolio(&self) -> Result<Option<Portfolio>, FetchError> {
        let endpoint = ApiRequest::get(self.api("/portfolio/view"));
        match self.fetch::<Portfolio>(endpoint).await {
            Ok(portfolio) => Ok(Some(portfolio)),
            Err(FetchError::Domain { .. }) | Err(FetchError::MissingData { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save_portfolio(&self, portfolio: &Portfolio) -> Result<Ack, FetchError> {
        self.execute(ApiRequest::post(self.api("/portfolio")).json(portfolio)?).await
    }

    pub async fn config(&self) -> Result<Config, FetchError> {
        self.fetch(ApiRequest::get(self.api("/config"))).await
    }

    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<Ack, FetchError> {
        self.execute(ApiRequest::post(self.api("/config/update")).json(update)?).await
    }

    pub async fn add_ticker(&self, ticker: &NewTicker) -> Result<Ack, FetchError> {
        self.execute(ApiRequest::post(self.api("/config/add-ticker")).json(ticker)?).await
    }

    pub async fn remove_ticker(&self, symbol: &str) -> Result<Ack, FetchError> {
        let segment: String = url::form_urlencoded::byte_serialize(symbol.as_bytes()).collect();
        self.execute(ApiRequest::delete(self.api(&format!("/config/remove-ticker/{}", segment))))
            .await
    }
}

#[cfg(test)]
pub(crate) mod mock;
