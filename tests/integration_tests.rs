//! Integration tests for the dashboard.
//! These tests drive the views and the HTTP router against a scripted backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use stock_dashboard::api::{router, AppState};
use stock_dashboard::client::{ApiRequest, BackendClient, Method, Transport};
use stock_dashboard::state::NoticePolicy;
use stock_dashboard::views::{ForecastView, ReportView, SettingsView, TickerForm};
use stock_dashboard::{DashboardError, FetchError, LoadOutcome, ValidationError};

/// Backend stand-in: fixed bodies per "METHOD path[?query]", optional delay
#[derive(Clone, Default)]
struct ScriptedBackend {
    routes: Arc<Mutex<HashMap<String, (Duration, Value)>>>,
    log: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedBackend {
    fn on(&self, route: &str, body: Value) -> &Self {
        self.on_delayed(route, Duration::ZERO, body)
    }

    fn on_delayed(&self, route: &str, delay: Duration, body: Value) -> &Self {
        self.routes.lock().unwrap().insert(route.to_string(), (delay, body));
        self
    }

    fn calls(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn client(&self) -> BackendClient {
        BackendClient::new(Arc::new(self.clone()), "/api")
    }
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value, FetchError> {
        let endpoint = request.endpoint();
        let query: Vec<String> = request.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let exact = format!("{}?{}", endpoint, query.join("&"));
        self.log.lock().unwrap().push(request);

        let route = {
            let routes = self.routes.lock().unwrap();
            routes.get(&exact).or_else(|| routes.get(&endpoint)).cloned()
        };
        match route {
            Some((delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            None => Err(FetchError::Transport {
                endpoint,
                reason: "connection refused".to_string(),
            }),
        }
    }
}

fn policy() -> NoticePolicy {
    NoticePolicy::new(Duration::from_secs(60), None)
}

fn report_backend() -> ScriptedBackend {
    let backend = ScriptedBackend::default();
    backend
        .on(
            "GET /api/report/today",
            json!({"ok": true, "data": {
                "generated_at": "2025-01-15T10:30:00",
                "universe": ["SBER", "XXXX"],
                "by_symbol": {
                    "SBER": {"price": 250.0, "sma_200": 200.0, "signals": ["PRICE_ABOVE_SMA200"]},
                    "XXXX": {"meta": {"error": "not found"}}
                }
            }}),
        )
        .on(
            "GET /api/report/summary",
            json!({"ok": true, "data": {"total_symbols": 2, "successful": 1, "failed": 1}}),
        )
        .on(
            "GET /api/recommendations",
            json!({"ok": true, "data": {"items": [
                {"symbol": "GAZP", "action": "BUY", "score": 2.0},
                {"symbol": "LKOH", "action": "SELL", "score": -1.5}
            ]}}),
        );
    backend
}

fn settings_routes(backend: &ScriptedBackend) {
    backend
        .on("GET /api/portfolio/view", json!({"ok": false, "error": "Portfolio not found"}))
        .on("GET /api/config", json!({"ok": true, "data": {"universe": [{"symbol": "SBER", "market": "moex"}]}}))
        .on("GET /scheduler/status", json!({"ok": true, "data": {"running": true, "jobs": []}}));
}

// ============= View Scenarios =============

/// A slow forecast for an older selection must not overwrite a newer one
#[tokio::test]
async fn test_forecast_latest_selection_wins() {
    let backend = ScriptedBackend::default();
    backend
        .on_delayed(
            "GET /predictor/signal?tickers=A",
            Duration::from_millis(300),
            json!({"ok": true, "data": {"signal_level": "LOW", "reason": "A"}}),
        )
        .on(
            "GET /predictor/signal?tickers=B",
            json!({"ok": true, "data": {"signal_level": "HIGH_PROBABILITY", "reason": "B"}}),
        )
        .on("GET /predictor/history", json!({"ok": true, "data": {"items": []}}));
    let view = ForecastView::new(backend.client(), policy(), 5, None);

    let slow = {
        let view = view.clone();
        tokio::spawn(async move { view.analyze_input("A").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = view.analyze_input("B").await.unwrap();
    let slow = slow.await.unwrap().unwrap();

    assert_eq!(fast, LoadOutcome::Applied);
    assert_eq!(slow, LoadOutcome::Stale);
    let reason = view.with_state(|s| s.forecast.value().map(|f| f.reason.clone()));
    assert_eq!(reason.as_deref(), Some("B"));
}

/// Lowercase tickers are rejected locally; the backend never sees them
#[tokio::test]
async fn test_add_ticker_rejects_lowercase() {
    let backend = ScriptedBackend::default();
    settings_routes(&backend);
    backend.on("POST /api/config/add-ticker", json!({"ok": true, "message": "Ticker SBER1 added"}));
    let view = SettingsView::new(backend.client(), policy());

    let rejected = view
        .add_ticker(&TickerForm { symbol: "sber1".to_string(), market: "moex".to_string() })
        .await;
    assert!(matches!(
        rejected,
        Err(DashboardError::Validation(ValidationError::InvalidTicker { .. }))
    ));
    assert_eq!(backend.calls(Method::Post, "/api/config/add-ticker"), 0);

    view.add_ticker(&TickerForm { symbol: "SBER1".to_string(), market: "moex".to_string() })
        .await
        .unwrap();
    assert_eq!(backend.calls(Method::Post, "/api/config/add-ticker"), 1);
}

/// Report table keeps backend order, shows the trend and the error row
#[tokio::test]
async fn test_report_page_render() {
    let backend = report_backend();
    let view = ReportView::new(backend.client(), policy(), Some(300));

    assert!(view.reload().await);
    let html = view.render(Instant::now());

    assert!(html.contains("<td>250.00</td>"));
    assert!(html.contains("+25.0%"));
    assert!(html.contains(r#"<td colspan="10" class="text-danger">❌ not found</td>"#));
    assert!(html.contains("BUY: 1"));
    assert!(html.contains("SELL: 1"));
    assert!(html.find(r#"data-symbol="SBER""#).unwrap() < html.find(r#"data-symbol="XXXX""#).unwrap());
    assert_eq!(html, view.render(Instant::now()));
}

/// Backend down: the page still renders, with an error notice
#[tokio::test]
async fn test_report_backend_down() {
    let backend = ScriptedBackend::default();
    let view = ReportView::new(backend.client(), policy(), None);

    assert!(!view.reload().await);
    let html = view.render(Instant::now());
    assert!(html.contains("alert-danger"));
    assert!(html.contains("Failed to load report"));
}

// ============= HTTP Server =============

async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn app_state(backend: &ScriptedBackend) -> AppState {
    let client = backend.client();
    AppState {
        report: ReportView::new(client.clone(), policy(), None),
        forecast: ForecastView::new(client.clone(), policy(), 5, None),
        settings: SettingsView::new(client, policy()),
    }
}

#[tokio::test]
async fn test_server_health_and_report_page() {
    let backend = report_backend();
    let base = serve(app_state(&backend)).await;
    let http = reqwest::Client::new();

    let health: Value = http.get(format!("{}/health", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(health, json!({"ok": true}));

    let page = http.get(format!("{}/", base)).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("GAZP"));

    // Filtering re-renders without refetching
    let page = http.get(format!("{}/?filter=SELL", base)).send().await.unwrap().text().await.unwrap();
    assert!(page.contains(r#"data-symbol="GAZP" data-action="BUY" style="display:none""#));
    assert_eq!(backend.calls(Method::Get, "/api/report/today"), 1);
}

#[tokio::test]
async fn test_server_ticker_form_redirects_with_notice() {
    let backend = ScriptedBackend::default();
    settings_routes(&backend);
    let base = serve(app_state(&backend)).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/settings/tickers/add", base))
        .form(&[("symbol", "sber1"), ("market", "moex")])
        .send()
        .await
        .unwrap();
    assert!(response.url().path().ends_with("/settings"));

    let page = response.text().await.unwrap();
    assert!(page.contains("may only contain A-Z and 0-9"));
    assert_eq!(backend.calls(Method::Post, "/api/config/add-ticker"), 0);
}

#[tokio::test]
async fn test_server_dismiss_unknown_page_keeps_notices() {
    let backend = ScriptedBackend::default();
    settings_routes(&backend);
    let state = app_state(&backend);
    let settings = state.settings.clone();
    let base = serve(state).await;
    let http = reqwest::Client::new();

    http.post(format!("{}/settings/tickers/add", base))
        .form(&[("symbol", "sber1"), ("market", "moex")])
        .send()
        .await
        .unwrap();
    let id = settings.with_state(|s| s.notices.clone().active(Instant::now())[0].id);

    let response = http
        .post(format!("{}/notices/elsewhere/{}/dismiss", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/");
    assert_eq!(settings.with_state(|s| s.notices.clone().active(Instant::now()).len()), 1);

    let response = http
        .post(format!("{}/notices/settings/{}/dismiss", base, id))
        .send()
        .await
        .unwrap();
    assert!(response.url().path().ends_with("/settings"));
    assert!(settings.with_state(|s| s.notices.is_empty()));
}
