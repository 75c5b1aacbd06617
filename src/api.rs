//! Embedded dashboard server
//!
//! GET routes render a page from view state. POST routes mutate view state
//! (or call the backend through a view) and redirect back to their page.

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::DashboardError;
use crate::models::ActionFilter;
use crate::views::{
    ForecastView, ParametersForm, ReportView, SchedulerForm, SettingsView, TickerForm,
    TriggerOutcome,
};

/// Controllers shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub report: ReportView,
    pub forecast: ForecastView,
    pub settings: SettingsView,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report_page))
        .route("/report/run-now", post(run_now))
        .route("/report/refresh", post(refresh_report))
        .route("/forecast", get(forecast_page))
        .route("/forecast/analyze", post(analyze))
        .route("/forecast/quick/{group}", post(quick_analyze))
        .route("/forecast/refresh", post(refresh_forecast))
        .route("/settings", get(settings_page))
        .route("/settings/portfolio", post(save_portfolio))
        .route("/settings/positions/add", post(add_position))
        .route("/settings/positions/{idx}/remove", post(remove_position))
        .route("/settings/parameters", post(save_parameters))
        .route("/settings/scheduler", post(save_scheduler))
        .route("/settings/tickers/add", post(add_ticker))
        .route("/settings/tickers/{symbol}/remove", post(remove_ticker))
        .route("/notices/{page}/{id}/dismiss", post(dismiss_notice))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn run_server(state: AppState, listen_addr: &str) -> Result<(), DashboardError> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("🌐 [SERVER] Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("🌐 [SERVER] Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("🌐 [SERVER] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🌐 [SERVER] Shutdown requested");
}

async fn health() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

// ============= Report =============

#[derive(Deserialize)]
struct ReportQuery {
    q: Option<String>,
    filter: Option<String>,
}

/// Search and filter only re-render; a plain visit fetches what is missing
async fn report_page(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Html<String> {
    let view = &state.report;
    if query.q.is_none() && query.filter.is_none() {
        view.ensure_loaded().await;
    }
    if let Some(search) = &query.q {
        view.set_search(search);
    }
    if let Some(filter) = &query.filter {
        view.set_filter(ActionFilter::parse(filter));
    }
    Html(view.render(Instant::now()))
}

async fn run_now(State(state): State<AppState>) -> Redirect {
    if state.report.spawn_run_now() == TriggerOutcome::Busy {
        info!("📊 [REPORT] Run-now ignored, generation in progress");
    }
    Redirect::to("/")
}

async fn refresh_report(State(state): State<AppState>) -> Redirect {
    state.report.refresh().await;
    Redirect::to("/")
}

// ============= Forecast =============

#[derive(Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    tickers: String,
}

async fn forecast_page(State(state): State<AppState>) -> Html<String> {
    state.forecast.ensure_loaded().await;
    Html(state.forecast.render(Instant::now()))
}

async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Redirect {
    // Failures are recorded as notices on the view.
    let _ = state.forecast.analyze_input(&form.tickers).await;
    Redirect::to("/forecast")
}

async fn quick_analyze(State(state): State<AppState>, Path(group): Path<usize>) -> Redirect {
    let _ = state.forecast.quick_analyze(group).await;
    Redirect::to("/forecast")
}

async fn refresh_forecast(State(state): State<AppState>) -> Redirect {
    state.forecast.refresh().await;
    Redirect::to("/forecast")
}

// ============= Settings =============

async fn settings_page(State(state): State<AppState>) -> Html<String> {
    state.settings.ensure_loaded().await;
    Html(state.settings.render(Instant::now()))
}

async fn save_portfolio(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Redirect {
    let _ = state.settings.save_portfolio(&fields).await;
    Redirect::to("/settings")
}

async fn add_position(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Redirect {
    state.settings.add_position(&fields);
    Redirect::to("/settings")
}

async fn remove_position(
    State(state): State<AppState>,
    Path(idx): Path<usize>,
    Form(fields): Form<HashMap<String, String>>,
) -> Redirect {
    state.settings.remove_position(&fields, idx);
    Redirect::to("/settings")
}

async fn save_parameters(State(state): State<AppState>, Form(form): Form<ParametersForm>) -> Redirect {
    let _ = state.settings.save_parameters(&form).await;
    Redirect::to("/settings")
}

async fn save_scheduler(State(state): State<AppState>, Form(form): Form<SchedulerForm>) -> Redirect {
    let _ = state.settings.save_scheduler(&form).await;
    Redirect::to("/settings")
}

async fn add_ticker(State(state): State<AppState>, Form(form): Form<TickerForm>) -> Redirect {
    let _ = state.settings.add_ticker(&form).await;
    Redirect::to("/settings")
}

async fn remove_ticker(State(state): State<AppState>, Path(symbol): Path<String>) -> Redirect {
    let _ = state.settings.remove_ticker(&symbol).await;
    Redirect::to("/settings")
}

// ============= Notices =============

async fn dismiss_notice(State(state): State<AppState>, Path((page, id)): Path<(String, u64)>) -> Redirect {
    match page.as_str() {
        "report" => {
            state.report.dismiss(id);
            Redirect::to("/")
        }
        "forecast" => {
            state.forecast.dismiss(id);
            Redirect::to("/forecast")
        }
        "settings" => {
            state.settings.dismiss(id);
            Redirect::to("/settings")
        }
        _ => {
            warn!("🌐 [SERVER] Dismiss for unknown page '{}'", page);
            Redirect::to("/")
        }
    }
}
