use std::sync::{Arc, Mutex};
use std::time::Instant;
use futures_util::future::join;
use tracing::{debug, info, warn};

use super::{lock, Pipeline, TriggerOutcome};
use crate::client::BackendClient;
use crate::constants::events;
use crate::constants::forecast::TICKER_SUGGESTIONS;
use crate::error::{DashboardError, FetchError, ValidationError};
use crate::models::{ForecastResult, HistoryEntry, PredictorConfig};
use crate::normalize::parse_ticker_list;
use crate::render::forecast::{render_page, ForecastPage};
use crate::state::{LoadOutcome, NoticeBoard, NoticeKind, NoticePolicy, RefreshGate, Slot};

const FORECAST: Pipeline = Pipeline {
    tag: "🔮 [FORECAST]",
    event: events::FORECAST_LOADED,
    fallback: "Failed to load forecast",
    notify_domain: true,
};

const HISTORY: Pipeline = Pipeline {
    tag: "🔮 [FORECAST]",
    event: events::HISTORY_LOADED,
    fallback: "Failed to load forecast history",
    notify_domain: false,
};

const PREDICTOR: Pipeline = Pipeline {
    tag: "🔮 [FORECAST]",
    event: events::CONFIG_LOADED,
    fallback: "Failed to load predictor configuration",
    notify_domain: false,
};

pub struct ForecastState {
    /// Current ticker selection; empty asks for the backend's default set
    pub tickers: Vec<String>,
    pub forecast: Slot<ForecastResult>,
    pub history: Slot<Vec<HistoryEntry>>,
    pub config: Slot<PredictorConfig>,
    pub notices: NoticeBoard,
}

impl ForecastState {
    pub fn new(policy: NoticePolicy) -> Self {
        Self {
            tickers: Vec::new(),
            forecast: Slot::new(),
            history: Slot::new(),
            config: Slot::new(),
            notices: NoticeBoard::new(policy),
        }
    }
}

#[derive(Clone)]
pub struct ForecastView {
    client: BackendClient,
    state: Arc<Mutex<ForecastState>>,
    gate: RefreshGate,
    history_limit: usize,
    auto_refresh_secs: Option<u64>,
}

impl ForecastView {
    pub fn new(
        client: BackendClient,
        policy: NoticePolicy,
        history_limit: usize,
        auto_refresh_secs: Option<u64>,
    ) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(ForecastState::new(policy))),
            gate: RefreshGate::new(),
            history_limit,
            auto_refresh_secs,
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ForecastState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub async fn load_configuration(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).config.begin();
        let result = self.client.predictor_config().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        PREDICTOR.settle(&mut state.config, &mut state.notices, ticket, result)
    }

    /// Forecast for `tickers`, or for the current selection when `None`.
    ///
    /// A response that settles after a later request's response is dropped,
    /// so the panel always shows the most recently requested ticker set.
    pub async fn load_forecast(&self, tickers: Option<Vec<String>>) -> Result<LoadOutcome, FetchError> {
        let (ticket, tickers) = {
            let mut state = lock(&self.state);
            if let Some(tickers) = tickers {
                state.tickers = tickers;
            }
            (state.forecast.begin(), state.tickers.clone())
        };
        debug!("🔮 [FORECAST] Requesting forecast #{} for {:?}", ticket.seq(), tickers);

        let result = self.client.forecast(&tickers).await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        let outcome = FORECAST.settle(&mut state.forecast, &mut state.notices, ticket, result)?;
        if outcome == LoadOutcome::Applied {
            if let Some(forecast) = state.forecast.value() {
                info!(
                    "🔮 [FORECAST] {} ({} news, {} relevant)",
                    forecast.signal_level, forecast.stats.total, forecast.stats.relevant
                );
            }
        }
        Ok(outcome)
    }

    pub async fn load_history(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).history.begin();
        let result = self.client.forecast_history(self.history_limit).await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        HISTORY.settle(&mut state.history, &mut state.notices, ticket, result)
    }

    /// Forecast first, then history so the new entry shows up
    async fn analyze(&self, tickers: Vec<String>) -> Result<LoadOutcome, DashboardError> {
        let outcome = self.load_forecast(Some(tickers)).await?;
        // History failures are already surfaced through the slot.
        let _ = self.load_history().await;
        Ok(outcome)
    }

    /// Comma-separated ticker input from the analyze form
    pub async fn analyze_input(&self, input: &str) -> Result<LoadOutcome, DashboardError> {
        let tickers = match parse_ticker_list(input) {
            Ok(tickers) => tickers,
            Err(e) => return Err(self.reject(e)),
        };
        self.analyze(tickers).await
    }

    /// One of the suggestion groups, by index
    pub async fn quick_analyze(&self, group: usize) -> Result<LoadOutcome, DashboardError> {
        let Some(tickers) = TICKER_SUGGESTIONS.get(group) else {
            return Err(self.reject(ValidationError::NoTickers));
        };
        self.analyze(tickers.iter().map(|t| t.to_string()).collect()).await
    }

    fn reject(&self, e: ValidationError) -> DashboardError {
        warn!("🔮 [FORECAST] {}: {}", events::VALIDATION_REJECTED, e);
        lock(&self.state).notices.push(NoticeKind::Warning, e.to_string(), Instant::now());
        DashboardError::Validation(e)
    }

    async fn reload(&self) -> bool {
        let (forecast, history) = join(self.load_forecast(None), self.load_history()).await;
        forecast.is_ok() && history.is_ok()
    }

    /// Manual refresh of forecast and history for the current selection
    pub async fn refresh(&self) -> TriggerOutcome {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!("🔮 [FORECAST] {}: manual refresh while busy", events::REFRESH_SKIPPED);
            return TriggerOutcome::Busy;
        };
        if self.reload().await {
            lock(&self.state)
                .notices
                .push(NoticeKind::Success, "Forecast refreshed", Instant::now());
        }
        TriggerOutcome::Ran
    }

    pub async fn poll(&self) -> TriggerOutcome {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!("🔮 [FORECAST] {}: poll tick while busy", events::REFRESH_SKIPPED);
            return TriggerOutcome::Busy;
        };
        self.reload().await;
        TriggerOutcome::Ran
    }

    /// First visit: fetch whatever has never been loaded
    pub async fn ensure_loaded(&self) {
        let (config, data) = self.with_state(|s| {
            (
                !s.config.is_loaded() && !s.config.in_flight(),
                !s.forecast.is_loaded() && !s.forecast.in_flight(),
            )
        });
        if config {
            let _ = self.load_configuration().await;
        }
        if data {
            self.poll().await;
        }
    }

    pub fn dismiss(&self, id: u64) -> bool {
        lock(&self.state).notices.dismiss(id)
    }

    pub fn render(&self, now: Instant) -> String {
        let refresh_busy = self.gate.is_busy();
        let mut state = lock(&self.state);
        let notices = state.notices.active(now);
        render_page(&ForecastPage {
            tickers: &state.tickers,
            forecast: state.forecast.value(),
            forecast_error: state.forecast.error(),
            loading: state.forecast.in_flight(),
            history: state.history.value().map(Vec::as_slice),
            history_error: state.history.error(),
            config: state.config.value(),
            refresh_busy,
            auto_refresh_secs: self.auto_refresh_secs,
            notices: &notices,
        })
    }
}
