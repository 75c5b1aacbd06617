//! Settings controller: portfolio editor, analysis parameters, scheduler
//! time and the ticker universe.
//!
//! The portfolio form edits a local draft. The draft survives failed saves
//! and is replaced only when the authoritative portfolio is (re)loaded.
//! The other forms keep the input of a failed submission so the page
//! re-renders it for correction.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use futures_util::future::{join, join3};
use tracing::{info, warn};

use super::{lock, Pipeline};
use crate::client::BackendClient;
use crate::constants::events;
use crate::constants::settings::{DEFAULT_CURRENCY, DEFAULT_MARKET, MAX_POSITIONS};
use crate::error::{DashboardError, FetchError, ValidationError};
use crate::models::{
    Config, ConfigUpdate, NewTicker, Portfolio, Position, PositionKind, RateLimit, Schedule,
    SchedulerStatus, Windows,
};
use crate::normalize::{
    parse_count_or_zero, parse_number_or_zero, parse_sma_windows, validate_ticker,
};
use crate::render::settings::{render_page, SettingsPage};
use crate::state::{LoadOutcome, NoticeBoard, NoticeKind, NoticePolicy, Slot};

const PORTFOLIO: Pipeline = Pipeline {
    tag: "💼 [SETTINGS]",
    event: events::PORTFOLIO_LOADED,
    fallback: "Failed to load portfolio",
    notify_domain: true,
};

const CONFIG: Pipeline = Pipeline {
    tag: "⚙️ [SETTINGS]",
    event: events::CONFIG_LOADED,
    fallback: "Failed to load configuration",
    notify_domain: true,
};

const SCHEDULER: Pipeline = Pipeline {
    tag: "⏰ [SETTINGS]",
    event: "scheduler_status_loaded",
    fallback: "Failed to load scheduler status",
    notify_domain: false,
};

/// Editable column of a position row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionField {
    Symbol,
    Quantity,
    AvgPrice,
    Market,
    Kind,
    Notes,
}

impl PositionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionField::Symbol => "symbol",
            PositionField::Quantity => "quantity",
            PositionField::AvgPrice => "avg_price",
            PositionField::Market => "market",
            PositionField::Kind => "type",
            PositionField::Notes => "notes",
        }
    }

    /// Split an indexed form field name such as "avg_price_3"
    pub fn parse_indexed(name: &str) -> Option<(PositionField, usize)> {
        let (field, index) = name.rsplit_once('_')?;
        let index = index.parse().ok()?;
        let field = match field {
            "symbol" => PositionField::Symbol,
            "quantity" | "qty" => PositionField::Quantity,
            "avg_price" => PositionField::AvgPrice,
            "market" => PositionField::Market,
            "type" => PositionField::Kind,
            "notes" | "name" => PositionField::Notes,
            _ => return None,
        };
        Some((field, index))
    }

    pub fn apply(&self, position: &mut Position, value: &str) {
        match self {
            PositionField::Symbol => position.symbol = value.trim().to_uppercase(),
            PositionField::Quantity => position.quantity = parse_count_or_zero(value),
            PositionField::AvgPrice => position.avg_price = Some(parse_number_or_zero(value)),
            PositionField::Market => {
                let market = value.trim();
                position.market = if market.is_empty() { DEFAULT_MARKET.to_string() } else { market.to_string() };
            }
            PositionField::Kind => position.kind = PositionKind::parse(value),
            PositionField::Notes => position.notes = value.to_string(),
        }
    }
}

/// Rebuild the portfolio draft from the submitted form.
///
/// `position_count` fixes the number of rows, bounded by the rows the draft
/// already has or the indexed fields the form carries. Rows keep whatever the
/// base draft knew that the form does not carry (e.g. `current_value`).
pub fn portfolio_from_form(fields: &HashMap<String, String>, base: &Portfolio) -> Portfolio {
    let mut portfolio = base.clone();

    if let Some(name) = fields.get("name") {
        let name = name.trim();
        portfolio.name = (!name.is_empty()).then(|| name.to_string());
    }
    if let Some(currency) = fields.get("currency") {
        let currency = currency.trim();
        portfolio.currency = if currency.is_empty() { DEFAULT_CURRENCY.to_string() } else { currency.to_string() };
    }
    if let Some(cash) = fields.get("cash") {
        portfolio.cash = parse_number_or_zero(cash);
    }

    // Sorted so repeated submissions apply fields in the same order
    let mut indexed: Vec<(PositionField, usize, &str)> = fields
        .iter()
        .filter_map(|(name, value)| {
            PositionField::parse_indexed(name).map(|(field, index)| (field, index, value.as_str()))
        })
        .collect();
    indexed.sort_by_key(|(field, index, _)| (*index, field.as_str()));

    // Rows the form can address: what the draft has, or the rows it submitted
    let submitted_rows = indexed.last().map(|(_, index, _)| index.saturating_add(1)).unwrap_or(0);
    let limit = portfolio.positions.len().max(submitted_rows.min(MAX_POSITIONS));
    let count = fields
        .get("position_count")
        .map(|c| parse_count_or_zero(c) as usize)
        .unwrap_or(portfolio.positions.len())
        .min(limit);
    portfolio.positions.resize_with(count, Position::default);

    for (field, index, value) in indexed {
        if let Some(position) = portfolio.positions.get_mut(index) {
            field.apply(position, value);
        }
    }
    portfolio
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParametersForm {
    pub dividend_target: String,
    pub sma_windows: String,
    pub rate_limit: String,
}

impl ParametersForm {
    pub fn to_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            dividend_target_pct: Some(parse_number_or_zero(&self.dividend_target)),
            windows: Some(Windows { sma: parse_sma_windows(&self.sma_windows) }),
            rate_limit: Some(RateLimit { per_symbol_sleep_sec: parse_number_or_zero(&self.rate_limit) }),
            schedule: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SchedulerForm {
    pub daily_time: String,
    pub timezone: String,
}

impl SchedulerForm {
    pub fn to_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            schedule: Some(Schedule {
                daily_time: self.daily_time.trim().to_string(),
                tz: self.timezone.trim().to_string(),
            }),
            ..ConfigUpdate::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TickerForm {
    pub symbol: String,
    pub market: String,
}

pub struct SettingsState {
    /// Last portfolio loaded from the backend
    pub portfolio: Slot<Portfolio>,
    /// What the form shows and what a save submits
    pub draft: Portfolio,
    pub config: Slot<Config>,
    pub scheduler: Slot<SchedulerStatus>,
    /// Input of a failed submission, shown again until a save succeeds
    pub parameters_draft: Option<ParametersForm>,
    pub scheduler_draft: Option<SchedulerForm>,
    pub ticker_draft: Option<TickerForm>,
    pub notices: NoticeBoard,
}

impl SettingsState {
    pub fn new(policy: NoticePolicy) -> Self {
        Self {
            portfolio: Slot::new(),
            draft: Portfolio::default(),
            config: Slot::new(),
            scheduler: Slot::new(),
            parameters_draft: None,
            scheduler_draft: None,
            ticker_draft: None,
            notices: NoticeBoard::new(policy),
        }
    }
}

#[derive(Clone)]
pub struct SettingsView {
    client: BackendClient,
    state: Arc<Mutex<SettingsState>>,
}

impl SettingsView {
    pub fn new(client: BackendClient, policy: NoticePolicy) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SettingsState::new(policy))),
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&SettingsState) -> R) -> R {
        f(&lock(&self.state))
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        lock(&self.state).notices.push(kind, message, Instant::now());
    }

    fn fail(&self, action: &str, e: FetchError, fallback: &str) -> DashboardError {
        warn!("⚙️ [SETTINGS] {} failed: {}", action, e);
        self.notify(NoticeKind::Error, e.user_message(fallback));
        DashboardError::Fetch(e)
    }

    fn reject(&self, e: ValidationError) -> DashboardError {
        warn!("⚙️ [SETTINGS] {}: {}", events::VALIDATION_REJECTED, e);
        self.notify(NoticeKind::Error, e.to_string());
        DashboardError::Validation(e)
    }

    // ============= Portfolio =============

    /// No stored portfolio yet loads as an empty RUB portfolio. A newly
    /// applied portfolio replaces the draft.
    pub async fn load_portfolio(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).portfolio.begin();
        let result = self.client.portfolio().await.map(Option::unwrap_or_default);
        let mut state = lock(&self.state);
        let state = &mut *state;
        let outcome = PORTFOLIO.settle(&mut state.portfolio, &mut state.notices, ticket, result)?;
        if outcome == LoadOutcome::Applied {
            if let Some(portfolio) = state.portfolio.value() {
                state.draft = portfolio.clone();
            }
        }
        Ok(outcome)
    }

    /// Merge the submitted form into the draft
    pub fn apply_form(&self, fields: &HashMap<String, String>) {
        let mut state = lock(&self.state);
        state.draft = portfolio_from_form(fields, &state.draft);
    }

    pub fn add_position(&self, fields: &HashMap<String, String>) {
        let mut state = lock(&self.state);
        state.draft = portfolio_from_form(fields, &state.draft);
        state.draft.positions.push(Position::default());
    }

    pub fn remove_position(&self, fields: &HashMap<String, String>, index: usize) -> bool {
        let mut state = lock(&self.state);
        state.draft = portfolio_from_form(fields, &state.draft);
        if index < state.draft.positions.len() {
            state.draft.positions.remove(index);
            true
        } else {
            false
        }
    }

    pub fn update_position(&self, index: usize, field: PositionField, value: &str) -> bool {
        let mut state = lock(&self.state);
        match state.draft.positions.get_mut(index) {
            Some(position) => {
                field.apply(position, value);
                true
            }
            None => false,
        }
    }

    /// Submit the draft (after merging `fields`). Rows without a symbol are
    /// not sent. On success the authoritative portfolio is reloaded; on
    /// failure the draft stays as the user left it.
    pub async fn save_portfolio(&self, fields: &HashMap<String, String>) -> Result<(), DashboardError> {
        let submission = {
            let mut state = lock(&self.state);
            state.draft = portfolio_from_form(fields, &state.draft);
            state.draft.for_submission()
        };

        match self.client.save_portfolio(&submission).await {
            Ok(_) => {
                info!("💼 [SETTINGS] Portfolio saved ({} positions)", submission.positions.len());
                self.notify(NoticeKind::Success, "Portfolio saved");
                let _ = self.load_portfolio().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Portfolio save", e, "Failed to save portfolio")),
        }
    }

    // ============= Config =============

    pub async fn load_config(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).config.begin();
        let result = self.client.config().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        CONFIG.settle(&mut state.config, &mut state.notices, ticket, result)
    }

    pub async fn load_scheduler_status(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).scheduler.begin();
        let result = self.client.scheduler_status().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        SCHEDULER.settle(&mut state.scheduler, &mut state.notices, ticket, result)
    }

    pub async fn save_parameters(&self, form: &ParametersForm) -> Result<(), DashboardError> {
        let update = form.to_update();
        let result = self.client.update_config(&update).await;
        lock(&self.state).parameters_draft = result.is_err().then(|| form.clone());
        match result {
            Ok(_) => {
                info!("⚙️ [SETTINGS] Parameters saved: {:?}", update);
                self.notify(NoticeKind::Success, "Parameters saved");
                let _ = self.load_config().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Parameter update", e, "Failed to save parameters")),
        }
    }

    /// The backend picks up a new schedule only after a restart, so success
    /// is reported as a warning.
    pub async fn save_scheduler(&self, form: &SchedulerForm) -> Result<(), DashboardError> {
        let result = self.client.update_config(&form.to_update()).await;
        lock(&self.state).scheduler_draft = result.is_err().then(|| form.clone());
        match result {
            Ok(_) => {
                info!("⏰ [SETTINGS] Schedule set to {} {}", form.daily_time, form.timezone);
                self.notify(
                    NoticeKind::Warning,
                    "Schedule saved. Restart the server to apply the new time.",
                );
                let _ = join(self.load_config(), self.load_scheduler_status()).await;
                Ok(())
            }
            Err(e) => Err(self.fail("Scheduler update", e, "Failed to save schedule")),
        }
    }

    /// Rejected input never reaches the backend
    pub async fn add_ticker(&self, form: &TickerForm) -> Result<(), DashboardError> {
        let symbol = validate_ticker(&form.symbol).map_err(|e| {
            lock(&self.state).ticker_draft = Some(form.clone());
            self.reject(e)
        })?;
        let market = form.market.trim();
        let ticker = NewTicker {
            symbol,
            market: if market.is_empty() { DEFAULT_MARKET.to_string() } else { market.to_string() },
        };

        let result = self.client.add_ticker(&ticker).await;
        lock(&self.state).ticker_draft = result.is_err().then(|| form.clone());
        match result {
            Ok(ack) => {
                info!("📋 [SETTINGS] Ticker {} added", ticker.symbol);
                let message = ack.message.unwrap_or_else(|| format!("Ticker {} added", ticker.symbol));
                self.notify(NoticeKind::Success, message);
                let _ = self.load_config().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Ticker add", e, "Failed to add ticker")),
        }
    }

    pub async fn remove_ticker(&self, symbol: &str) -> Result<(), DashboardError> {
        match self.client.remove_ticker(symbol).await {
            Ok(ack) => {
                info!("📋 [SETTINGS] Ticker {} removed", symbol);
                let message = ack.message.unwrap_or_else(|| format!("Ticker {} removed", symbol));
                self.notify(NoticeKind::Success, message);
                let _ = self.load_config().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Ticker removal", e, "Failed to remove ticker")),
        }
    }

    /// Initial page load: portfolio, config and scheduler status concurrently
    pub async fn load_all(&self) {
        let _ = join3(self.load_portfolio(), self.load_config(), self.load_scheduler_status()).await;
    }

    /// First visit: fetch whatever has never been loaded. Loaded slices are
    /// left alone so an unsaved draft survives navigation.
    pub async fn ensure_loaded(&self) {
        let (portfolio, config, scheduler) = self.with_state(|s| {
            (
                !s.portfolio.is_loaded() && !s.portfolio.in_flight(),
                !s.config.is_loaded() && !s.config.in_flight(),
                !s.scheduler.is_loaded() && !s.scheduler.in_flight(),
            )
        });
        let _ = join3(
            async {
                if portfolio {
                    let _ = self.load_portfolio().await;
                }
            },
            async {
                if config {
                    let _ = self.load_config().await;
                }
            },
            async {
                if scheduler {
                    let _ = self.load_scheduler_status().await;
                }
            },
        )
        .await;
    }

    pub fn dismiss(&self, id: u64) -> bool {
        lock(&self.state).notices.dismiss(id)
    }

    pub fn render(&self, now: Instant) -> String {
        let mut state = lock(&self.state);
        let notices = state.notices.active(now);
        render_page(&SettingsPage {
            portfolio: &state.draft,
            portfolio_error: state.portfolio.error(),
            config: state.config.value(),
            config_error: state.config.error(),
            scheduler: state.scheduler.value(),
            parameters_draft: state.parameters_draft.as_ref(),
            scheduler_draft: state.scheduler_draft.as_ref(),
            ticker_draft: state.ticker_draft.as_ref(),
            notices: &notices,
        })
    }
}
