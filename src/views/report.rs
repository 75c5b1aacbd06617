use std::sync::{Arc, Mutex};
use std::time::Instant;
use futures_util::future::join3;
use tracing::{debug, info, warn};

use super::{lock, Pipeline, TriggerOutcome};
use crate::client::BackendClient;
use crate::constants::events;
use crate::error::FetchError;
use crate::models::{ActionFilter, Recommendation, Report, ReportSummary};
use crate::render::report::{render_page, ReportPage};
use crate::state::{
    LoadOutcome, NoticeBoard, NoticeKind, NoticePolicy, RefreshGate, RefreshPermit, Slot,
};

const REPORT: Pipeline = Pipeline {
    tag: "📊 [REPORT]",
    event: events::REPORT_LOADED,
    fallback: "Failed to load report",
    notify_domain: false,
};

const SUMMARY: Pipeline = Pipeline {
    tag: "📊 [REPORT]",
    event: "summary_loaded",
    fallback: "Failed to load report summary",
    notify_domain: false,
};

const RECOMMENDATIONS: Pipeline = Pipeline {
    tag: "💡 [REPORT]",
    event: events::RECOMMENDATIONS_LOADED,
    fallback: "Failed to load recommendations",
    notify_domain: false,
};

/// Report page state: report, summary, recommendations and the user's
/// search/filter selection
pub struct ReportState {
    pub report: Slot<Report>,
    pub summary: Slot<ReportSummary>,
    pub recommendations: Slot<Vec<Recommendation>>,
    pub filter: ActionFilter,
    pub search: String,
    pub notices: NoticeBoard,
}

impl ReportState {
    pub fn new(policy: NoticePolicy) -> Self {
        Self {
            report: Slot::new(),
            summary: Slot::new(),
            recommendations: Slot::new(),
            filter: ActionFilter::All,
            search: String::new(),
            notices: NoticeBoard::new(policy),
        }
    }
}

#[derive(Clone)]
pub struct ReportView {
    client: BackendClient,
    state: Arc<Mutex<ReportState>>,
    gate: RefreshGate,
    auto_refresh_secs: Option<u64>,
}

impl ReportView {
    pub fn new(client: BackendClient, policy: NoticePolicy, auto_refresh_secs: Option<u64>) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(ReportState::new(policy))),
            gate: RefreshGate::new(),
            auto_refresh_secs,
        }
    }

    /// Read access to the current state
    pub fn with_state<R>(&self, f: impl FnOnce(&ReportState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// `ok: false` leaves "no report generated yet" in the slot without a notice
    pub async fn load_report(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).report.begin();
        let result = self.client.today_report().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        let result = result.map_err(|e| match e {
            FetchError::Domain { endpoint, message: None } => FetchError::Domain {
                endpoint,
                message: Some("No report generated yet".to_string()),
            },
            other => other,
        });
        REPORT.settle(&mut state.report, &mut state.notices, ticket, result)
    }

    pub async fn load_summary(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).summary.begin();
        let result = self.client.report_summary().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        SUMMARY.settle(&mut state.summary, &mut state.notices, ticket, result)
    }

    pub async fn load_recommendations(&self) -> Result<LoadOutcome, FetchError> {
        let ticket = lock(&self.state).recommendations.begin();
        let result = self.client.recommendations().await;
        let mut state = lock(&self.state);
        let state = &mut *state;
        RECOMMENDATIONS.settle(&mut state.recommendations, &mut state.notices, ticket, result)
    }

    /// Report, summary and recommendations concurrently; true when all succeeded
    pub async fn reload(&self) -> bool {
        let (report, summary, recommendations) =
            join3(self.load_report(), self.load_summary(), self.load_recommendations()).await;
        let ok = report.is_ok() && summary.is_ok() && recommendations.is_ok();
        if ok {
            let state = lock(&self.state);
            info!(
                "📊 [REPORT] Reloaded: {} symbols, {} recommendations",
                state.report.value().map_or(0, |r| r.universe.len()),
                state.recommendations.value().map_or(0, |r| r.len())
            );
        }
        ok
    }

    /// Manual refresh button
    pub async fn refresh(&self) -> TriggerOutcome {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!("📊 [REPORT] {}: manual refresh while busy", events::REFRESH_SKIPPED);
            return TriggerOutcome::Busy;
        };
        if self.reload().await {
            self.notify(NoticeKind::Success, "Data refreshed");
        }
        TriggerOutcome::Ran
    }

    /// Poller tick; skipped while a manual trigger holds the gate
    pub async fn poll(&self) -> TriggerOutcome {
        let Some(_permit) = self.gate.try_acquire() else {
            debug!("📊 [REPORT] {}: poll tick while busy", events::REFRESH_SKIPPED);
            return TriggerOutcome::Busy;
        };
        self.reload().await;
        TriggerOutcome::Ran
    }

    /// Synchronous report regeneration, then a full reload. The trigger is
    /// disabled until the backend answers.
    pub async fn run_now(&self) -> TriggerOutcome {
        match self.acquire_run_now() {
            Some(permit) => {
                self.generate(permit).await;
                TriggerOutcome::Ran
            }
            None => TriggerOutcome::Busy,
        }
    }

    /// Take the gate now and generate in the background, so a page
    /// rendered right after this call already shows the disabled trigger
    pub fn spawn_run_now(&self) -> TriggerOutcome {
        let Some(permit) = self.acquire_run_now() else {
            return TriggerOutcome::Busy;
        };
        let view = self.clone();
        tokio::spawn(async move { view.generate(permit).await });
        TriggerOutcome::Ran
    }

    fn acquire_run_now(&self) -> Option<RefreshPermit> {
        let permit = self.gate.try_acquire();
        if permit.is_none() {
            self.notify(NoticeKind::Warning, "Report generation is already running");
        }
        permit
    }

    async fn generate(&self, _permit: RefreshPermit) {
        info!("📊 [REPORT] Report generation requested");
        match self.client.run_now().await {
            Ok(ack) => {
                let message = ack.message.unwrap_or_else(|| "Report generated".to_string());
                info!("📊 [REPORT] {}", message);
                self.notify(NoticeKind::Success, message);
                self.reload().await;
            }
            Err(e) => {
                warn!("📊 [REPORT] Report generation failed: {}", e);
                self.notify(NoticeKind::Error, e.user_message("Failed to generate report"));
            }
        }
    }

    /// First visit: fetch whatever has never been loaded
    pub async fn ensure_loaded(&self) {
        let missing = self.with_state(|s| {
            (!s.report.is_loaded() && !s.report.in_flight())
                || (!s.recommendations.is_loaded() && !s.recommendations.in_flight())
        });
        if missing {
            self.poll().await;
        }
    }

    /// Visibility only; counts and data stay as loaded
    pub fn set_filter(&self, filter: ActionFilter) {
        lock(&self.state).filter = filter;
    }

    pub fn set_search(&self, search: &str) {
        lock(&self.state).search = search.trim().to_string();
    }

    pub fn dismiss(&self, id: u64) -> bool {
        lock(&self.state).notices.dismiss(id)
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        lock(&self.state).notices.push(kind, message, Instant::now());
    }

    pub fn render(&self, now: Instant) -> String {
        let busy = self.gate.is_busy();
        let mut state = lock(&self.state);
        let notices = state.notices.active(now);
        render_page(&ReportPage {
            report: state.report.value(),
            report_error: state.report.error(),
            summary: state.summary.value(),
            recommendations: state.recommendations.value().map(Vec::as_slice),
            recommendations_error: state.recommendations.error(),
            filter: &state.filter,
            search: &state.search,
            busy,
            auto_refresh_secs: self.auto_refresh_secs,
            notices: &notices,
        })
    }
}
