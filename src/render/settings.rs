//! Settings page: portfolio editor, analysis parameters, scheduler and the
//! ticker universe.

use super::report::{error_alert, placeholder_row};
use super::{escape, format_datetime, notice, page, Page};
use crate::models::{Config, Portfolio, Position, PositionKind, SchedulerStatus};
use crate::state::Notice;
use crate::views::{ParametersForm, SchedulerForm, TickerForm};

pub struct SettingsPage<'a> {
    /// Editable draft, not necessarily what the backend holds
    pub portfolio: &'a Portfolio,
    pub portfolio_error: Option<&'a str>,
    pub config: Option<&'a Config>,
    pub config_error: Option<&'a str>,
    pub scheduler: Option<&'a SchedulerStatus>,
    /// Failed submissions, preferred over `config` when present
    pub parameters_draft: Option<&'a ParametersForm>,
    pub scheduler_draft: Option<&'a SchedulerForm>,
    pub ticker_draft: Option<&'a TickerForm>,
    pub notices: &'a [Notice],
}

pub fn render_page(view: &SettingsPage<'_>) -> String {
    let body = format!(
        r#"
        <h2 class="mb-3">⚙️ Settings</h2>
        <div class="row">
            <div class="col-lg-7">
                {portfolio_error}
                {portfolio}
            </div>
            <div class="col-lg-5">
                {config_error}
                {parameters}
                {scheduler}
                {tickers}
            </div>
        </div>"#,
        portfolio_error = view.portfolio_error.map(error_alert).unwrap_or_default(),
        portfolio = portfolio_form(view.portfolio),
        config_error = view.config_error.map(error_alert).unwrap_or_default(),
        parameters = parameters_form(view.config, view.parameters_draft),
        scheduler = scheduler_form(view.config, view.scheduler, view.scheduler_draft),
        tickers = tickers_table(view.config, view.ticker_draft),
    );

    page(Page::Settings, None, &notice::banners(Page::Settings, view.notices), &body)
}

fn kind_options(selected: PositionKind) -> String {
    PositionKind::ALL
        .iter()
        .map(|kind| {
            let attr = if *kind == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, kind.as_str(), attr)
        })
        .collect()
}

/// Editable row; field names carry the row index
pub fn position_row(index: usize, position: &Position) -> String {
    let avg_price = position
        .avg_price
        .filter(|p| *p != 0.0)
        .map(|p| p.to_string())
        .unwrap_or_default();
    format!(
        r#"
                    <div class="row g-2 mb-2 position-row" data-index="{i}">
                        <input type="hidden" name="market_{i}" value="{market}">
                        <div class="col-md-2"><input type="text" name="symbol_{i}" class="form-control" placeholder="Ticker" value="{symbol}"></div>
                        <div class="col-md-2"><input type="number" name="quantity_{i}" class="form-control" min="0" placeholder="Qty" value="{quantity}"></div>
                        <div class="col-md-2"><input type="number" name="avg_price_{i}" class="form-control" step="0.01" placeholder="Avg price" value="{avg_price}"></div>
                        <div class="col-md-2"><select name="type_{i}" class="form-select">{kinds}</select></div>
                        <div class="col-md-3"><input type="text" name="notes_{i}" class="form-control" placeholder="Notes" value="{notes}"></div>
                        <div class="col-md-1"><button type="submit" formaction="/settings/positions/{i}/remove" formmethod="post" class="btn btn-danger w-100">🗑️</button></div>
                    </div>"#,
        i = index,
        market = escape(&position.market),
        symbol = escape(&position.symbol),
        quantity = position.quantity,
        avg_price = avg_price,
        kinds = kind_options(position.kind),
        notes = escape(&position.notes),
    )
}

pub fn positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return r#"<p class="text-muted">No positions. Add one below.</p>"#.to_string();
    }
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| position_row(i, p))
        .collect()
}

pub fn portfolio_form(portfolio: &Portfolio) -> String {
    let updated = portfolio
        .updated_at
        .as_deref()
        .map(|u| format!(r#"<small class="text-muted">Updated: {}</small>"#, format_datetime(Some(u))))
        .unwrap_or_default();
    format!(
        r#"
                <div class="card mb-4">
                    <div class="card-header d-flex justify-content-between align-items-center">
                        <h5 class="mb-0">💼 Portfolio</h5>{updated}
                    </div>
                    <div class="card-body">
                        <form method="post" action="/settings/portfolio">
                            <input type="hidden" name="position_count" value="{count}">
                            <div class="row g-2 mb-3">
                                <div class="col-md-5"><label class="form-label">Name</label><input type="text" name="name" class="form-control" value="{name}"></div>
                                <div class="col-md-3"><label class="form-label">Currency</label><input type="text" name="currency" class="form-control" value="{currency}"></div>
                                <div class="col-md-4"><label class="form-label">Cash</label><input type="number" name="cash" step="0.01" class="form-control" value="{cash}"></div>
                            </div>
                            <h6>Positions</h6>
                            {positions}
                            <div class="d-flex gap-2 mt-3">
                                <button type="submit" formaction="/settings/positions/add" formmethod="post" class="btn btn-outline-secondary">➕ Add position</button>
                                <button type="submit" class="btn btn-success">💾 Save portfolio</button>
                            </div>
                        </form>
                    </div>
                </div>"#,
        updated = updated,
        count = portfolio.positions.len(),
        name = escape(portfolio.name.as_deref().unwrap_or("")),
        currency = escape(&portfolio.currency),
        cash = portfolio.cash,
        positions = positions(&portfolio.positions),
    )
}

pub fn parameters_form(config: Option<&Config>, draft: Option<&ParametersForm>) -> String {
    let (target, windows, rate) = match (draft, config) {
        (Some(d), _) => (d.dividend_target.clone(), d.sma_windows.clone(), d.rate_limit.clone()),
        (None, Some(c)) => (
            c.dividend_target_pct.to_string(),
            c.windows.sma.iter().map(|w| w.to_string()).collect::<Vec<_>>().join(", "),
            c.rate_limit.per_symbol_sleep_sec.to_string(),
        ),
        (None, None) => {
            return r#"<div class="card mb-4"><div class="card-body text-muted">Parameters unavailable</div></div>"#.to_string();
        }
    };
    format!(
        r#"
                <div class="card mb-4">
                    <div class="card-header"><h5 class="mb-0">📐 Parameters</h5></div>
                    <div class="card-body">
                        <form method="post" action="/settings/parameters">
                            <div class="mb-2"><label class="form-label">Dividend target, %</label><input type="number" step="0.1" name="dividend_target" class="form-control" value="{target}"></div>
                            <div class="mb-2"><label class="form-label">SMA windows</label><input type="text" name="sma_windows" class="form-control" value="{windows}"></div>
                            <div class="mb-2"><label class="form-label">Pause per symbol, s</label><input type="number" step="0.1" name="rate_limit" class="form-control" value="{rate}"></div>
                            <button type="submit" class="btn btn-primary">💾 Save parameters</button>
                        </form>
                    </div>
                </div>"#,
        target = escape(&target),
        windows = escape(&windows),
        rate = escape(&rate),
    )
}

/// Running with next run time, or not configured
pub fn scheduler_status(status: Option<&SchedulerStatus>) -> String {
    match status.and_then(|s| s.next_job()) {
        Some(job) if status.and_then(|s| s.running).unwrap_or(true) => format!(
            r#"<div class="alert alert-success mb-2">✅ Running. Next run: {}</div>"#,
            format_datetime(job.next_run_time.as_deref())
        ),
        _ => r#"<div class="alert alert-secondary mb-2">⏸️ Scheduler not configured</div>"#.to_string(),
    }
}

pub fn scheduler_form(
    config: Option<&Config>,
    status: Option<&SchedulerStatus>,
    draft: Option<&SchedulerForm>,
) -> String {
    let (time, tz) = match (draft, config) {
        (Some(d), _) => (d.daily_time.as_str(), d.timezone.as_str()),
        (None, Some(c)) => (c.schedule.daily_time.as_str(), c.schedule.tz.as_str()),
        (None, None) => ("", ""),
    };
    format!(
        r#"
                <div class="card mb-4">
                    <div class="card-header"><h5 class="mb-0">⏰ Scheduler</h5></div>
                    <div class="card-body">
                        {status}
                        <form method="post" action="/settings/scheduler">
                            <div class="mb-2"><label class="form-label">Daily time</label><input type="time" name="daily_time" class="form-control" value="{time}"></div>
                            <div class="mb-2"><label class="form-label">Timezone</label><input type="text" name="timezone" class="form-control" value="{tz}"></div>
                            <button type="submit" class="btn btn-primary">💾 Save schedule</button>
                        </form>
                    </div>
                </div>"#,
        status = scheduler_status(status),
        time = escape(time),
        tz = escape(tz),
    )
}

pub fn tickers_table(config: Option<&Config>, draft: Option<&TickerForm>) -> String {
    let rows = match config {
        None => placeholder_row(3, "Ticker list unavailable"),
        Some(c) if c.universe.is_empty() => placeholder_row(3, "No tickers"),
        Some(c) => c
            .universe
            .iter()
            .map(|t| {
                let segment: String = url::form_urlencoded::byte_serialize(t.symbol.as_bytes()).collect();
                format!(
                    r#"<tr><td><strong>{symbol}</strong></td><td>{market}</td><td><form method="post" action="/settings/tickers/{segment}/remove"><button type="submit" class="btn btn-sm btn-outline-danger">🗑️</button></form></td></tr>"#,
                    symbol = escape(&t.symbol),
                    market = escape(&t.market),
                    segment = segment,
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    format!(
        r#"
                <div class="card mb-4">
                    <div class="card-header"><h5 class="mb-0">📋 Tickers</h5></div>
                    <div class="card-body">
                        <form method="post" action="/settings/tickers/add" class="d-flex mb-3">
                            <input type="text" name="symbol" class="form-control me-2" placeholder="SBER" value="{symbol}">
                            <select name="market" class="form-select me-2" style="max-width: 8rem"><option value="moex">moex</option></select>
                            <button type="submit" class="btn btn-success">➕</button>
                        </form>
                        <table class="table table-sm">
                            <thead><tr><th>Ticker</th><th>Market</th><th></th></tr></thead>
                            <tbody>{rows}</tbody>
                        </table>
                    </div>
                </div>"#,
        symbol = escape(draft.map(|d| d.symbol.as_str()).unwrap_or("")),
        rows = rows,
    )
}
