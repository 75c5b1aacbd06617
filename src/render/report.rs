//! Report page: statistics cards, high-dividend table, full ticker table and
//! the signals-grouped view, plus the recommendations section.

use super::{escape, format_datetime, format_number, notice, page, recommendations, trend_indicator, Page};
use crate::models::{ActionFilter, Recommendation, Report, ReportSummary, SignalKind, SymbolSnapshot};
use crate::normalize::{signal_label, signal_title};
use crate::state::Notice;

/// Columns of the ticker table, ticker column included
pub const TICKER_COLUMNS: usize = 11;

/// Everything the report page shows, borrowed from view state
pub struct ReportPage<'a> {
    pub report: Option<&'a Report>,
    pub report_error: Option<&'a str>,
    pub summary: Option<&'a ReportSummary>,
    pub recommendations: Option<&'a [Recommendation]>,
    pub recommendations_error: Option<&'a str>,
    pub filter: &'a ActionFilter,
    pub search: &'a str,
    /// Run-now or refresh in flight; both triggers are disabled
    pub busy: bool,
    pub auto_refresh_secs: Option<u64>,
    pub notices: &'a [Notice],
}

pub fn render_page(view: &ReportPage<'_>) -> String {
    let body = format!(
        r#"
        <div class="d-flex justify-content-between align-items-center mb-3">
            <h2>📊 Daily report</h2>
            <div>
                <form method="post" action="/report/refresh" class="d-inline">
                    <button type="submit" class="btn btn-outline-secondary"{refresh_disabled}>🔄 Refresh</button>
                </form>
                <form method="post" action="/report/run-now" class="d-inline">
                    <button type="submit" class="btn btn-primary"{run_disabled}>{run_label}</button>
                </form>
            </div>
        </div>
        {error}
        {stats}
        <div class="card mb-4">
            <div class="card-header"><h5 class="mb-0">💵 High dividend tickers</h5></div>
            <div class="card-body table-responsive">
                <table class="table table-hover align-middle">
                    <thead><tr><th>Ticker</th><th>Price</th><th>Dividends TTM</th><th>DY</th><th>SMA200</th><th>Trend</th><th>Signals</th></tr></thead>
                    <tbody>{high_dividend}</tbody>
                </table>
            </div>
        </div>
        <div class="card mb-4">
            <div class="card-header d-flex justify-content-between align-items-center">
                <h5 class="mb-0">📋 All tickers</h5>
                <form method="get" action="/" class="d-flex">
                    <input type="hidden" name="filter" value="{filter}">
                    <input type="search" name="q" class="form-control form-control-sm me-2" placeholder="Search ticker" value="{search}">
                    <button type="submit" class="btn btn-sm btn-outline-primary">🔍</button>
                </form>
            </div>
            <div class="card-body table-responsive">
                <table class="table table-hover align-middle">
                    <thead><tr><th>Ticker</th><th>Price</th><th>Trend</th><th>Lot</th><th>DY</th><th>SMA20</th><th>SMA50</th><th>SMA200</th><th>52w low</th><th>52w high</th><th>Signals</th></tr></thead>
                    <tbody>{tickers}</tbody>
                </table>
            </div>
        </div>
        <div class="card mb-4">
            <div class="card-header"><h5 class="mb-0">🚦 Signals</h5></div>
            <div class="card-body"><div class="row">{signals}</div></div>
        </div>
        {recommendations}"#,
        refresh_disabled = disabled_attr(view.busy),
        run_disabled = disabled_attr(view.busy),
        run_label = if view.busy { "⏳ Running..." } else { "▶️ Run now" },
        error = view.report_error.map(error_alert).unwrap_or_default(),
        stats = statistics(view.summary, view.report),
        high_dividend = high_dividend_rows(view.summary, view.report),
        filter = escape(view.filter.as_str()),
        search = escape(view.search),
        tickers = view
            .report
            .map(|r| ticker_rows(r, view.search))
            .unwrap_or_else(|| placeholder_row(TICKER_COLUMNS, "No report yet. Run report generation.")),
        signals = view
            .report
            .map(signal_groups)
            .unwrap_or_else(|| placeholder_block("No report yet")),
        recommendations = recommendations::section(
            view.recommendations,
            view.recommendations_error,
            view.filter,
        ),
    );

    page(
        Page::Report,
        view.auto_refresh_secs,
        &notice::banners(Page::Report, view.notices),
        &body,
    )
}

pub(crate) fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

pub(crate) fn error_alert(message: &str) -> String {
    format!(r#"<div class="alert alert-warning">⚠️ {}</div>"#, escape(message))
}

pub(crate) fn placeholder_row(columns: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{}" class="text-center text-muted">{}</td></tr>"#,
        columns,
        escape(message)
    )
}

pub(crate) fn placeholder_block(message: &str) -> String {
    format!(r#"<div class="col-12 text-center text-muted py-3">{}</div>"#, escape(message))
}

fn stat_card(value: &str, label: &str, tone: &str) -> String {
    format!(
        r#"
            <div class="col-6 col-md">
                <div class="card stat-card text-center"><div class="card-body">
                    <div class="stat-value text-{tone}">{value}</div>
                    <div class="stat-label">{label}</div>
                </div></div>
            </div>"#,
        tone = tone,
        value = value,
        label = label,
    )
}

/// Summary counters; report timestamp wins over the summary's when both exist
pub fn statistics(summary: Option<&ReportSummary>, report: Option<&Report>) -> String {
    let count = |f: fn(&ReportSummary) -> u64| {
        summary
            .map(|s| f(s).to_string())
            .unwrap_or_else(|| "—".to_string())
    };
    let updated = report
        .and_then(|r| r.generated_at.as_deref())
        .or_else(|| summary.and_then(|s| s.generated_at.as_deref()));

    format!(
        r#"<div class="row g-3 mb-4">{}{}{}{}{}</div>"#,
        stat_card(&count(|s| s.total_symbols), "Total tickers", "primary"),
        stat_card(&count(|s| s.successful), "Successful", "success"),
        stat_card(&count(|s| s.failed), "Failed", "danger"),
        stat_card(&count(|s| s.total_signals), "Signals", "warning"),
        stat_card(&format_datetime(updated), "Last update", "secondary"),
    )
}

pub fn signal_badges(signals: &[SignalKind]) -> String {
    if signals.is_empty() {
        return r#"<span class="text-muted">—</span>"#.to_string();
    }
    signals
        .iter()
        .map(|s| {
            let label = signal_label(s);
            format!(
                r#"<span class="badge bg-{} signal-badge">{}</span>"#,
                label.tone.as_str(),
                escape(&label.text)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary tickers that exist in the report, in summary order
pub fn high_dividend_rows(summary: Option<&ReportSummary>, report: Option<&Report>) -> String {
    let (Some(summary), Some(report)) = (summary, report) else {
        return placeholder_row(7, "No high dividend tickers");
    };

    let rows: Vec<String> = summary
        .high_dividend_tickers
        .iter()
        .filter_map(|t| report.snapshot(&t.symbol).map(|snap| (t, snap)))
        .map(|(ticker, snap)| {
            format!(
                r#"<tr class="fade-in"><td><strong>{symbol}</strong></td><td>{price} ₽</td><td>{div} ₽</td><td><span class="badge bg-success">{dy}%</span></td><td>{sma200}</td><td>{trend}</td><td>{signals}</td></tr>"#,
                symbol = escape(&ticker.symbol),
                price = format_number(snap.price, 2),
                div = format_number(snap.div_ttm, 2),
                dy = format_number(Some(ticker.dy_pct), 2),
                sma200 = format_number(snap.sma_200, 2),
                trend = trend_indicator(snap.price, snap.sma_200),
                signals = signal_badges(&snap.signals),
            )
        })
        .collect();

    if rows.is_empty() {
        placeholder_row(7, "No high dividend tickers")
    } else {
        rows.join("\n")
    }
}

/// Case-insensitive substring match on the symbol; empty search matches all
pub fn matches_search(symbol: &str, search: &str) -> bool {
    let needle = search.trim();
    needle.is_empty() || symbol.to_lowercase().contains(&needle.to_lowercase())
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        r#" style="display:none""#
    }
}

fn error_row(symbol: &str, message: &str, visible: bool) -> String {
    format!(
        r#"<tr class="table-danger fade-in" data-symbol="{symbol}"{hidden}><td><strong>{symbol}</strong></td><td colspan="{span}" class="text-danger">❌ {message}</td></tr>"#,
        symbol = escape(symbol),
        hidden = hidden_attr(visible),
        span = TICKER_COLUMNS - 1,
        message = escape(message),
    )
}

fn snapshot_row(symbol: &str, snap: &SymbolSnapshot, visible: bool) -> String {
    let dy = match snap.dy_pct {
        Some(dy) if dy != 0.0 => format!("{}%", format_number(Some(dy), 2)),
        _ => "N/A".to_string(),
    };
    format!(
        r#"<tr class="fade-in" data-symbol="{symbol}"{hidden}><td><strong>{symbol}</strong></td><td>{price}</td><td>{trend}</td><td>{lot}</td><td>{dy}</td><td>{sma20}</td><td>{sma50}</td><td>{sma200}</td><td>{low}</td><td>{high}</td><td>{signals}</td></tr>"#,
        symbol = escape(symbol),
        hidden = hidden_attr(visible),
        price = format_number(snap.price, 2),
        trend = trend_indicator(snap.price, snap.sma_200),
        lot = snap
            .lot
            .filter(|lot| *lot != 0)
            .map(|lot| lot.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        dy = dy,
        sma20 = format_number(snap.sma_20, 2),
        sma50 = format_number(snap.sma_50, 2),
        sma200 = format_number(snap.sma_200, 2),
        low = format_number(snap.low_52w, 2),
        high = format_number(snap.high_52w, 2),
        signals = signal_badges(&snap.signals),
    )
}

/// One row per universe symbol in backend order. Rows outside the search
/// are hidden, not removed.
pub fn ticker_rows(report: &Report, search: &str) -> String {
    if report.universe.is_empty() {
        return placeholder_row(TICKER_COLUMNS, "No tickers in report");
    }

    report
        .rows()
        .map(|(symbol, snapshot)| {
            let visible = matches_search(symbol, search);
            match snapshot {
                None => error_row(symbol, "no data", visible),
                Some(snap) => match snap.error() {
                    Some(message) => error_row(symbol, message, visible),
                    None => snapshot_row(symbol, snap, visible),
                },
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn signal_groups(report: &Report) -> String {
    let groups = report.signal_groups();
    if groups.is_empty() {
        return placeholder_block("No active signals");
    }

    groups
        .iter()
        .map(|(kind, members)| {
            let title = signal_title(kind);
            let items: String = members
                .iter()
                .map(|(symbol, snap)| {
                    format!(
                        r#"<li class="list-group-item d-flex justify-content-between"><strong>{}</strong><span>{} ₽</span></li>"#,
                        escape(symbol),
                        format_number(snap.price, 2)
                    )
                })
                .collect();
            format!(
                r#"
                <div class="col-md-4 mb-3">
                    <div class="card signal-card border-{tone}">
                        <div class="card-header bg-{tone} bg-opacity-10 d-flex justify-content-between">
                            <strong>{title}</strong><span class="badge bg-{tone}">{count}</span>
                        </div>
                        <ul class="list-group list-group-flush">{items}</ul>
                    </div>
                </div>"#,
                tone = title.tone.as_str(),
                title = escape(&title.text),
                count = members.len(),
                items = items,
            )
        })
        .collect()
}
