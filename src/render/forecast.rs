//! Event-forecast page: signal panel, top news, history timeline,
//! predictor configuration and ticker suggestions.

use super::report::{disabled_attr, error_alert};
use super::{escape, format_number, format_short_datetime, notice, page, Page};
use crate::constants::forecast::{DESCRIPTION_PREVIEW_CHARS, MAX_KEYWORDS, TICKER_SUGGESTIONS};
use crate::models::{ForecastResult, ForecastStats, HistoryEntry, NewsItem, PredictorConfig};
use crate::normalize::{
    category_class, category_label, history_label, history_marker_class, parse_keyword,
    signal_level_icon, signal_level_label,
};
use crate::state::Notice;

pub struct ForecastPage<'a> {
    /// Tickers of the displayed forecast; empty means the backend default set
    pub tickers: &'a [String],
    pub forecast: Option<&'a ForecastResult>,
    pub forecast_error: Option<&'a str>,
    pub loading: bool,
    pub history: Option<&'a [HistoryEntry]>,
    pub history_error: Option<&'a str>,
    pub config: Option<&'a PredictorConfig>,
    pub refresh_busy: bool,
    pub auto_refresh_secs: Option<u64>,
    pub notices: &'a [Notice],
}

pub fn render_page(view: &ForecastPage<'_>) -> String {
    let body = format!(
        r#"
        <div class="d-flex justify-content-between align-items-center mb-3">
            <h2>🔮 Event forecast</h2>
            <form method="post" action="/forecast/refresh">
                <button type="submit" class="btn btn-outline-primary"{refresh_disabled}>{refresh_label}</button>
            </form>
        </div>
        <div class="row">
            <div class="col-lg-8">
                <div class="card mb-3">
                    <div class="card-body">
                        <form method="post" action="/forecast/analyze" class="d-flex mb-2">
                            <input type="text" name="tickers" class="form-control me-2" placeholder="SBER, GAZP, LKOH" value="{tickers}">
                            <button type="submit" class="btn btn-primary">🔍 Analyze</button>
                        </form>
                        {suggestions}
                    </div>
                </div>
                {error}
                {signal}
                <div class="card mb-3">
                    <div class="card-header d-flex justify-content-between">
                        <h5 class="mb-0">📰 Top news</h5>
                        <span class="badge bg-secondary">{news_count}</span>
                    </div>
                    <div class="card-body">{news}</div>
                </div>
            </div>
            <div class="col-lg-4">
                <div class="card mb-3">
                    <div class="card-header"><h5 class="mb-0">🕒 History</h5></div>
                    <div class="card-body">{history_error}{history}</div>
                </div>
                <div class="card mb-3">
                    <div class="card-header"><h5 class="mb-0">⚙️ Predictor</h5></div>
                    <div class="card-body">{config}</div>
                </div>
            </div>
        </div>"#,
        refresh_disabled = disabled_attr(view.refresh_busy),
        refresh_label = if view.refresh_busy { "⏳ Refreshing..." } else { "🔄 Refresh" },
        tickers = escape(&view.tickers.join(", ")),
        suggestions = ticker_suggestions(),
        error = view.forecast_error.map(error_alert).unwrap_or_default(),
        signal = signal_panel(view.forecast, view.loading),
        news_count = view.forecast.map_or(0, |f| f.top_items.len()),
        news = top_news(view.forecast.map(|f| f.top_items.as_slice()).unwrap_or(&[])),
        history_error = view.history_error.map(error_alert).unwrap_or_default(),
        history = history_timeline(view.history.unwrap_or(&[])),
        config = predictor_config(view.config),
    );

    page(
        Page::Forecast,
        view.auto_refresh_secs,
        &notice::banners(Page::Forecast, view.notices),
        &body,
    )
}

/// Quick-analyze buttons, one per suggestion group
pub fn ticker_suggestions() -> String {
    let buttons: String = TICKER_SUGGESTIONS
        .iter()
        .enumerate()
        .map(|(i, group)| {
            format!(
                r#"<form method="post" action="/forecast/quick/{}" class="d-inline"><button type="submit" class="btn btn-sm btn-outline-secondary me-1">{}</button></form>"#,
                i,
                group.join(", ")
            )
        })
        .collect();
    format!(r#"<div><small class="text-muted me-2">Quick:</small>{}</div>"#, buttons)
}

pub fn signal_panel(forecast: Option<&ForecastResult>, loading: bool) -> String {
    let Some(forecast) = forecast else {
        let message = if loading { "⏳ Analyzing news..." } else { "No forecast yet" };
        return format!(r#"<div class="card mb-3"><div class="card-body text-center text-muted">{}</div></div>"#, message);
    };

    let label = signal_level_label(&forecast.signal_level);
    let companies = if forecast.companies.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="mt-2"><small class="text-muted">Companies: {}</small></div>"#,
            escape(&forecast.companies.join(", "))
        )
    };

    format!(
        r#"
                <div class="card mb-3 signal-level-card signal-{level}">
                    <div class="card-body d-flex align-items-center">
                        <div class="main-signal-icon me-3">{icon}</div>
                        <div class="flex-grow-1">
                            <h4 class="text-{tone}">{label}</h4>
                            <p class="mb-0">{reason}</p>
                            {companies}
                        </div>
                    </div>
                    <div class="card-footer">{stats}</div>
                </div>"#,
        level = escape(forecast.signal_level.as_str()),
        icon = signal_level_icon(&forecast.signal_level),
        tone = label.tone.as_str(),
        label = escape(&label.text),
        reason = escape(&forecast.reason),
        companies = companies,
        stats = stats_panel(&forecast.stats),
    )
}

pub fn stats_panel(stats: &ForecastStats) -> String {
    format!(
        r#"<div class="row text-center small">
                        <div class="col">📰 Total<br><strong>{}</strong></div>
                        <div class="col">🎯 Relevant<br><strong>{}</strong></div>
                        <div class="col">📈 Avg score<br><strong>{}</strong></div>
                        <div class="col text-success">🚀 High<br><strong>{}</strong></div>
                        <div class="col text-warning">📊 Medium<br><strong>{}</strong></div>
                        <div class="col text-danger">⚠️ Negative<br><strong>{}</strong></div>
                    </div>"#,
        stats.total,
        stats.relevant,
        format_number(Some(stats.avg_score), 2),
        stats.high_probability,
        stats.medium_probability,
        stats.negative,
    )
}

/// First `DESCRIPTION_PREVIEW_CHARS` characters, "..." when cut
pub fn description_preview(description: &str) -> String {
    let mut chars = description.chars();
    let preview: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

pub fn keyword_badges(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(|raw| {
            let keyword = parse_keyword(raw);
            format!(
                r#"<span class="badge bg-{} keyword-badge">{}</span>"#,
                keyword.polarity.tone().as_str(),
                escape(keyword.text)
            )
        })
        .collect()
}

pub fn news_item(index: usize, item: &NewsItem) -> String {
    let category = category_label(&item.category);
    let description = item
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(r#"<p class="small text-muted mb-1">{}</p>"#, escape(&description_preview(d))))
        .unwrap_or_default();
    let score_class = if item.score > 0.0 { "text-success" } else { "text-danger" };

    format!(
        r#"
                        <div class="news-item {class}">
                            <div class="d-flex justify-content-between">
                                <strong>{n}. {title}</strong>
                                <span class="badge bg-{tone}">{category}</span>
                            </div>
                            {description}
                            <div class="d-flex justify-content-between align-items-center">
                                <div>{keywords}</div>
                                <small class="{score_class}">Score: {score}</small>
                            </div>
                        </div>"#,
        class = category_class(&item.category),
        n = index + 1,
        title = escape(&item.title),
        tone = category.tone.as_str(),
        category = escape(&category.text),
        description = description,
        keywords = keyword_badges(&item.matched_keywords),
        score_class = score_class,
        score = format_number(Some(item.score), 2),
    )
}

pub fn top_news(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return r#"<p class="text-center text-muted mb-0">No relevant news</p>"#.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| news_item(i, item))
        .collect()
}

/// Entries in the order the backend returned them
pub fn history_timeline(items: &[HistoryEntry]) -> String {
    if items.is_empty() {
        return r#"<p class="text-center text-muted mb-0">No history yet</p>"#.to_string();
    }
    items
        .iter()
        .map(|entry| {
            format!(
                r#"
                        <div class="timeline-item">
                            <div class="timeline-marker {marker}"></div>
                            <div class="card card-body py-2">
                                <div class="d-flex justify-content-between">
                                    <strong>{label}</strong>
                                    <small class="text-muted">{time}</small>
                                </div>
                                <small class="text-muted">News: {total} · Relevant: {relevant}</small>
                            </div>
                        </div>"#,
                marker = history_marker_class(&entry.signal_level),
                label = escape(&history_label(&entry.signal_level)),
                time = format_short_datetime(&entry.timestamp),
                total = entry.stats.total,
                relevant = entry.stats.relevant,
            )
        })
        .collect()
}

pub fn predictor_config(config: Option<&PredictorConfig>) -> String {
    let Some(config) = config else {
        return r#"<p class="text-muted mb-0">Configuration unavailable</p>"#.to_string();
    };
    let sources = if config.news_sources.is_empty() {
        "—".to_string()
    } else {
        escape(&config.news_sources.join(", "))
    };
    format!(
        r#"<div class="small">
                        <div><strong>News sources:</strong> {}</div>
                        <div><strong>Vacancies:</strong> {}</div>
                        <div><strong>Cache TTL:</strong> {} s</div>
                    </div>"#,
        sources,
        if config.use_vacancies { "✅ on" } else { "❌ off" },
        config.cache_ttl,
    )
}
