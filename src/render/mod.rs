//! Dashboard HTML rendering
//!
//! Pure functions from normalized data plus view state to markup. Output
//! depends only on the arguments (no clock reads, no map iteration order),
//! so rendering the same input twice yields identical bytes. Every
//! externally sourced string goes through [`escape`].
//!
//! # Layout
//! - `css.rs`: page styles
//! - `notice.rs`: notification banners
//! - `report.rs`: statistics, report table, signal groups
//! - `recommendations.rs`: counters, filter buttons, cards
//! - `forecast.rs`: signal panel, news, history timeline
//! - `settings.rs`: portfolio, parameters, scheduler, tickers

mod css;
pub mod forecast;
pub mod notice;
pub mod recommendations;
pub mod report;
pub mod settings;

use chrono::{DateTime, NaiveDateTime};

/// Top-level pages served by the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Report,
    Forecast,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Report, Page::Forecast, Page::Settings];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Report => "/",
            Page::Forecast => "/forecast",
            Page::Settings => "/settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Report => "📊 Report",
            Page::Forecast => "🔮 Event Forecast",
            Page::Settings => "⚙️ Settings",
        }
    }

    /// Key used in notice dismissal routes
    pub fn key(&self) -> &'static str {
        match self {
            Page::Report => "report",
            Page::Forecast => "forecast",
            Page::Settings => "settings",
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fixed-point number, "N/A" when missing or not finite
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => "N/A".to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// "dd.mm.yyyy, HH:MM:SS" in the timestamp's own offset; unparsable input
/// is shown as-is (escaped), missing input as "N/A".
pub fn format_datetime(raw: Option<&str>) -> String {
    match raw.filter(|r| !r.trim().is_empty()) {
        None => "N/A".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%d.%m.%Y, %H:%M:%S").to_string(),
            None => escape(raw),
        },
    }
}

/// "dd.mm, HH:MM" for timeline entries
pub fn format_short_datetime(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m, %H:%M").to_string(),
        None => escape(raw),
    }
}

/// Distance of price from SMA200: up "+x.x%" above, down "-x.x%" otherwise
pub fn trend_indicator(price: Option<f64>, sma_200: Option<f64>) -> String {
    match (price, sma_200) {
        (Some(price), Some(sma)) if price != 0.0 && sma != 0.0 && price.is_finite() && sma.is_finite() => {
            if price > sma {
                format!(r#"<span class="trend-up">↗ +{:.1}%</span>"#, (price / sma - 1.0) * 100.0)
            } else {
                format!(r#"<span class="trend-down">↘ -{:.1}%</span>"#, (1.0 - price / sma) * 100.0)
            }
        }
        _ => r#"<span class="trend-neutral">—</span>"#.to_string(),
    }
}

/// Full HTML document with navigation, notice banners and page body.
/// `auto_refresh_secs` reloads the page in step with the view's poller.
pub fn page(active: Page, auto_refresh_secs: Option<u64>, notices: &str, body: &str) -> String {
    let refresh = auto_refresh_secs
        .map(|secs| format!(r#"    <meta http-equiv="refresh" content="{}">"#, secs))
        .unwrap_or_default();

    let nav = Page::ALL
        .iter()
        .map(|p| {
            let class = if *p == active { "nav-link active" } else { "nav-link" };
            format!(r#"<li class="nav-item"><a class="{}" href="{}">{}</a></li>"#, class, p.path(), p.title())
        })
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
{refresh}
    <title>Stock Analytics — {title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
    <style>
{css}
    </style>
</head>
<body>
    <nav class="navbar navbar-expand navbar-dark bg-dark mb-3">
        <div class="container-fluid">
            <span class="navbar-brand">📈 Stock Analytics</span>
            <ul class="navbar-nav">{nav}</ul>
        </div>
    </nav>
    <div class="container-fluid">
        <div id="notices">{notices}</div>
{body}
    </div>
</body>
</html>"#,
        refresh = refresh,
        title = active.title(),
        css = css::STYLES,
        nav = nav,
        notices = notices,
        body = body,
    )
}
