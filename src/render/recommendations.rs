use super::report::{error_alert, placeholder_block};
use super::{escape, format_number};
use crate::models::{Action, ActionCounts, ActionFilter, Recommendation};
use crate::normalize::{action_label, confidence_stars};

const FILTERS: [(&str, &str, &str); 4] = [
    ("all", "All", "primary"),
    ("BUY", "🟢 BUY", "success"),
    ("HOLD", "⚪ HOLD", "secondary"),
    ("SELL", "🔴 SELL", "danger"),
];

/// Totals over the full list, independent of the filter
pub fn counts(counts: &ActionCounts) -> String {
    format!(
        r#"<div class="d-flex gap-3 mb-3">
                <span class="badge bg-success fs-6" id="buy-count">BUY: {}</span>
                <span class="badge bg-secondary fs-6" id="hold-count">HOLD: {}</span>
                <span class="badge bg-danger fs-6" id="sell-count">SELL: {}</span>
            </div>"#,
        counts.buy, counts.hold, counts.sell
    )
}

pub fn filter_buttons(active: &ActionFilter) -> String {
    let buttons: String = FILTERS
        .iter()
        .map(|(value, label, tone)| {
            let style = if active.as_str() == *value { format!("btn-{}", tone) } else { format!("btn-outline-{}", tone) };
            format!(
                r#"<a class="btn btn-sm {} me-1" href="/?filter={}">{}</a>"#,
                style, value, label
            )
        })
        .collect();
    format!(r#"<div class="btn-group mb-3" role="group">{}</div>"#, buttons)
}

fn score_class(score: f64) -> &'static str {
    if score > 0.0 {
        "text-success"
    } else {
        "text-danger"
    }
}

pub fn card(reco: &Recommendation, visible: bool) -> String {
    let action = action_label(&reco.action);
    let border = match reco.action {
        Action::Buy => "success",
        Action::Sell => "danger",
        _ => "secondary",
    };
    let reasons = if reco.reasons.is_empty() {
        r#"<li class="text-muted">No reasons given</li>"#.to_string()
    } else {
        reco.reasons
            .iter()
            .map(|r| format!("<li>{}</li>", escape(r)))
            .collect()
    };
    let dy = reco
        .dy_pct
        .map(|dy| format!(r#"<div><small class="text-muted">DY:</small> {}%</div>"#, format_number(Some(dy), 1)))
        .unwrap_or_default();
    let sizing = reco
        .sizing_hint
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!(r#"<div class="mt-2"><small class="text-muted">💼 {}</small></div>"#, escape(s)))
        .unwrap_or_default();

    format!(
        r#"
            <div class="col-12 col-md-6 col-lg-4 mb-3 reco-card" data-symbol="{symbol}" data-action="{action_raw}"{hidden}>
                <div class="card h-100 border-{border}">
                    <div class="card-header d-flex justify-content-between align-items-center">
                        <strong>{symbol}</strong>
                        <span class="badge bg-{tone}">{action}</span>
                    </div>
                    <div class="card-body">
                        <div><small class="text-muted">Price:</small> {price} ₽</div>
                        <div><small class="text-muted">Confidence:</small> {stars}</div>
                        <div><small class="text-muted">Score:</small> <span class="{score_class}">{score}</span></div>
                        {dy}
                        <ul class="small mt-2 mb-0">{reasons}</ul>
                        {sizing}
                    </div>
                </div>
            </div>"#,
        symbol = escape(&reco.symbol),
        action_raw = escape(reco.action.as_str()),
        hidden = if visible { "" } else { r#" style="display:none""# },
        border = border,
        tone = action.tone.as_str(),
        action = escape(&action.text),
        price = format_number(reco.price, 2),
        stars = confidence_stars(&reco.confidence),
        score_class = score_class(reco.score),
        score = format_number(Some(reco.score), 2),
        dy = dy,
        reasons = reasons,
        sizing = sizing,
    )
}

/// Every card is rendered; the filter only toggles visibility
pub fn list(recommendations: &[Recommendation], filter: &ActionFilter) -> String {
    if recommendations.is_empty() {
        return placeholder_block("No recommendations");
    }
    recommendations
        .iter()
        .map(|r| card(r, filter.matches(&r.action)))
        .collect()
}

pub fn section(
    recommendations: Option<&[Recommendation]>,
    error: Option<&str>,
    filter: &ActionFilter,
) -> String {
    let items = recommendations.unwrap_or(&[]);
    format!(
        r#"
        <div class="card mb-4">
            <div class="card-header"><h5 class="mb-0">💡 Recommendations</h5></div>
            <div class="card-body">
                {error}
                {counts}
                {filters}
                <div class="row">{cards}</div>
            </div>
        </div>"#,
        error = error.map(error_alert).unwrap_or_default(),
        counts = counts(&ActionCounts::tally(items)),
        filters = filter_buttons(filter),
        cards = list(items, filter),
    )
}
