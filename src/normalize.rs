//! Pure payload normalization: legacy field aliasing, display label lookup,
//! keyword polarity and form input parsing. Nothing here performs I/O.

use std::borrow::Cow;

use crate::constants::settings::DEFAULT_MARKET;
use crate::error::ValidationError;
use crate::models::{
    Action, Confidence, NewsCategory, Position, PositionRecord, SignalKind, SignalLevel,
};

// ============= Position aliasing =============

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Collapse the `qty`/`quantity` and `notes`/`name` aliases into one
/// canonical position. `qty` wins when both quantities are present.
pub fn position_from_record(record: PositionRecord) -> Position {
    let quantity = record.qty.or(record.quantity).unwrap_or(0);
    let notes = non_empty(record.notes)
        .or_else(|| non_empty(record.name))
        .unwrap_or_default();

    Position {
        symbol: record.symbol,
        quantity,
        avg_price: record.avg_price,
        market: non_empty(record.market).unwrap_or_else(|| DEFAULT_MARKET.to_string()),
        kind: record.kind.unwrap_or_default(),
        notes,
        current_value: record.current_value,
    }
}

/// Wire form of a position with both legacy key pairs written identically
pub fn position_to_record(position: &Position) -> PositionRecord {
    PositionRecord {
        symbol: position.symbol.clone(),
        qty: Some(position.quantity),
        quantity: Some(position.quantity),
        avg_price: Some(position.avg_price.unwrap_or(0.0)),
        market: Some(position.market.clone()),
        kind: Some(position.kind),
        notes: Some(position.notes.clone()),
        name: Some(position.notes.clone()),
        current_value: position.current_value,
    }
}

// ============= Display labels =============

/// Severity/color tag shared by badges, cards and text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Warning,
    Primary,
    Info,
    Secondary,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Danger => "danger",
            Tone::Warning => "warning",
            Tone::Primary => "primary",
            Tone::Info => "info",
            Tone::Secondary => "secondary",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label<'a> {
    pub text: Cow<'a, str>,
    pub tone: Tone,
}

impl<'a> Label<'a> {
    fn known(text: &'static str, tone: Tone) -> Self {
        Self { text: Cow::Borrowed(text), tone }
    }

    fn fallback(raw: &'a str) -> Self {
        Self { text: Cow::Borrowed(raw), tone: Tone::Secondary }
    }
}

/// Short badge label of a signal
pub fn signal_label(kind: &SignalKind) -> Label<'_> {
    match kind {
        SignalKind::PriceAboveSma200 => Label::known("↗ Above SMA200", Tone::Success),
        SignalKind::PriceBelowSma200 => Label::known("↘ Below SMA200", Tone::Danger),
        SignalKind::Sma50CrossUpSma200 => Label::known("⭐ Golden cross", Tone::Success),
        SignalKind::Sma50CrossDownSma200 => Label::known("💀 Death cross", Tone::Danger),
        SignalKind::DyGtTarget => Label::known("💵 High DY", Tone::Primary),
        SignalKind::VolSpike => Label::known("📈 Volume spike", Tone::Warning),
        SignalKind::Near52wLow => Label::known("⤓ Near 52w low", Tone::Info),
        SignalKind::Near52wHigh => Label::known("⤒ Near 52w high", Tone::Info),
        SignalKind::Unknown(raw) => Label::fallback(raw),
    }
}

/// Group heading of a signal in the grouped view
pub fn signal_title(kind: &SignalKind) -> Label<'_> {
    match kind {
        SignalKind::DyGtTarget => Label::known("💵 High dividend yield", Tone::Primary),
        other => signal_label(other),
    }
}

pub fn signal_level_label(level: &SignalLevel) -> Label<'_> {
    match level {
        SignalLevel::HighProbability => Label::known("High probability", Tone::Success),
        SignalLevel::MediumProbability => Label::known("Medium probability", Tone::Warning),
        SignalLevel::NegativeSignal => Label::known("Negative signal", Tone::Danger),
        SignalLevel::Low => Label::known("Low signal", Tone::Secondary),
        SignalLevel::Unknown(raw) => Label::fallback(raw),
    }
}

pub fn signal_level_icon(level: &SignalLevel) -> &'static str {
    match level {
        SignalLevel::HighProbability => "🚀",
        SignalLevel::MediumProbability => "📊",
        SignalLevel::NegativeSignal => "⚠️",
        SignalLevel::Low => "😐",
        SignalLevel::Unknown(_) => "🔮",
    }
}

/// Compact label used on the history timeline
pub fn history_label(level: &SignalLevel) -> Cow<'_, str> {
    match level {
        SignalLevel::HighProbability => Cow::Borrowed("🚀 High"),
        SignalLevel::MediumProbability => Cow::Borrowed("📊 Medium"),
        SignalLevel::NegativeSignal => Cow::Borrowed("⚠️ Negative"),
        SignalLevel::Low => Cow::Borrowed("😐 Low"),
        SignalLevel::Unknown(raw) => Cow::Borrowed(raw.as_str()),
    }
}

pub fn history_marker_class(level: &SignalLevel) -> &'static str {
    match level {
        SignalLevel::HighProbability => "high",
        SignalLevel::MediumProbability => "medium",
        SignalLevel::NegativeSignal => "negative",
        SignalLevel::Low | SignalLevel::Unknown(_) => "low",
    }
}

pub fn category_label(category: &NewsCategory) -> Label<'_> {
    match category {
        NewsCategory::HighProbability => Label::known("HIGH_PROBABILITY", Tone::Success),
        NewsCategory::MediumProbability => Label::known("MEDIUM_PROBABILITY", Tone::Warning),
        NewsCategory::Negative => Label::known("NEGATIVE", Tone::Danger),
        NewsCategory::Neutral => Label::known("NEUTRAL", Tone::Secondary),
        NewsCategory::Unknown(raw) => Label::fallback(raw),
    }
}

/// Row class of a news item: positive, negative or none
pub fn category_class(category: &NewsCategory) -> &'static str {
    match category {
        NewsCategory::HighProbability | NewsCategory::MediumProbability => "positive",
        NewsCategory::Negative => "negative",
        NewsCategory::Neutral | NewsCategory::Unknown(_) => "",
    }
}

pub fn action_label(action: &Action) -> Label<'_> {
    match action {
        Action::Buy => Label::known("🟢 BUY", Tone::Success),
        Action::Hold => Label::known("⚪ HOLD", Tone::Secondary),
        Action::Sell => Label::known("🔴 SELL", Tone::Danger),
        Action::Unknown(raw) => Label::fallback(raw),
    }
}

pub fn confidence_stars(confidence: &Confidence) -> &'static str {
    match confidence {
        Confidence::High => "⭐⭐⭐",
        Confidence::Medium => "⭐⭐",
        Confidence::Low | Confidence::Unknown(_) => "⭐",
    }
}

// ============= Keyword polarity =============

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn tone(&self) -> Tone {
        match self {
            Polarity::Positive => Tone::Success,
            Polarity::Negative => Tone::Danger,
            Polarity::Neutral => Tone::Secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keyword<'a> {
    pub polarity: Polarity,
    pub text: &'a str,
}

/// Split a `+word` / `-word` keyword into polarity and text. Input without a
/// recognized marker is kept whole with neutral polarity.
pub fn parse_keyword(raw: &str) -> Keyword<'_> {
    if let Some(text) = raw.strip_prefix('+') {
        Keyword { polarity: Polarity::Positive, text }
    } else if let Some(text) = raw.strip_prefix('-') {
        Keyword { polarity: Polarity::Negative, text }
    } else {
        Keyword { polarity: Polarity::Neutral, text: raw }
    }
}

// ============= Form input =============

/// Ticker symbol for `POST /config/add-ticker`. Surrounding whitespace is
/// trimmed; the rest must already be `[A-Z0-9]+`.
pub fn validate_ticker(input: &str) -> Result<String, ValidationError> {
    let symbol = input.trim();
    if symbol.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    if !symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(ValidationError::InvalidTicker { symbol: symbol.to_string() });
    }
    Ok(symbol.to_string())
}

/// Comma-separated ticker list: trimmed, uppercased, empties dropped
pub fn parse_ticker_list(input: &str) -> Result<Vec<String>, ValidationError> {
    let tickers: Vec<String> = input
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tickers.is_empty() {
        return Err(ValidationError::NoTickers);
    }
    Ok(tickers)
}

/// Float form field; unparsable or non-finite input yields 0
pub fn parse_number_or_zero(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Integer form field; unparsable or negative input yields 0
pub fn parse_count_or_zero(input: &str) -> u64 {
    let trimmed = input.trim();
    trimmed.parse::<u64>().unwrap_or_else(|_| {
        // "10.0" from number inputs
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.trunc() as u64)
            .unwrap_or(0)
    })
}

/// Comma-separated SMA windows; entries that are not integers are dropped
pub fn parse_sma_windows(input: &str) -> Vec<u32> {
    input
        .split(',')
        .filter_map(|s| s.trim().parse::<u32>().ok())
        .collect()
}
