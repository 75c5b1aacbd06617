use serde::{Deserialize, Serialize};

wire_enum! {
    /// Aggregate level of the news-driven forecast
    SignalLevel {
        HighProbability => "HIGH_PROBABILITY",
        MediumProbability => "MEDIUM_PROBABILITY",
        NegativeSignal => "NEGATIVE_SIGNAL",
        Low => "LOW",
    }
}

impl Default for SignalLevel {
    fn default() -> Self {
        SignalLevel::Low
    }
}

wire_enum! {
    /// Classification of a single news item
    NewsCategory {
        HighProbability => "HIGH_PROBABILITY",
        MediumProbability => "MEDIUM_PROBABILITY",
        Negative => "NEGATIVE",
        Neutral => "NEUTRAL",
    }
}

impl Default for NewsCategory {
    fn default() -> Self {
        NewsCategory::Neutral
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastStats {
    pub total: u64,
    pub relevant: u64,
    pub avg_score: f64,
    #[serde(rename = "HIGH_PROBABILITY")]
    pub high_probability: u64,
    #[serde(rename = "MEDIUM_PROBABILITY")]
    pub medium_probability: u64,
    #[serde(rename = "NEGATIVE")]
    pub negative: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub title: String,
    pub description: Option<String>,
    pub category: NewsCategory,
    pub score: f64,
    /// Each keyword carries a leading polarity marker, e.g. "+dividends"
    pub matched_keywords: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastResult {
    pub signal_level: SignalLevel,
    pub reason: String,
    pub stats: ForecastStats,
    pub top_items: Vec<NewsItem>,
    pub companies: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub signal_level: SignalLevel,
    pub stats: ForecastStats,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPage {
    pub items: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub news_sources: Vec<String>,
    pub use_vacancies: bool,
    /// Seconds
    pub cache_ttl: u64,
}
