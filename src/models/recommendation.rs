use serde::{Deserialize, Serialize};

wire_enum! {
    Action {
        Buy => "BUY",
        Hold => "HOLD",
        Sell => "SELL",
    }
}

wire_enum! {
    Confidence {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Medium
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub action: Action,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub dy_pct: Option<f64>,
    #[serde(default)]
    pub sizing_hint: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    #[serde(default)]
    pub items: Vec<Recommendation>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Per-action totals over the full, unfiltered list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionCounts {
    pub buy: usize,
    pub hold: usize,
    pub sell: usize,
}

impl ActionCounts {
    pub fn tally(recommendations: &[Recommendation]) -> Self {
        let count = |action: Action| recommendations.iter().filter(|r| r.action == action).count();
        Self {
            buy: count(Action::Buy),
            hold: count(Action::Hold),
            sell: count(Action::Sell),
        }
    }
}

/// Visibility filter of the recommendations list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionFilter {
    #[default]
    All,
    Only(Action),
}

impl ActionFilter {
    /// "all" (any case) or empty selects everything; anything else filters by action
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            ActionFilter::All
        } else {
            ActionFilter::Only(Action::from(raw.to_ascii_uppercase()))
        }
    }

    pub fn matches(&self, action: &Action) -> bool {
        match self {
            ActionFilter::All => true,
            ActionFilter::Only(wanted) => wanted == action,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionFilter::All => "all",
            ActionFilter::Only(action) => action.as_str(),
        }
    }
}
