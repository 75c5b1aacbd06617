use serde::{Deserialize, Serialize};

use crate::constants::settings::{DEFAULT_CURRENCY, DEFAULT_MARKET};
use crate::normalize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    #[default]
    Stock,
    Bond,
    Etf,
    Fund,
    Currency,
}

impl PositionKind {
    pub const ALL: [PositionKind; 5] = [
        PositionKind::Stock,
        PositionKind::Bond,
        PositionKind::Etf,
        PositionKind::Fund,
        PositionKind::Currency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionKind::Stock => "stock",
            PositionKind::Bond => "bond",
            PositionKind::Etf => "etf",
            PositionKind::Fund => "fund",
            PositionKind::Currency => "currency",
        }
    }

    /// Unrecognized input falls back to `Stock`
    pub fn parse(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .unwrap_or_default()
    }
}

/// Position as it travels on the wire. Older portfolios use `quantity` and
/// `name`, newer ones `qty` and `notes`; any combination may be present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub qty: Option<u64>,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<PositionKind>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
}

/// Canonical position. Serializes through [`PositionRecord`] with both
/// legacy key pairs populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PositionRecord", into = "PositionRecord")]
pub struct Position {
    pub symbol: String,
    pub quantity: u64,
    pub avg_price: Option<f64>,
    pub market: String,
    pub kind: PositionKind,
    pub notes: String,
    pub current_value: Option<f64>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            quantity: 0,
            avg_price: None,
            market: DEFAULT_MARKET.to_string(),
            kind: PositionKind::Stock,
            notes: String::new(),
            current_value: None,
        }
    }
}

impl From<PositionRecord> for Position {
    fn from(record: PositionRecord) -> Self {
        normalize::position_from_record(record)
    }
}

impl From<Position> for PositionRecord {
    fn from(position: Position) -> Self {
        normalize::position_to_record(&position)
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            name: None,
            currency: default_currency(),
            cash: 0.0,
            positions: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Portfolio {
    /// Copy suitable for submission: positions without a symbol are dropped
    pub fn for_submission(&self) -> Portfolio {
        let mut portfolio = self.clone();
        portfolio.positions.retain(|p| !p.symbol.trim().is_empty());
        for position in &mut portfolio.positions {
            position.symbol = position.symbol.trim().to_string();
        }
        portfolio
    }
}
