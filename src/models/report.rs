use serde::{Deserialize, Serialize};
use std::collections::HashMap;

wire_enum! {
    /// Discrete condition computed by the backend for one symbol
    SignalKind {
        PriceAboveSma200 => "PRICE_ABOVE_SMA200",
        PriceBelowSma200 => "PRICE_BELOW_SMA200",
        Sma50CrossUpSma200 => "SMA50_CROSS_UP_SMA200",
        Sma50CrossDownSma200 => "SMA50_CROSS_DOWN_SMA200",
        DyGtTarget => "DY_GT_TARGET",
        VolSpike => "VOL_SPIKE",
        Near52wLow => "NEAR_52W_LOW",
        Near52wHigh => "NEAR_52W_HIGH",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolMeta {
    pub board: Option<String>,
    /// When set, every numeric field of the snapshot is invalid
    pub error: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSnapshot {
    pub price: Option<f64>,
    pub lot: Option<i64>,
    pub div_ttm: Option<f64>,
    pub dy_pct: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub low_52w: Option<f64>,
    pub high_52w: Option<f64>,
    pub dist_52w_low_pct: Option<f64>,
    pub dist_52w_high_pct: Option<f64>,
    pub signals: Vec<SignalKind>,
    pub meta: SymbolMeta,
}

impl SymbolSnapshot {
    pub fn error(&self) -> Option<&str> {
        self.meta.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// One analysis run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub universe: Vec<String>,
    #[serde(default)]
    pub by_symbol: HashMap<String, SymbolSnapshot>,
}

impl Report {
    pub fn snapshot(&self, symbol: &str) -> Option<&SymbolSnapshot> {
        self.by_symbol.get(symbol)
    }

    /// Universe symbols paired with their snapshots, in backend order
    pub fn rows(&self) -> impl Iterator<Item = (&str, Option<&SymbolSnapshot>)> {
        self.universe
            .iter()
            .map(move |symbol| (symbol.as_str(), self.by_symbol.get(symbol)))
    }

    /// Symbols grouped by signal. A symbol with N signals lands in N groups;
    /// groups appear in first-encounter order while scanning the universe.
    pub fn signal_groups(&self) -> Vec<(SignalKind, Vec<(&str, &SymbolSnapshot)>)> {
        let mut groups: Vec<(SignalKind, Vec<(&str, &SymbolSnapshot)>)> = Vec::new();
        for (symbol, snapshot) in self.rows() {
            let Some(snapshot) = snapshot else { continue };
            for signal in &snapshot.signals {
                match groups.iter_mut().find(|(kind, _)| kind == signal) {
                    Some((_, members)) => members.push((symbol, snapshot)),
                    None => groups.push((signal.clone(), vec![(symbol, snapshot)])),
                }
            }
        }
        groups
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighDividendTicker {
    pub symbol: String,
    #[serde(default)]
    pub dy_pct: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    pub generated_at: Option<String>,
    pub total_symbols: u64,
    pub successful: u64,
    pub failed: u64,
    pub high_dividend_tickers: Vec<HighDividendTicker>,
    pub tickers_with_signals: u64,
    pub total_signals: u64,
}
