//! Backend payload types
//!
//! Every entity here is decoded from a backend envelope and owned only by the
//! view state that requested it. Enumerations sent as strings keep unknown
//! values in an `Unknown(raw)` variant so newer backends never break decoding.

/// String-backed enumeration with a forward-compatible `Unknown` arm
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod forecast;
pub mod portfolio;
pub mod recommendation;
pub mod report;
pub mod settings;

pub use forecast::{
    ForecastResult, ForecastStats, HistoryEntry, HistoryPage, NewsCategory, NewsItem,
    PredictorConfig, SignalLevel,
};
pub use portfolio::{Portfolio, Position, PositionKind, PositionRecord};
pub use recommendation::{Action, ActionCounts, ActionFilter, Confidence, Recommendation, RecommendationList};
pub use report::{HighDividendTicker, Report, ReportSummary, SignalKind, SymbolMeta, SymbolSnapshot};
pub use settings::{
    Config, ConfigUpdate, NewTicker, RateLimit, Schedule, SchedulerJob, SchedulerStatus, TickerEntry,
    Windows,
};

#[cfg(test)]
mod models_tests;
