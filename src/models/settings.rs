use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Windows {
    pub sma: Vec<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimit {
    pub per_symbol_sleep_sec: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    /// "HH:MM"
    pub daily_time: String,
    pub tz: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub symbol: String,
    #[serde(default)]
    pub market: String,
}

/// Backend analysis configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_currency: Option<String>,
    pub dividend_target_pct: f64,
    pub windows: Windows,
    pub rate_limit: RateLimit,
    pub schedule: Schedule,
    pub universe: Vec<TickerEntry>,
}

/// Partial update for `POST /config/update`; absent sections are not sent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_target_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<Windows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTicker {
    pub symbol: String,
    pub market: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerJob {
    pub id: Option<String>,
    pub name: Option<String>,
    pub next_run_time: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerStatus {
    pub running: Option<bool>,
    pub jobs: Vec<SchedulerJob>,
}

impl SchedulerStatus {
    pub fn next_job(&self) -> Option<&SchedulerJob> {
        self.jobs.first()
    }
}
