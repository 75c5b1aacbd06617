use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{http, notices, polling};
use crate::error::DashboardError;

pub const CONFIG_PATH: &str = "config.yaml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub report_success_secs: u64,
    pub settings_success_secs: u64,
    /// Errors stay until dismissed when unset
    pub error_secs: Option<u64>,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            report_success_secs: notices::REPORT_SUCCESS_TTL.as_secs(),
            settings_success_secs: notices::SETTINGS_SUCCESS_TTL.as_secs(),
            error_secs: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Analytics backend root, e.g. "http://127.0.0.1:8000"
    pub backend_url: String,
    /// Mount point of the backend's data API
    pub api_prefix: String,
    pub listen_addr: String,
    pub request_timeout_secs: u64,
    pub report_poll_secs: u64,
    pub forecast_poll_secs: u64,
    pub history_limit: usize,
    pub log_level: String,
    pub notices: NoticeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: http::DEFAULT_BACKEND_URL.to_string(),
            api_prefix: http::DEFAULT_API_PREFIX.to_string(),
            listen_addr: http::DEFAULT_LISTEN_ADDR.to_string(),
            request_timeout_secs: http::DEFAULT_REQUEST_TIMEOUT_SECS,
            report_poll_secs: polling::REPORT_INTERVAL.as_secs(),
            forecast_poll_secs: polling::FORECAST_INTERVAL.as_secs(),
            history_limit: crate::constants::forecast::HISTORY_PAGE_SIZE,
            log_level: "info".to_string(),
            notices: NoticeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config.yaml` from the working directory, then apply
    /// `DASHBOARD_*` environment overrides.
    pub fn load() -> Result<Self, DashboardError> {
        let mut config = Self::load_from(Path::new(CONFIG_PATH))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load_from(path: &Path) -> Result<Self, DashboardError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DashboardError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DASHBOARD_BACKEND_URL").filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        if let Some(addr) = lookup("DASHBOARD_LISTEN_ADDR").filter(|v| !v.trim().is_empty()) {
            self.listen_addr = addr.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        url::Url::parse(&self.backend_url)?;
        if self.report_poll_secs == 0 || self.forecast_poll_secs == 0 {
            return Err("poll intervals must be at least one second".into());
        }
        if self.history_limit == 0 {
            return Err("history_limit must be positive".into());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn report_poll_interval(&self) -> Duration {
        Duration::from_secs(self.report_poll_secs)
    }

    pub fn forecast_poll_interval(&self) -> Duration {
        Duration::from_secs(self.forecast_poll_secs)
    }

    pub fn report_success_ttl(&self) -> Duration {
        Duration::from_secs(self.notices.report_success_secs)
    }

    pub fn settings_success_ttl(&self) -> Duration {
        Duration::from_secs(self.notices.settings_success_secs)
    }

    pub fn error_ttl(&self) -> Option<Duration> {
        self.notices.error_secs.map(Duration::from_secs)
    }
}
