//! Application-wide constants
//!
//! Centralizes refresh intervals, page sizes and display limits so the
//! views and renderers agree on them.

use std::time::Duration;

/// Poller constants
pub mod polling {
    use super::*;

    /// Report + recommendations auto-refresh
    pub const REPORT_INTERVAL: Duration = Duration::from_secs(5 * 60);

    /// Forecast + history auto-refresh
    pub const FORECAST_INTERVAL: Duration = Duration::from_secs(5 * 60);
}

/// Backend HTTP constants
pub mod http {
    /// Report generation via run-now is synchronous and takes about a minute
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

    pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

    pub const DEFAULT_API_PREFIX: &str = "/api";

    pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
}

/// Forecast panel constants
pub mod forecast {
    /// Entries requested from `/predictor/history`
    pub const HISTORY_PAGE_SIZE: usize = 5;

    /// Characters of a news description shown before the ellipsis
    pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;

    /// Matched keywords shown per news item
    pub const MAX_KEYWORDS: usize = 5;

    /// Quick-analyze ticker groups
    pub const TICKER_SUGGESTIONS: &[&[&str]] = &[
        &["SBER", "GAZP", "YNDX"],
        &["VTBR", "LKOH", "GMKN"],
        &["SPBE", "MOEX", "RTKM"],
    ];
}

/// Notification constants
pub mod notices {
    use super::*;

    /// Success banners on the report page
    pub const REPORT_SUCCESS_TTL: Duration = Duration::from_secs(3);

    /// Success and warning banners on the settings page
    pub const SETTINGS_SUCCESS_TTL: Duration = Duration::from_secs(5);

    /// Oldest notices are dropped beyond this count
    pub const MAX_VISIBLE: usize = 8;
}

/// Settings form defaults
pub mod settings {
    pub const DEFAULT_MARKET: &str = "moex";

    pub const DEFAULT_CURRENCY: &str = "RUB";

    /// Upper bound on portfolio rows a submitted form can create
    pub const MAX_POSITIONS: usize = 200;
}

/// Event names for structured logging
pub mod events {
    pub const REPORT_LOADED: &str = "report_loaded";
    pub const RECOMMENDATIONS_LOADED: &str = "recommendations_loaded";
    pub const FORECAST_LOADED: &str = "forecast_loaded";
    pub const HISTORY_LOADED: &str = "history_loaded";
    pub const PORTFOLIO_LOADED: &str = "portfolio_loaded";
    pub const CONFIG_LOADED: &str = "config_loaded";
    pub const STALE_RESPONSE_DISCARDED: &str = "stale_response_discarded";
    pub const REFRESH_SKIPPED: &str = "refresh_skipped";
    pub const VALIDATION_REJECTED: &str = "validation_rejected";
    pub const LOAD_FAILED: &str = "load_failed";
}
