use std::sync::Arc;
use futures_util::future::join3;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stock_dashboard::api::{run_server, AppState};
use stock_dashboard::client::{BackendClient, HttpTransport};
use stock_dashboard::config::AppConfig;
use stock_dashboard::poller::{Poller, PollerHandle};
use stock_dashboard::state::NoticePolicy;
use stock_dashboard::views::{ForecastView, ReportView, SettingsView};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Load Configuration
    let config = AppConfig::load()?;

    // Setup Logging (RUST_LOG wins over the configured level)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Stock Dashboard...");
    info!("Loaded Configuration: {:?}", config);

    // Backend client
    let transport = HttpTransport::new(&config.backend_url, config.request_timeout())?;
    let client = BackendClient::new(Arc::new(transport), &config.api_prefix);
    info!("🌐 Backend: {}{}", config.backend_url, config.api_prefix);

    // Views
    let report = ReportView::new(
        client.clone(),
        NoticePolicy::new(config.report_success_ttl(), config.error_ttl()),
        Some(config.report_poll_secs),
    );
    let forecast = ForecastView::new(
        client.clone(),
        NoticePolicy::new(config.report_success_ttl(), config.error_ttl()),
        config.history_limit,
        Some(config.forecast_poll_secs),
    );
    let settings = SettingsView::new(
        client,
        NoticePolicy::new(config.settings_success_ttl(), config.error_ttl()),
    );

    // Initial load; failures surface as notices on the pages
    info!("📥 Loading initial data...");
    let (_, _, _) = join3(
        report.reload(),
        async {
            let _ = forecast.load_configuration().await;
            forecast.poll().await;
        },
        settings.load_all(),
    )
    .await;

    // Pollers
    let poller = Poller::start().await?;
    let mut handles: Vec<PollerHandle> = Vec::new();
    {
        let view = report.clone();
        handles.push(
            poller
                .every("report", config.report_poll_interval(), move || {
                    let view = view.clone();
                    async move {
                        view.poll().await;
                    }
                })
                .await?,
        );
    }
    {
        let view = forecast.clone();
        handles.push(
            poller
                .every("forecast", config.forecast_poll_interval(), move || {
                    let view = view.clone();
                    async move {
                        view.poll().await;
                    }
                })
                .await?,
        );
    }

    let state = AppState { report, forecast, settings };
    let served = run_server(state, &config.listen_addr).await;

    for handle in &handles {
        if let Err(e) = handle.cancel().await {
            warn!("⚠️ Failed to cancel poller {}: {}", handle.id(), e);
        }
    }

    if let Err(e) = served {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }
    info!("👋 Stock Dashboard stopped");
    Ok(())
}
